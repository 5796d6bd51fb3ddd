use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;

use crate::catalog::CatalogStore;
use crate::gateway::GatewayClient;
use crate::services::refresh::{RefreshService, RefreshStats};

/// Re-runs the full snapshot refresh on a fixed interval.
pub struct RefreshScheduler {
    gateway: Arc<dyn GatewayClient>,
    store: Arc<RwLock<CatalogStore>>,
    interval: Duration,
}

impl RefreshScheduler {
    pub fn new(
        gateway: Arc<dyn GatewayClient>,
        store: Arc<RwLock<CatalogStore>>,
        interval_secs: u64,
    ) -> Self {
        Self {
            gateway,
            store,
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Runs forever; a failed round is logged and the next one still runs.
    pub async fn start(self) {
        info!("Starting refresh scheduler (interval: {:?})", self.interval);

        loop {
            tokio::time::sleep(self.interval).await;

            match self.run_refresh().await {
                Ok(stats) => {
                    info!(
                        "Scheduled refresh completed - {} courses, {} tutors, {} orders ({} stale dropped)",
                        stats.courses, stats.tutors, stats.orders, stats.stale_dropped
                    );
                }
                Err(e) => {
                    tracing::warn!("Scheduled refresh failed: {}", e);
                }
            }
        }
    }

    async fn run_refresh(&self) -> Result<RefreshStats, crate::error::AppError> {
        let service = RefreshService::new(self.gateway.clone(), self.store.clone());
        service.refresh_all().await
    }
}
