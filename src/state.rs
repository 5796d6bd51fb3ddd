use std::sync::Arc;

use tokio::sync::RwLock;

use crate::catalog::CatalogStore;
use crate::config::AppConfig;
use crate::gateway::GatewayClient;
use crate::services::{BookingService, RefreshService};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn GatewayClient>,
    pub store: Arc<RwLock<CatalogStore>>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn GatewayClient>, config: AppConfig) -> Self {
        Self {
            gateway,
            store: Arc::new(RwLock::new(CatalogStore::new(config.fence_stale))),
            config: Arc::new(config),
        }
    }

    pub fn refresh_service(&self) -> RefreshService {
        RefreshService::new(self.gateway.clone(), self.store.clone())
    }

    pub fn booking_service(&self) -> BookingService {
        BookingService::new(
            self.gateway.clone(),
            self.store.clone(),
            self.config.reprice_on_update,
        )
    }
}
