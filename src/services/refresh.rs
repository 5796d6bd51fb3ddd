use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::info;

use crate::catalog::{CatalogStore, Collection};
use crate::{error::AppError, gateway::GatewayClient};

/// Pulls fresh data from the course service into the shared snapshot.
pub struct RefreshService {
    gateway: Arc<dyn GatewayClient>,
    store: Arc<RwLock<CatalogStore>>,
}

#[derive(Debug, Default, Clone, Serialize)]
pub struct RefreshStats {
    pub courses: usize,
    pub tutors: usize,
    pub orders: usize,
    /// Responses the store refused because a newer one was already applied.
    pub stale_dropped: usize,
}

impl RefreshService {
    pub fn new(gateway: Arc<dyn GatewayClient>, store: Arc<RwLock<CatalogStore>>) -> Self {
        Self { gateway, store }
    }

    pub async fn refresh_all(&self) -> Result<RefreshStats, AppError> {
        info!("Starting refresh...");
        let mut stats = RefreshStats::default();

        info!("Step 1: Loading orders");
        self.refresh_orders_into(&mut stats).await?;
        info!("Loaded {} orders", stats.orders);

        info!("Step 2: Loading courses and tutors");
        self.refresh_catalog_into(&mut stats).await?;
        info!("Loaded {} courses, {} tutors", stats.courses, stats.tutors);

        info!("Refresh completed: {:?}", stats);
        Ok(stats)
    }

    pub async fn refresh_orders(&self) -> Result<RefreshStats, AppError> {
        let mut stats = RefreshStats::default();
        self.refresh_orders_into(&mut stats).await?;
        Ok(stats)
    }

    /// Courses and tutors are fetched concurrently; neither is applied until
    /// both have arrived.
    pub async fn refresh_catalog(&self) -> Result<RefreshStats, AppError> {
        let mut stats = RefreshStats::default();
        self.refresh_catalog_into(&mut stats).await?;
        Ok(stats)
    }

    async fn refresh_orders_into(&self, stats: &mut RefreshStats) -> Result<(), AppError> {
        let ticket = self.store.write().await.begin_fetch(Collection::Orders);
        let orders = self.gateway.list_orders().await?;
        stats.orders = orders.len();

        if !self.store.write().await.apply_orders(ticket, orders) {
            stats.stale_dropped += 1;
        }
        Ok(())
    }

    async fn refresh_catalog_into(&self, stats: &mut RefreshStats) -> Result<(), AppError> {
        let (course_ticket, tutor_ticket) = {
            let mut store = self.store.write().await;
            (
                store.begin_fetch(Collection::Courses),
                store.begin_fetch(Collection::Tutors),
            )
        };

        let (courses, tutors) =
            tokio::try_join!(self.gateway.list_courses(), self.gateway.list_tutors())?;
        stats.courses = courses.len();
        stats.tutors = tutors.len();

        let mut store = self.store.write().await;
        if !store.apply_courses(course_ticket, courses) {
            stats.stale_dropped += 1;
        }
        if !store.apply_tutors(tutor_ticket, tutors) {
            stats.stale_dropped += 1;
        }
        Ok(())
    }
}
