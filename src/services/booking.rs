use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::catalog::CatalogStore;
use crate::error::AppError;
use crate::gateway::GatewayClient;
use crate::models::{
    Course, CourseExtras, CourseSelection, Order, OrderDraft, OrderPatch, OrderTarget, Tutor,
    TutorSelection, UpdateOrderRequest,
};
use crate::quote::{self, Quotation};
use crate::services::refresh::RefreshService;

/// Commands behind the booking forms and the order dashboard.
pub struct BookingService {
    gateway: Arc<dyn GatewayClient>,
    store: Arc<RwLock<CatalogStore>>,
    reprice_on_update: bool,
}

impl BookingService {
    pub fn new(
        gateway: Arc<dyn GatewayClient>,
        store: Arc<RwLock<CatalogStore>>,
        reprice_on_update: bool,
    ) -> Self {
        Self {
            gateway,
            store,
            reprice_on_update,
        }
    }

    async fn course(&self, id: i64) -> Result<Course, AppError> {
        if let Some(course) = self.store.read().await.course(id).cloned() {
            return Ok(course);
        }
        self.gateway.get_course(id).await
    }

    async fn tutor(&self, id: i64) -> Result<Tutor, AppError> {
        if let Some(tutor) = self.store.read().await.tutor(id).cloned() {
            return Ok(tutor);
        }
        self.gateway.get_tutor(id).await
    }

    async fn order(&self, id: i64) -> Result<Order, AppError> {
        if let Some(order) = self.store.read().await.order(id).cloned() {
            return Ok(order);
        }
        self.gateway.get_order(id).await
    }

    pub async fn quote_course(
        &self,
        selection: &CourseSelection,
        now: DateTime<Utc>,
    ) -> Result<Quotation, AppError> {
        let course = self.course(selection.course_id).await?;
        quote::quote_course(&course, selection, now)
    }

    pub async fn quote_tutor(&self, selection: &TutorSelection) -> Result<Quotation, AppError> {
        let tutor = self.tutor(selection.tutor_id).await?;
        quote::quote_tutor(&tutor, selection.duration, selection.persons)
    }

    pub async fn submit_course(
        &self,
        selection: &CourseSelection,
        now: DateTime<Utc>,
    ) -> Result<Order, AppError> {
        let (Some(date_start), Some(time_start)) = (selection.date_start, selection.time_start)
        else {
            return Err(AppError::validation("Fill in the start date and time"));
        };

        let course = self.course(selection.course_id).await?;
        if !course.start_dates.is_empty() && !course.offers_slot(date_start, time_start) {
            return Err(AppError::validation(format!(
                "{} does not start on {} at {}",
                course.name,
                date_start,
                time_start.format("%H:%M")
            )));
        }

        let quotation = quote::quote_course(&course, selection, now)?;
        let duration = course
            .total_hours()
            .ok_or_else(|| AppError::validation("course length is out of range"))?;
        let draft = OrderDraft::for_course(
            course.id,
            date_start,
            time_start,
            duration,
            selection.persons,
            quotation.total,
            quotation.order_options(selection),
        );

        let order = self.gateway.create_order(&draft).await?;
        info!(
            "course order {} created: course {} for {} persons, price {}",
            order.id, course.id, order.persons, order.price
        );
        self.reload_orders().await;
        Ok(order)
    }

    pub async fn submit_tutor(&self, selection: &TutorSelection) -> Result<Order, AppError> {
        let (Some(date_start), Some(time_start)) = (selection.date_start, selection.time_start)
        else {
            return Err(AppError::validation("Fill in all required fields"));
        };

        let tutor = self.tutor(selection.tutor_id).await?;
        let quotation = quote::quote_tutor(&tutor, selection.duration, selection.persons)?;
        let draft = OrderDraft::for_tutor(
            tutor.id,
            date_start,
            time_start,
            selection.duration,
            selection.persons,
            quotation.total,
        );

        let order = self.gateway.create_order(&draft).await?;
        info!(
            "tutor order {} created: tutor {} for {} persons, price {}",
            order.id, tutor.id, order.persons, order.price
        );
        self.reload_orders().await;
        Ok(order)
    }

    pub async fn update_order(
        &self,
        id: i64,
        request: &UpdateOrderRequest,
        now: DateTime<Utc>,
    ) -> Result<Order, AppError> {
        let mut patch = request.validate()?;

        if self.reprice_on_update {
            let current = self.order(id).await?;
            let price = self.reprice(&current, &patch, now).await?;
            info!("order {} repriced from {} to {}", id, current.price, price);
            patch.price = Some(price);
        }

        let order = self.gateway.update_order(id, &patch).await?;
        info!("order {} updated", id);
        self.reload_orders().await;
        Ok(order)
    }

    pub async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        self.gateway.delete_order(id).await?;
        info!("order {} deleted", id);
        self.reload_orders().await;
        Ok(())
    }

    async fn reprice(
        &self,
        order: &Order,
        patch: &OrderPatch,
        now: DateTime<Utc>,
    ) -> Result<i64, AppError> {
        match order.target() {
            OrderTarget::Course(course_id) => {
                let course = self.course(course_id).await?;
                let selection = CourseSelection {
                    course_id,
                    date_start: Some(patch.date_start),
                    time_start: Some(patch.time_start),
                    persons: patch.persons,
                    extras: CourseExtras {
                        supplementary: order.options.supplementary,
                        personalized: order.options.personalized,
                        excursions: order.options.excursions,
                        assessment: order.options.assessment,
                        interactive: order.options.interactive,
                    },
                };
                Ok(quote::quote_course(&course, &selection, now)?.total)
            }
            OrderTarget::Tutor(tutor_id) => {
                let tutor = self.tutor(tutor_id).await?;
                Ok(quote::quote_tutor(&tutor, patch.duration, patch.persons)?.total)
            }
            OrderTarget::Unassigned => Err(AppError::validation(format!(
                "order {} has neither a course nor a tutor",
                order.id
            ))),
        }
    }

    /// The mutation already succeeded; a failed reload only leaves the
    /// dashboard behind until the next refresh.
    async fn reload_orders(&self) {
        let refresh = RefreshService::new(self.gateway.clone(), self.store.clone());
        if let Err(e) = refresh.refresh_orders().await {
            warn!("reloading orders failed: {}", e);
        }
    }
}
