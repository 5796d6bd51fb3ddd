use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use super::GatewayClient;
use crate::error::AppError;
use crate::models::{Course, Order, OrderDraft, OrderPatch, Tutor};

#[derive(Debug, Default)]
struct MemoryState {
    courses: Vec<Course>,
    tutors: Vec<Tutor>,
    orders: Vec<Order>,
    next_order_id: i64,
}

/// Course service held in memory. Useful offline and in tests; can be
/// switched to fail every call like an unreachable service.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
    offline: AtomicBool,
}

impl MemoryGateway {
    pub fn new(courses: Vec<Course>, tutors: Vec<Tutor>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                courses,
                tutors,
                orders: Vec::new(),
                next_order_id: 1,
            }),
            offline: AtomicBool::new(false),
        }
    }

    pub fn with_orders(self, orders: Vec<Order>) -> Self {
        {
            let mut state = self.lock();
            state.next_order_id = orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
            state.orders = orders;
        }
        self
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn orders(&self) -> Vec<Order> {
        self.lock().orders.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn online(&self) -> Result<MutexGuard<'_, MemoryState>, AppError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(AppError::Status {
                status: 503,
                message: "service unavailable".to_string(),
            });
        }
        Ok(self.lock())
    }
}

#[async_trait]
impl GatewayClient for MemoryGateway {
    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(self.online()?.courses.clone())
    }

    async fn get_course(&self, id: i64) -> Result<Course, AppError> {
        self.online()?
            .courses
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("course {}", id)))
    }

    async fn list_tutors(&self) -> Result<Vec<Tutor>, AppError> {
        Ok(self.online()?.tutors.clone())
    }

    async fn get_tutor(&self, id: i64) -> Result<Tutor, AppError> {
        self.online()?
            .tutors
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("tutor {}", id)))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.online()?.orders.clone())
    }

    async fn get_order(&self, id: i64) -> Result<Order, AppError> {
        self.online()?
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("order {}", id)))
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, AppError> {
        let mut state = self.online()?;
        let id = state.next_order_id.max(1);
        state.next_order_id = id + 1;

        let order = Order {
            id,
            course_id: draft.course_id,
            tutor_id: draft.tutor_id,
            date_start: draft.date_start,
            time_start: draft.time_start,
            duration: draft.duration,
            persons: draft.persons,
            price: draft.price,
            options: draft.options,
            created_at: Some(Utc::now().to_rfc3339()),
        };
        state.orders.push(order.clone());
        Ok(order)
    }

    async fn update_order(&self, id: i64, patch: &OrderPatch) -> Result<Order, AppError> {
        let mut state = self.online()?;
        let order = state
            .orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| AppError::NotFound(format!("order {}", id)))?;

        order.date_start = patch.date_start;
        order.time_start = patch.time_start;
        order.persons = patch.persons;
        order.duration = patch.duration;
        if let Some(price) = patch.price {
            order.price = price;
        }
        Ok(order.clone())
    }

    async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        let mut state = self.online()?;
        let before = state.orders.len();
        state.orders.retain(|o| o.id != id);
        if state.orders.len() == before {
            return Err(AppError::NotFound(format!("order {}", id)));
        }
        Ok(())
    }
}
