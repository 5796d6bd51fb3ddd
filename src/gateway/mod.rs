pub mod dto;
pub mod memory;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::AppError;
use crate::models::{Course, Order, OrderDraft, OrderPatch, Tutor};

pub use memory::MemoryGateway;

pub const DEFAULT_API_URL: &str = "http://exam-api-courses.std-900.ist.mospolytech.ru";

#[derive(Clone, Debug)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Remote course service: courses and tutors are read-only, orders are CRUD.
#[async_trait]
pub trait GatewayClient: Send + Sync {
    async fn list_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn get_course(&self, id: i64) -> Result<Course, AppError>;
    async fn list_tutors(&self) -> Result<Vec<Tutor>, AppError>;
    async fn get_tutor(&self, id: i64) -> Result<Tutor, AppError>;
    async fn list_orders(&self) -> Result<Vec<Order>, AppError>;
    async fn get_order(&self, id: i64) -> Result<Order, AppError>;
    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, AppError>;
    async fn update_order(&self, id: i64, patch: &OrderPatch) -> Result<Order, AppError>;
    async fn delete_order(&self, id: i64) -> Result<(), AppError>;
}

pub struct GatewayHttpClient {
    client: Client,
    config: GatewayConfig,
}

impl GatewayHttpClient {
    pub fn new(config: GatewayConfig) -> Result<Self, AppError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint)
    }

    /// Every call carries the key as the `api_key` query parameter.
    fn request(&self, method: Method, endpoint: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(endpoint))
            .query(&[("api_key", self.config.api_key.as_str())])
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response, AppError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                error!("request for {} failed: {}", what, e);
                AppError::Transport(e)
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(what.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<dto::RemoteError>(&body)
                .ok()
                .and_then(dto::RemoteError::into_message)
                .unwrap_or(body);
            error!("course service answered {} for {}: {}", status, what, message);
            return Err(AppError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, what: &str) -> Result<T, AppError> {
        debug!("GET {}", endpoint);
        let response = self.send(self.request(Method::GET, endpoint), what).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl GatewayClient for GatewayHttpClient {
    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        self.get_json("/api/courses", "courses").await
    }

    async fn get_course(&self, id: i64) -> Result<Course, AppError> {
        self.get_json(&format!("/api/courses/{}", id), &format!("course {}", id))
            .await
    }

    async fn list_tutors(&self) -> Result<Vec<Tutor>, AppError> {
        self.get_json("/api/tutors", "tutors").await
    }

    async fn get_tutor(&self, id: i64) -> Result<Tutor, AppError> {
        self.get_json(&format!("/api/tutors/{}", id), &format!("tutor {}", id))
            .await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        self.get_json("/api/orders", "orders").await
    }

    async fn get_order(&self, id: i64) -> Result<Order, AppError> {
        self.get_json(&format!("/api/orders/{}", id), &format!("order {}", id))
            .await
    }

    async fn create_order(&self, draft: &OrderDraft) -> Result<Order, AppError> {
        debug!("POST /api/orders");
        let request = self.request(Method::POST, "/api/orders").json(draft);
        let response = self.send(request, "orders").await?;
        Ok(response.json::<Order>().await?)
    }

    async fn update_order(&self, id: i64, patch: &OrderPatch) -> Result<Order, AppError> {
        let endpoint = format!("/api/orders/{}", id);
        debug!("PUT {}", endpoint);
        let request = self.request(Method::PUT, &endpoint).json(patch);
        let response = self.send(request, &format!("order {}", id)).await?;
        Ok(response.json::<Order>().await?)
    }

    async fn delete_order(&self, id: i64) -> Result<(), AppError> {
        let endpoint = format!("/api/orders/{}", id);
        debug!("DELETE {}", endpoint);
        let request = self.request(Method::DELETE, &endpoint);
        let response = self.send(request, &format!("order {}", id)).await?;
        let body = response.text().await.unwrap_or_default();
        if let Ok(deleted) = serde_json::from_str::<dto::DeletedOrder>(&body) {
            if deleted.id.is_some_and(|deleted_id| deleted_id != id) {
                error!("delete of order {} acknowledged id {:?}", id, deleted.id);
            }
        }
        Ok(())
    }
}
