use std::{env, fmt::Display, net::SocketAddr, str::FromStr};

use tracing::info;

use crate::error::AppError;
use crate::gateway::{DEFAULT_API_URL, GatewayConfig};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub gateway: GatewayConfig,
    pub bind_addr: SocketAddr,
    pub courses_per_page: usize,
    pub orders_per_page: usize,
    /// Recompute an order's price when its persons/duration/date change.
    /// Off keeps the price fixed at booking time.
    pub reprice_on_update: bool,
    /// Drop fetch responses that arrive after a newer one was applied.
    pub fence_stale: bool,
    /// Seconds between background snapshot refreshes; 0 disables them.
    pub refresh_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig {
                base_url: DEFAULT_API_URL.to_string(),
                api_key: String::new(),
            },
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            courses_per_page: 5,
            orders_per_page: 5,
            reprice_on_update: false,
            fence_stale: false,
            refresh_secs: 0,
        }
    }
}

impl AppConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let api_key = env::var("TUTORBOOK_API_KEY")
            .map_err(|_| AppError::Config("TUTORBOOK_API_KEY is not set".to_string()))?;
        let base_url = env::var("TUTORBOOK_API_URL").unwrap_or(defaults.gateway.base_url);

        Ok(Self {
            gateway: GatewayConfig { base_url, api_key },
            bind_addr: load("TUTORBOOK_BIND", defaults.bind_addr)?,
            courses_per_page: load("TUTORBOOK_COURSES_PER_PAGE", defaults.courses_per_page)?,
            orders_per_page: load("TUTORBOOK_ORDERS_PER_PAGE", defaults.orders_per_page)?,
            reprice_on_update: load("TUTORBOOK_REPRICE_ON_UPDATE", defaults.reprice_on_update)?,
            fence_stale: load("TUTORBOOK_FENCE_STALE", defaults.fence_stale)?,
            refresh_secs: load("TUTORBOOK_REFRESH_SECS", defaults.refresh_secs)?,
        })
    }
}

fn load<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AppError::Config(format!("invalid {}: {}", key, e))),
        Err(_) => {
            info!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
