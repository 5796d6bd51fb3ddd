use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutorbook::api::router;
use tutorbook::config::AppConfig;
use tutorbook::gateway::GatewayHttpClient;
use tutorbook::services::RefreshScheduler;
use tutorbook::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tutorbook=debug".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::new_from_env()?;
    let gateway = Arc::new(GatewayHttpClient::new(config.gateway.clone())?);
    let state = AppState::new(gateway, config);

    // Start with whatever the service gives us; an outage here is not fatal.
    if let Err(e) = state.refresh_service().refresh_all().await {
        warn!("initial refresh failed: {}", e);
    }

    if state.config.refresh_secs > 0 {
        let scheduler = RefreshScheduler::new(
            state.gateway.clone(),
            state.store.clone(),
            state.config.refresh_secs,
        );
        tokio::spawn(scheduler.start());
    }

    let addr = state.config.bind_addr;
    let app = router(state);

    info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
