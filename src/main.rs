//! Server entry point: loads the YAML config, opens the store, mounts the routes.

use std::time::Duration;
use subscribers_api::{app, config, telemetry, AppState, PgSubscriberStore};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenvy::dotenv().ok();

    let config_path = config::config_path();
    let config = config::load_from_file(&config_path)?;
    let _log_guard = telemetry::init(&config.log)?;
    tracing::info!(path = %config_path.display(), "config loaded");

    let store = PgSubscriberStore::connect(&config.database).await?;
    let state = AppState::new(store);
    let router = app(
        state,
        &config.mvc.resource,
        Duration::from_secs(config.server.request_timeout_secs),
    );

    let listener = TcpListener::bind(config.server.bind_addr()).await?;
    tracing::info!(resource = %config.mvc.resource, "listening on {}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}
