//! operator-api: back office for the food delivery service
//!
//! HTTP service used by operators to:
//! - Browse and filter orders
//! - Maintain the course catalog (dishes, ingredient amounts, images)
//! - Maintain ingredient master data
//! - Assign back-office roles to users

mod api;
mod auth;
mod catalog;
mod config;
mod db;
mod error;
mod logger;
mod services;
mod state;

use config::Config;
use error::BoxError;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    let _log_guard = logger::init_logger(config.log_dir.as_deref());

    tracing::info!("Starting operator-api (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    let app = api::create_router(state);

    let http_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;
    tracing::info!("operator-api HTTP listening on {http_addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("operator-api stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
}
