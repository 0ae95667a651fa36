//! # Verifier backend service
//!
//! Runs the proxy routes on `LISTEN_ADDR` (default `0.0.0.0:8080`). See
//! [`vcservice::config::Config::from_env`] for the environment it expects.

use anyhow::Result;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use vcservice::config::Config;
use vcservice::{AppState, app};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env()?;
    let listener = TcpListener::bind(&config.listen_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app(AppState::new(config)))
        .with_graceful_shutdown(shutdown())
        .await?;
    Ok(())
}

async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
    }
    tracing::info!("shutting down");
}
