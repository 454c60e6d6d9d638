//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod speech;
pub mod storage;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use textcast_core::Config;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let storage = storage::setup_storage(&config).await?;
    let records = storage::setup_records(&config).await?;
    let narrator = speech::setup_narrator(&config)?;

    let state = Arc::new(AppState::new(config.clone(), storage, records, narrator));
    let router = routes::setup_routes(&config, state.clone()).await?;

    Ok((state, router))
}
