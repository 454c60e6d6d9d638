//! Storage and record store setup

use anyhow::{Context, Result};
use std::sync::Arc;
use textcast_core::Config;
use textcast_db::{create_record_store, RecordStore};
use textcast_storage::{create_storage, Storage};

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config)
        .await
        .context("Failed to initialize object storage")?;
    tracing::info!(
        backend = ?storage.backend_type(),
        "Storage abstraction initialized successfully"
    );
    Ok(storage)
}

pub async fn setup_records(config: &Config) -> Result<Arc<dyn RecordStore>> {
    let records = create_record_store(config)
        .await
        .context("Failed to initialize record store")?;
    tracing::info!(
        backend = ?records.backend_type(),
        uploads_table = %config.uploads_table(),
        subuploads_table = %config.subuploads_table(),
        "Record store initialized"
    );
    Ok(records)
}
