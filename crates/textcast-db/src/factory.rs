#[cfg(feature = "dynamodb")]
use crate::DynamoRecordStore;
use crate::{InMemoryRecordStore, RecordBackend, RecordStore, RecordStoreError, RecordStoreResult};
use std::sync::Arc;
use textcast_core::Config;

/// Create a record store based on configuration
pub async fn create_record_store(config: &Config) -> RecordStoreResult<Arc<dyn RecordStore>> {
    let backend = config.metadata_backend().unwrap_or(RecordBackend::DynamoDb);

    match backend {
        #[cfg(feature = "dynamodb")]
        RecordBackend::DynamoDb => {
            let region = config.dynamodb_region().map(String::from).ok_or_else(|| {
                RecordStoreError::Config(
                    "DYNAMODB_REGION or AWS_REGION not configured".to_string(),
                )
            })?;

            let store = DynamoRecordStore::new(
                region,
                config.dynamodb_endpoint().map(String::from),
                config.uploads_table().to_string(),
                config.subuploads_table().to_string(),
            )
            .await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "dynamodb"))]
        RecordBackend::DynamoDb => Err(RecordStoreError::Config(
            "DynamoDB backend not available (dynamodb feature not enabled)".to_string(),
        )),

        RecordBackend::Memory => {
            tracing::warn!("Using in-memory record store; records are lost on restart");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}
