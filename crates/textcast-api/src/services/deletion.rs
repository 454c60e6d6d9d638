//! Record deletion with object cleanup.
//!
//! Deletion is a short saga with no rollback: look the record up, delete each
//! object it references, then delete the record. When an object deletion
//! fails the record is kept, since it is the only remaining handle on the
//! objects, and a retry picks up where this attempt stopped. Objects that
//! are already gone count as deleted.

use textcast_core::AppError;
use textcast_storage::StorageError;

use crate::constants::ITEM_NOT_FOUND;
use crate::state::AppState;

pub struct DeletionService<'a> {
    state: &'a AppState,
}

impl<'a> DeletionService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub async fn delete_simple(&self, upload_timestamp: &str) -> Result<(), AppError> {
        let company_id = self.state.company_id();
        let record = self
            .state
            .records
            .get_upload(company_id, upload_timestamp)
            .await?
            .ok_or_else(|| AppError::NotFound(ITEM_NOT_FOUND.to_string()))?;

        let storage_key = self.storage_key(&record.file_url)?;
        if let Err(failed) = self.delete_objects(&[storage_key]).await {
            return Err(partial_failure(failed));
        }

        self.state
            .records
            .delete_upload(company_id, upload_timestamp)
            .await?;

        tracing::info!(upload_timestamp = %upload_timestamp, "Simple upload deleted");
        Ok(())
    }

    pub async fn delete_extended(&self, text_id: &str) -> Result<(), AppError> {
        let company_id = self.state.company_id();
        let record = self
            .state
            .records
            .get_extended(company_id, text_id)
            .await?
            .ok_or_else(|| AppError::NotFound(ITEM_NOT_FOUND.to_string()))?;

        let mut storage_keys = Vec::new();
        for (kind, url) in record.asset_urls() {
            let key = self.storage_key(url).map_err(|e| {
                tracing::error!(kind = %kind, url = %url, "Asset URL does not belong to storage");
                e
            })?;
            storage_keys.push(key);
        }

        if let Err(failed) = self.delete_objects(&storage_keys).await {
            return Err(partial_failure(failed));
        }

        self.state
            .records
            .delete_extended(company_id, text_id)
            .await?;

        tracing::info!(
            text_id = %text_id,
            objects = storage_keys.len(),
            "Extended upload deleted"
        );
        Ok(())
    }

    fn storage_key(&self, url: &str) -> Result<String, AppError> {
        self.state.storage.key_from_url(url).ok_or_else(|| {
            AppError::Internal(format!("Cannot derive storage key from URL: {}", url))
        })
    }

    /// Delete every key, attempting all of them; returns the keys that failed.
    async fn delete_objects(&self, storage_keys: &[String]) -> Result<(), Vec<String>> {
        let mut failed = Vec::new();

        for key in storage_keys {
            match self.state.storage.delete(key).await {
                Ok(()) => {}
                Err(StorageError::NotFound(_)) => {
                    tracing::debug!(storage_key = %key, "Object already absent");
                }
                Err(e) => {
                    tracing::error!(error = %e, storage_key = %key, "Object deletion failed");
                    failed.push(key.clone());
                }
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(failed)
        }
    }
}

fn partial_failure(failed: Vec<String>) -> AppError {
    AppError::PartialFailure(format!(
        "Failed to delete objects: {}; record kept",
        failed.join(", ")
    ))
}

