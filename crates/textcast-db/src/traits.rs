use async_trait::async_trait;
use textcast_core::models::{ExtendedUploadRecord, UploadRecord};
use textcast_core::{AppError, RecordBackend};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordStoreError {
    #[error("Record store backend error: {0}")]
    Backend(String),

    #[error("Failed to decode record: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A record already exists under the composite key.
    #[error("Record already exists: {0}")]
    Conflict(String),
}

pub type RecordStoreResult<T> = Result<T, RecordStoreError>;

impl From<RecordStoreError> for AppError {
    fn from(err: RecordStoreError) -> Self {
        AppError::RecordStore(err.to_string())
    }
}

/// Metadata persistence for both upload shapes.
///
/// Every operation is scoped to a company; composite keys are always fully
/// known by the caller. Records are written once and never updated in place.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new simple record. Fails with `Conflict` when the key is taken;
    /// existing records are never overwritten.
    async fn put_upload(&self, record: &UploadRecord) -> RecordStoreResult<()>;

    async fn get_upload(
        &self,
        company_id: &str,
        upload_timestamp: &str,
    ) -> RecordStoreResult<Option<UploadRecord>>;

    async fn delete_upload(&self, company_id: &str, upload_timestamp: &str)
        -> RecordStoreResult<()>;

    /// Every simple record of the company, in key order.
    async fn list_uploads(&self, company_id: &str) -> RecordStoreResult<Vec<UploadRecord>>;

    /// Insert a new extended record, with the same `Conflict` rule as `put_upload`.
    async fn put_extended(&self, record: &ExtendedUploadRecord) -> RecordStoreResult<()>;

    async fn get_extended(
        &self,
        company_id: &str,
        text_id: &str,
    ) -> RecordStoreResult<Option<ExtendedUploadRecord>>;

    async fn delete_extended(&self, company_id: &str, text_id: &str) -> RecordStoreResult<()>;

    /// Every extended record of the company, in key order.
    async fn list_extended(&self, company_id: &str)
        -> RecordStoreResult<Vec<ExtendedUploadRecord>>;

    fn backend_type(&self) -> RecordBackend;
}
