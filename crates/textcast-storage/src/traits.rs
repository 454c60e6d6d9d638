//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use textcast_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(key) => AppError::NotFound(format!("Object not found: {}", key)),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Backends store opaque blobs under string keys (see the crate root for the
/// key layout) and expose each blob at a stable public URL.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Upload data to a specific storage key and return its public URL.
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Upload a local file to a specific storage key and return its public URL.
    async fn upload_from_path(
        &self,
        storage_key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<String> {
        let data = tokio::fs::read(path).await?;
        self.upload_with_key(storage_key, Bytes::from(data), content_type)
            .await
    }

    /// Delete a file by its storage key.
    ///
    /// Returns `StorageError::NotFound` when the backend can tell the object
    /// does not exist.
    async fn delete(&self, storage_key: &str) -> StorageResult<()>;

    /// Public URL of the object stored under `storage_key`.
    fn public_url(&self, storage_key: &str) -> String;

    /// Recover the storage key from a URL produced by [`Storage::public_url`].
    ///
    /// Returns `None` for URLs that do not belong to this backend.
    fn key_from_url(&self, url: &str) -> Option<String> {
        let prefix = self.public_url("");
        url.strip_prefix(prefix.as_str())
            .filter(|key| !key.is_empty())
            .map(str::to_string)
    }

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
