//! Shared key generation for storage backends.

use textcast_core::models::AssetKind;

use crate::traits::{StorageError, StorageResult};

const UPLOADS_PREFIX: &str = "uploads";
const SUBUPLOADS_PREFIX: &str = "subuploads";

/// Key for the file of a simple upload: `uploads/{filename}`.
pub fn upload_key(filename: &str) -> String {
    format!("{}/{}", UPLOADS_PREFIX, filename)
}

/// Key for one asset of an extended upload:
/// `subuploads/{text_id}/{audio|thumbnail|media}/{filename}`.
pub fn subupload_key(text_id: &str, kind: AssetKind, filename: &str) -> String {
    format!("{}/{}/{}/{}", SUBUPLOADS_PREFIX, text_id, kind, filename)
}

/// Reject keys that could escape the storage root.
pub fn validate_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if storage_key.contains("..") || storage_key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}
