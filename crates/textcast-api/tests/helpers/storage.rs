use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use textcast_storage::{Storage, StorageBackend, StorageError, StorageResult};

pub const BASE_URL: &str = "https://test-bucket.s3.ap-northeast-1.amazonaws.com";

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// In-memory storage that records every call.
#[derive(Default)]
pub struct MockStorage {
    objects: Mutex<HashMap<String, StoredObject>>,
    upload_calls: Mutex<Vec<String>>,
    delete_calls: Mutex<Vec<String>>,
    failing_deletes: Mutex<HashSet<String>>,
    fail_uploads: bool,
}

impl MockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every upload fails with a backend error.
    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::default()
        }
    }

    /// Deleting `key` fails until [`MockStorage::heal`] is called.
    pub fn fail_delete_of(&self, key: &str) {
        self.failing_deletes.lock().unwrap().insert(key.to_string());
    }

    pub fn heal(&self) {
        self.failing_deletes.lock().unwrap().clear();
    }

    /// Remove an object behind the application's back.
    pub fn evict(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    pub fn object(&self, key: &str) -> Option<StoredObject> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.objects.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn upload_calls(&self) -> Vec<String> {
        self.upload_calls.lock().unwrap().clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    pub fn key_of(url: &str) -> &str {
        url.strip_prefix(BASE_URL)
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(url)
    }
}

#[async_trait]
impl Storage for MockStorage {
    async fn upload_with_key(
        &self,
        storage_key: &str,
        data: Bytes,
        content_type: &str,
    ) -> StorageResult<String> {
        self.upload_calls
            .lock()
            .unwrap()
            .push(storage_key.to_string());

        if self.fail_uploads {
            return Err(StorageError::UploadFailed("bucket unavailable".to_string()));
        }

        self.objects.lock().unwrap().insert(
            storage_key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(self.public_url(storage_key))
    }

    async fn delete(&self, storage_key: &str) -> StorageResult<()> {
        self.delete_calls
            .lock()
            .unwrap()
            .push(storage_key.to_string());

        if self.failing_deletes.lock().unwrap().contains(storage_key) {
            return Err(StorageError::DeleteFailed(format!(
                "access denied: {}",
                storage_key
            )));
        }

        match self.objects.lock().unwrap().remove(storage_key) {
            Some(_) => Ok(()),
            None => Err(StorageError::NotFound(storage_key.to_string())),
        }
    }

    fn public_url(&self, storage_key: &str) -> String {
        format!("{}/{}", BASE_URL, storage_key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
