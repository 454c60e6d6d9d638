use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use async_trait::async_trait;
use textcast_core::models::{ExtendedUploadRecord, UploadRecord};
use textcast_core::RecordBackend;
use tokio::sync::RwLock;

use crate::traits::{RecordStore, RecordStoreError, RecordStoreResult};

type CompositeKey = (String, String);

/// Process-local record store. Contents are lost on restart.
#[derive(Default)]
pub struct InMemoryRecordStore {
    uploads: RwLock<BTreeMap<CompositeKey, UploadRecord>>,
    extended: RwLock<BTreeMap<CompositeKey, ExtendedUploadRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn key(company_id: &str, sort_key: &str) -> CompositeKey {
    (company_id.to_string(), sort_key.to_string())
}

fn insert_new<T>(
    map: &mut BTreeMap<CompositeKey, T>,
    key: CompositeKey,
    value: T,
) -> RecordStoreResult<()> {
    match map.entry(key) {
        Entry::Occupied(entry) => {
            let (company_id, sort_key) = entry.key();
            Err(RecordStoreError::Conflict(format!("{}/{}", company_id, sort_key)))
        }
        Entry::Vacant(entry) => {
            entry.insert(value);
            Ok(())
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put_upload(&self, record: &UploadRecord) -> RecordStoreResult<()> {
        insert_new(
            &mut *self.uploads.write().await,
            key(&record.company_id, &record.upload_timestamp),
            record.clone(),
        )
    }

    async fn get_upload(
        &self,
        company_id: &str,
        upload_timestamp: &str,
    ) -> RecordStoreResult<Option<UploadRecord>> {
        Ok(self
            .uploads
            .read()
            .await
            .get(&key(company_id, upload_timestamp))
            .cloned())
    }

    async fn delete_upload(
        &self,
        company_id: &str,
        upload_timestamp: &str,
    ) -> RecordStoreResult<()> {
        self.uploads
            .write()
            .await
            .remove(&key(company_id, upload_timestamp));
        Ok(())
    }

    async fn list_uploads(&self, company_id: &str) -> RecordStoreResult<Vec<UploadRecord>> {
        Ok(self
            .uploads
            .read()
            .await
            .iter()
            .filter(|((company, _), _)| company == company_id)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn put_extended(&self, record: &ExtendedUploadRecord) -> RecordStoreResult<()> {
        insert_new(
            &mut *self.extended.write().await,
            key(&record.company_id, &record.text_id),
            record.clone(),
        )
    }

    async fn get_extended(
        &self,
        company_id: &str,
        text_id: &str,
    ) -> RecordStoreResult<Option<ExtendedUploadRecord>> {
        Ok(self
            .extended
            .read()
            .await
            .get(&key(company_id, text_id))
            .cloned())
    }

    async fn delete_extended(&self, company_id: &str, text_id: &str) -> RecordStoreResult<()> {
        self.extended.write().await.remove(&key(company_id, text_id));
        Ok(())
    }

    async fn list_extended(
        &self,
        company_id: &str,
    ) -> RecordStoreResult<Vec<ExtendedUploadRecord>> {
        Ok(self
            .extended
            .read()
            .await
            .iter()
            .filter(|((company, _), _)| company == company_id)
            .map(|(_, record)| record.clone())
            .collect())
    }

    fn backend_type(&self) -> RecordBackend {
        RecordBackend::Memory
    }
}
