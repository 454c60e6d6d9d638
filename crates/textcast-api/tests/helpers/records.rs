use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use textcast_core::models::{ExtendedUploadRecord, UploadRecord};
use textcast_core::RecordBackend;
use textcast_db::{InMemoryRecordStore, RecordStore, RecordStoreError, RecordStoreResult};

/// In-memory record store with switchable failures.
#[derive(Default)]
pub struct MockRecordStore {
    inner: InMemoryRecordStore,
    fail_puts: AtomicBool,
    fail_deletes: AtomicBool,
    pending_conflicts: AtomicUsize,
    put_upload_keys: Mutex<Vec<String>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every put fails with a backend error.
    pub fn failing_puts() -> Self {
        Self {
            fail_puts: AtomicBool::new(true),
            ..Self::default()
        }
    }

    /// The next `count` simple-record puts report a taken key.
    pub fn with_conflicts(count: usize) -> Self {
        Self {
            pending_conflicts: AtomicUsize::new(count),
            ..Self::default()
        }
    }

    /// Deletes fail until [`MockRecordStore::heal`] is called.
    pub fn fail_deletes(&self) {
        self.fail_deletes.store(true, Ordering::SeqCst);
    }

    pub fn heal(&self) {
        self.fail_deletes.store(false, Ordering::SeqCst);
        self.fail_puts.store(false, Ordering::SeqCst);
    }

    /// Sort keys of every simple-record put attempt, in order.
    pub fn put_upload_keys(&self) -> Vec<String> {
        self.put_upload_keys.lock().unwrap().clone()
    }

    fn check_put(&self) -> RecordStoreResult<()> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(RecordStoreError::Backend("put_item throttled".to_string()));
        }
        Ok(())
    }

    fn check_delete(&self) -> RecordStoreResult<()> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(RecordStoreError::Backend("delete_item throttled".to_string()));
        }
        Ok(())
    }

    fn take_conflict(&self) -> bool {
        self.pending_conflicts
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    async fn put_upload(&self, record: &UploadRecord) -> RecordStoreResult<()> {
        self.put_upload_keys
            .lock()
            .unwrap()
            .push(record.upload_timestamp.clone());
        self.check_put()?;
        if self.take_conflict() {
            return Err(RecordStoreError::Conflict(record.upload_timestamp.clone()));
        }
        self.inner.put_upload(record).await
    }

    async fn get_upload(
        &self,
        company_id: &str,
        upload_timestamp: &str,
    ) -> RecordStoreResult<Option<UploadRecord>> {
        self.inner.get_upload(company_id, upload_timestamp).await
    }

    async fn delete_upload(
        &self,
        company_id: &str,
        upload_timestamp: &str,
    ) -> RecordStoreResult<()> {
        self.check_delete()?;
        self.inner.delete_upload(company_id, upload_timestamp).await
    }

    async fn list_uploads(&self, company_id: &str) -> RecordStoreResult<Vec<UploadRecord>> {
        self.inner.list_uploads(company_id).await
    }

    async fn put_extended(&self, record: &ExtendedUploadRecord) -> RecordStoreResult<()> {
        self.check_put()?;
        self.inner.put_extended(record).await
    }

    async fn get_extended(
        &self,
        company_id: &str,
        text_id: &str,
    ) -> RecordStoreResult<Option<ExtendedUploadRecord>> {
        self.inner.get_extended(company_id, text_id).await
    }

    async fn delete_extended(&self, company_id: &str, text_id: &str) -> RecordStoreResult<()> {
        self.check_delete()?;
        self.inner.delete_extended(company_id, text_id).await
    }

    async fn list_extended(
        &self,
        company_id: &str,
    ) -> RecordStoreResult<Vec<ExtendedUploadRecord>> {
        self.inner.list_extended(company_id).await
    }

    fn backend_type(&self) -> RecordBackend {
        RecordBackend::Memory
    }
}
