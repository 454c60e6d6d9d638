//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p textcast-api`.

#![allow(dead_code)]

pub mod records;
pub mod speech;
pub mod storage;

use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use textcast_api::setup::routes;
use textcast_api::state::AppState;
use textcast_core::{BaseConfig, Config, RecordBackend, ServiceConfig, StorageBackend};
use textcast_processing::{Narrator, VoiceProfile};

use records::MockRecordStore;
use speech::{CopyTranscoder, FakeSynthesizer};
use storage::MockStorage;

pub const COMPANY_ID: &str = "test-company";

/// Test application: server plus handles on every fake collaborator.
pub struct TestApp {
    pub server: TestServer,
    pub storage: Arc<MockStorage>,
    pub records: Arc<MockRecordStore>,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub work_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn work_dir(&self) -> &Path {
        self.work_dir.path()
    }

    /// Number of entries left in the narration work directory.
    pub fn leftover_work_files(&self) -> usize {
        std::fs::read_dir(self.work_dir.path())
            .expect("Failed to read work dir")
            .count()
    }
}

/// Collaborators and environment of a test application.
#[derive(Default)]
pub struct TestAppOptions {
    pub storage: MockStorage,
    pub synthesizer: FakeSynthesizer,
    pub records: MockRecordStore,
    /// Defaults to `development`.
    pub environment: Option<String>,
}

pub fn test_config(work_dir: &Path) -> Config {
    test_config_for(work_dir, "development")
}

pub fn test_config_for(work_dir: &Path, environment: &str) -> Config {
    Config::new(ServiceConfig {
        base: BaseConfig {
            environment: environment.to_string(),
            ..BaseConfig::default()
        },
        company_id: COMPANY_ID.to_string(),
        storage_backend: Some(StorageBackend::Local),
        local_storage_path: Some(work_dir.to_string_lossy().to_string()),
        local_storage_base_url: Some(storage::BASE_URL.to_string()),
        metadata_backend: Some(RecordBackend::Memory),
        azure_speech_key: "test-key".to_string(),
        azure_service_region: "japaneast".to_string(),
        audio_work_dir: Some(work_dir.to_path_buf()),
        ..ServiceConfig::default()
    })
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_from(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(storage: MockStorage, synthesizer: FakeSynthesizer) -> TestApp {
    setup_test_app_from(TestAppOptions {
        storage,
        synthesizer,
        ..TestAppOptions::default()
    })
    .await
}

pub async fn setup_test_app_from(options: TestAppOptions) -> TestApp {
    let work_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let environment = options.environment.as_deref().unwrap_or("development");
    let config = test_config_for(work_dir.path(), environment);

    let storage = Arc::new(options.storage);
    let records = Arc::new(options.records);
    let synthesizer = Arc::new(options.synthesizer);

    let narrator = Narrator::new(
        synthesizer.clone(),
        Arc::new(CopyTranscoder),
        VoiceProfile::default(),
    )
    .with_work_dir(work_dir.path());

    let state = Arc::new(AppState::new(
        config.clone(),
        storage.clone(),
        records.clone(),
        Arc::new(narrator),
    ));

    let app = routes::setup_routes(&config, state)
        .await
        .expect("Failed to set up routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        storage,
        records,
        synthesizer,
        work_dir,
    }
}

pub fn file_part(name: &str, content: &'static [u8], mime: &str) -> Part {
    Part::bytes(Bytes::from_static(content))
        .file_name(name.to_string())
        .mime_type(mime.to_string())
}

/// A file field submitted without choosing a file.
pub fn empty_file_part() -> Part {
    Part::bytes(Bytes::new())
        .file_name(String::new())
        .mime_type("application/octet-stream")
}

/// Simple form with one `text[]`/`file[]` pair per entry.
pub fn simple_form(items: Vec<(&str, Part)>) -> MultipartForm {
    items
        .into_iter()
        .fold(MultipartForm::new(), |form, (text, part)| {
            form.add_text("text[]", text).add_part("file[]", part)
        })
}
