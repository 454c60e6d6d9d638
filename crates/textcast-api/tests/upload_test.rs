//! Simple upload integration tests.
//!
//! Run with: `cargo test -p textcast-api --test upload_test`

mod helpers;

use axum_test::multipart::MultipartForm;
use helpers::records::MockRecordStore;
use helpers::speech::FakeSynthesizer;
use helpers::storage::MockStorage;
use helpers::{
    empty_file_part, file_part, setup_test_app, setup_test_app_from, setup_test_app_with,
    simple_form, TestAppOptions, COMPANY_ID,
};
use serde_json::Value;
use textcast_db::RecordStore;

#[tokio::test]
async fn test_upload_pairs_file_and_missing_file() {
    let app = setup_test_app().await;

    let form = simple_form(vec![
        ("a", file_part("x.png", b"\x89PNG", "image/png")),
        ("b", empty_file_part()),
    ]);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    let entries = body.as_array().expect("array body");
    assert_eq!(entries.len(), 2);

    assert_eq!(entries[0]["message"], "Upload successful");
    let file_url = entries[0]["file_url"].as_str().expect("file_url");
    assert!(file_url.contains("uploads/"));
    assert!(file_url.ends_with(".png"));

    assert_eq!(entries[1], serde_json::json!({"message": "No file selected"}));

    let records = app.records.list_uploads(COMPANY_ID).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].text, "a");
    assert_eq!(records[0].file_url, file_url);
    assert_eq!(app.storage.upload_calls().len(), 1);
}

#[tokio::test]
async fn test_upload_stores_bytes_and_content_type() {
    let app = setup_test_app().await;

    let form = simple_form(vec![("caption", file_part("clip.mp4", b"mp4-bytes", "video/mp4"))]);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let keys = app.storage.keys();
    assert_eq!(keys.len(), 1);
    assert!(keys[0].starts_with("uploads/"));

    let object = app.storage.object(&keys[0]).unwrap();
    assert_eq!(&object.data[..], b"mp4-bytes");
    assert_eq!(object.content_type, "video/mp4");
}

#[tokio::test]
async fn test_upload_truncates_to_shorter_list() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("text[]", "one")
        .add_text("text[]", "two")
        .add_text("text[]", "three")
        .add_part("file[]", file_part("a.txt", b"a", "text/plain"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>().as_array().unwrap().len(), 1);
    assert_eq!(app.records.list_uploads(COMPANY_ID).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_upload_accepts_field_names_without_brackets() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("text", "plain")
        .add_part("file", file_part("a.txt", b"a", "text/plain"));
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()[0]["message"], "Upload successful");
}

#[tokio::test]
async fn test_upload_unique_names_for_same_file_name() {
    let app = setup_test_app().await;

    let form = simple_form(vec![
        ("first", file_part("same.png", b"1", "image/png")),
        ("second", file_part("same.png", b"2", "image/png")),
    ]);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(app.storage.keys().len(), 2);

    let records = app.records.list_uploads(COMPANY_ID).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_ne!(records[0].upload_timestamp, records[1].upload_timestamp);
}

#[tokio::test]
async fn test_upload_storage_failure_is_reported_per_item() {
    let app = setup_test_app_with(MockStorage::failing_uploads(), FakeSynthesizer::new()).await;

    let form = simple_form(vec![
        ("a", file_part("x.png", b"1", "image/png")),
        ("b", empty_file_part()),
    ]);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body[0]["message"], "Error processing the upload");
    assert!(body[0]["error"].as_str().unwrap().contains("bucket unavailable"));
    assert_eq!(body[1]["message"], "No file selected");
    assert!(app.records.list_uploads(COMPANY_ID).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_rejects_non_multipart_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/upload")
        .json(&serde_json::json!({"text": ["a"]}))
        .await;

    assert_eq!(response.status_code(), 400);
    assert!(response.json::<Value>()["message"].is_string());
}

#[tokio::test]
async fn test_health_and_openapi() {
    let app = setup_test_app().await;

    let health = app.client().get("/health").await;
    assert_eq!(health.status_code(), 200);
    assert_eq!(health.json::<Value>()["status"], "healthy");

    let doc = app.client().get("/api/openapi.json").await;
    assert_eq!(doc.status_code(), 200);
    assert!(doc.json::<Value>()["paths"]["/upload_extended"].is_object());
}

#[tokio::test]
async fn test_upload_record_failure_orphans_object_and_continues() {
    let app = setup_test_app_from(TestAppOptions {
        records: MockRecordStore::failing_puts(),
        ..TestAppOptions::default()
    })
    .await;

    let form = simple_form(vec![
        ("a", file_part("x.png", b"1", "image/png")),
        ("b", file_part("y.png", b"2", "image/png")),
    ]);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body.as_array().unwrap().len(), 2);
    for entry in body.as_array().unwrap() {
        assert_eq!(entry["message"], "Error processing the upload");
        assert!(entry["error"].as_str().unwrap().contains("throttled"));
    }
    // Both objects were stored before their record writes failed.
    assert_eq!(app.storage.keys().len(), 2);
    assert!(app.records.list_uploads(COMPANY_ID).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_retries_taken_timestamp() {
    let app = setup_test_app_from(TestAppOptions {
        records: MockRecordStore::with_conflicts(1),
        ..TestAppOptions::default()
    })
    .await;

    let form = simple_form(vec![("a", file_part("x.png", b"1", "image/png"))]);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>()[0]["message"], "Upload successful");

    let attempts = app.records.put_upload_keys();
    assert_eq!(attempts.len(), 2);
    assert_ne!(attempts[0], attempts[1]);

    let records = app.records.list_uploads(COMPANY_ID).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].upload_timestamp, attempts[1]);
}

#[tokio::test]
async fn test_upload_gives_up_after_repeated_conflicts() {
    let app = setup_test_app_from(TestAppOptions {
        records: MockRecordStore::with_conflicts(10),
        ..TestAppOptions::default()
    })
    .await;

    let form = simple_form(vec![("a", file_part("x.png", b"1", "image/png"))]);
    let response = app.client().post("/upload").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    let body = response.json::<Value>();
    assert_eq!(body[0]["message"], "Error processing the upload");
    assert!(body[0]["error"].as_str().unwrap().contains("already exists"));
    assert_eq!(app.records.put_upload_keys().len(), 3);
}
