//! DynamoDB record store
//!
//! Two tables, one per record shape:
//! - uploads: partition key `company_id`, sort key `upload_timestamp`
//! - subuploads: partition key `company_id`, sort key `text_id`
//!
//! Absent asset URLs are written as DynamoDB `NULL` attributes.

use std::collections::HashMap;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use textcast_core::models::{ExtendedUploadRecord, UploadRecord};
use textcast_core::RecordBackend;

use crate::traits::{RecordStore, RecordStoreError, RecordStoreResult};

type Item = HashMap<String, AttributeValue>;

const COMPANY_ID: &str = "company_id";
const UPLOAD_TIMESTAMP: &str = "upload_timestamp";
const TEXT_ID: &str = "text_id";
const TEXT: &str = "text";
const FILE_URL: &str = "file_url";
const DESCRIPTION: &str = "description";
const AUDIO_URL: &str = "audio_url";
const THUMBNAIL_URL: &str = "thumbnail_url";
const MEDIA_URL: &str = "media_url";

#[derive(Clone)]
pub struct DynamoRecordStore {
    client: Client,
    uploads_table: String,
    subuploads_table: String,
}

impl DynamoRecordStore {
    /// Build a client for `region`. Credentials come from the standard AWS
    /// provider chain; `endpoint_url` targets DynamoDB Local or similar.
    pub async fn new(
        region: String,
        endpoint_url: Option<String>,
        uploads_table: String,
        subuploads_table: String,
    ) -> RecordStoreResult<Self> {
        if uploads_table == subuploads_table {
            return Err(RecordStoreError::Config(
                "uploads and subuploads must use different tables".to_string(),
            ));
        }

        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region))
            .load()
            .await;

        let client = match endpoint_url {
            Some(endpoint) => {
                let config = aws_sdk_dynamodb::config::Builder::from(&sdk_config)
                    .endpoint_url(endpoint)
                    .build();
                Client::from_conf(config)
            }
            None => Client::new(&sdk_config),
        };

        Ok(Self {
            client,
            uploads_table,
            subuploads_table,
        })
    }

    /// Run a key-condition query on `company_id`, following `LastEvaluatedKey`
    /// until the result set is exhausted.
    async fn query_company(&self, table: &str, company_id: &str) -> RecordStoreResult<Vec<Item>> {
        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;
        let mut pages = 0usize;

        loop {
            let output = self
                .client
                .query()
                .table_name(table)
                .key_condition_expression("#cid = :cid")
                .expression_attribute_names("#cid", COMPANY_ID)
                .expression_attribute_values(":cid", AttributeValue::S(company_id.to_string()))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| backend_error("query", table, e))?;

            pages += 1;
            items.extend(output.items.unwrap_or_default());

            match output.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        tracing::debug!(
            table = %table,
            company_id = %company_id,
            pages = pages,
            count = items.len(),
            "DynamoDB query complete"
        );

        Ok(items)
    }

    /// Conditional insert: fails with `Conflict` instead of replacing an item
    /// that already has `sort_name` set.
    async fn put_new(&self, table: &str, sort_name: &str, item: Item) -> RecordStoreResult<()> {
        let sort_value = match item.get(sort_name) {
            Some(AttributeValue::S(value)) => value.clone(),
            _ => String::new(),
        };

        let result = self
            .client
            .put_item()
            .table_name(table)
            .set_item(Some(item))
            .condition_expression("attribute_not_exists(#sk)")
            .expression_attribute_names("#sk", sort_name)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => match e.as_service_error() {
                Some(PutItemError::ConditionalCheckFailedException(_)) => {
                    tracing::warn!(table = %table, key = %sort_value, "Record key already taken");
                    Err(RecordStoreError::Conflict(sort_value))
                }
                _ => Err(backend_error("put_item", table, e)),
            },
        }
    }

    async fn get(
        &self,
        table: &str,
        company_id: &str,
        sort_name: &str,
        sort_value: &str,
    ) -> RecordStoreResult<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(table)
            .key(COMPANY_ID, AttributeValue::S(company_id.to_string()))
            .key(sort_name, AttributeValue::S(sort_value.to_string()))
            .send()
            .await
            .map_err(|e| backend_error("get_item", table, e))?;
        Ok(output.item.filter(|item| !item.is_empty()))
    }

    async fn delete(
        &self,
        table: &str,
        company_id: &str,
        sort_name: &str,
        sort_value: &str,
    ) -> RecordStoreResult<()> {
        self.client
            .delete_item()
            .table_name(table)
            .key(COMPANY_ID, AttributeValue::S(company_id.to_string()))
            .key(sort_name, AttributeValue::S(sort_value.to_string()))
            .send()
            .await
            .map_err(|e| backend_error("delete_item", table, e))?;
        Ok(())
    }
}

fn backend_error<E>(operation: &str, table: &str, err: E) -> RecordStoreError
where
    E: std::error::Error + 'static,
{
    let message = DisplayErrorContext(&err).to_string();
    tracing::error!(
        operation = %operation,
        table = %table,
        error = %message,
        "DynamoDB request failed"
    );
    RecordStoreError::Backend(format!("{} on {}: {}", operation, table, message))
}

fn string_attr(value: &str) -> AttributeValue {
    AttributeValue::S(value.to_string())
}

fn optional_attr(value: Option<&str>) -> AttributeValue {
    match value {
        Some(v) => string_attr(v),
        None => AttributeValue::Null(true),
    }
}

fn required_string(item: &Item, name: &str) -> RecordStoreResult<String> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(RecordStoreError::Decode(format!(
            "attribute '{}' is not a string",
            name
        ))),
        None => Err(RecordStoreError::Decode(format!(
            "missing attribute '{}'",
            name
        ))),
    }
}

fn optional_string(item: &Item, name: &str) -> RecordStoreResult<Option<String>> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(Some(value.clone())),
        Some(AttributeValue::Null(_)) | None => Ok(None),
        Some(_) => Err(RecordStoreError::Decode(format!(
            "attribute '{}' is not a string",
            name
        ))),
    }
}

pub(crate) fn upload_to_item(record: &UploadRecord) -> Item {
    HashMap::from([
        (COMPANY_ID.to_string(), string_attr(&record.company_id)),
        (
            UPLOAD_TIMESTAMP.to_string(),
            string_attr(&record.upload_timestamp),
        ),
        (TEXT.to_string(), string_attr(&record.text)),
        (FILE_URL.to_string(), string_attr(&record.file_url)),
    ])
}

pub(crate) fn item_to_upload(item: &Item) -> RecordStoreResult<UploadRecord> {
    Ok(UploadRecord {
        company_id: required_string(item, COMPANY_ID)?,
        upload_timestamp: required_string(item, UPLOAD_TIMESTAMP)?,
        text: required_string(item, TEXT)?,
        file_url: required_string(item, FILE_URL)?,
    })
}

pub(crate) fn extended_to_item(record: &ExtendedUploadRecord) -> Item {
    HashMap::from([
        (COMPANY_ID.to_string(), string_attr(&record.company_id)),
        (TEXT_ID.to_string(), string_attr(&record.text_id)),
        (
            UPLOAD_TIMESTAMP.to_string(),
            string_attr(&record.upload_timestamp),
        ),
        (TEXT.to_string(), string_attr(&record.text)),
        (DESCRIPTION.to_string(), string_attr(&record.description)),
        (
            AUDIO_URL.to_string(),
            optional_attr(record.audio_url.as_deref()),
        ),
        (
            THUMBNAIL_URL.to_string(),
            optional_attr(record.thumbnail_url.as_deref()),
        ),
        (
            MEDIA_URL.to_string(),
            optional_attr(record.media_url.as_deref()),
        ),
    ])
}

pub(crate) fn item_to_extended(item: &Item) -> RecordStoreResult<ExtendedUploadRecord> {
    Ok(ExtendedUploadRecord {
        company_id: required_string(item, COMPANY_ID)?,
        text_id: required_string(item, TEXT_ID)?,
        upload_timestamp: required_string(item, UPLOAD_TIMESTAMP)?,
        text: required_string(item, TEXT)?,
        description: required_string(item, DESCRIPTION)?,
        audio_url: optional_string(item, AUDIO_URL)?,
        thumbnail_url: optional_string(item, THUMBNAIL_URL)?,
        media_url: optional_string(item, MEDIA_URL)?,
    })
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    async fn put_upload(&self, record: &UploadRecord) -> RecordStoreResult<()> {
        self.put_new(&self.uploads_table, UPLOAD_TIMESTAMP, upload_to_item(record))
            .await
    }

    async fn get_upload(
        &self,
        company_id: &str,
        upload_timestamp: &str,
    ) -> RecordStoreResult<Option<UploadRecord>> {
        self.get(
            &self.uploads_table,
            company_id,
            UPLOAD_TIMESTAMP,
            upload_timestamp,
        )
        .await?
        .map(|item| item_to_upload(&item))
        .transpose()
    }

    async fn delete_upload(
        &self,
        company_id: &str,
        upload_timestamp: &str,
    ) -> RecordStoreResult<()> {
        self.delete(
            &self.uploads_table,
            company_id,
            UPLOAD_TIMESTAMP,
            upload_timestamp,
        )
        .await
    }

    async fn list_uploads(&self, company_id: &str) -> RecordStoreResult<Vec<UploadRecord>> {
        self.query_company(&self.uploads_table, company_id)
            .await?
            .iter()
            .map(item_to_upload)
            .collect()
    }

    async fn put_extended(&self, record: &ExtendedUploadRecord) -> RecordStoreResult<()> {
        self.put_new(&self.subuploads_table, TEXT_ID, extended_to_item(record))
            .await
    }

    async fn get_extended(
        &self,
        company_id: &str,
        text_id: &str,
    ) -> RecordStoreResult<Option<ExtendedUploadRecord>> {
        self.get(&self.subuploads_table, company_id, TEXT_ID, text_id)
            .await?
            .map(|item| item_to_extended(&item))
            .transpose()
    }

    async fn delete_extended(&self, company_id: &str, text_id: &str) -> RecordStoreResult<()> {
        self.delete(&self.subuploads_table, company_id, TEXT_ID, text_id)
            .await
    }

    async fn list_extended(
        &self,
        company_id: &str,
    ) -> RecordStoreResult<Vec<ExtendedUploadRecord>> {
        self.query_company(&self.subuploads_table, company_id)
            .await?
            .iter()
            .filter(|item| item.contains_key(TEXT_ID))
            .map(item_to_extended)
            .collect()
    }

    fn backend_type(&self) -> RecordBackend {
        RecordBackend::DynamoDb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extended() -> ExtendedUploadRecord {
        ExtendedUploadRecord {
            company_id: "acme".to_string(),
            text_id: "0b6d3f2e-4f7a-4d0c-9a35-2f3f4b8f9a10".to_string(),
            upload_timestamp: "2024-05-01 10:00:00.123456".to_string(),
            text: "hello".to_string(),
            description: "greeting".to_string(),
            audio_url: Some("https://b.s3.r.amazonaws.com/subuploads/x/audio/a.mp3".to_string()),
            thumbnail_url: None,
            media_url: None,
        }
    }

    #[test]
    fn test_absent_urls_are_written_as_null() {
        let item = extended_to_item(&extended());
        assert_eq!(item.get(THUMBNAIL_URL), Some(&AttributeValue::Null(true)));
        assert_eq!(item.get(MEDIA_URL), Some(&AttributeValue::Null(true)));
        assert!(matches!(item.get(AUDIO_URL), Some(AttributeValue::S(_))));
    }

    #[test]
    fn test_extended_item_decodes_back() {
        let record = extended();
        let decoded = item_to_extended(&extended_to_item(&record)).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_upload_item_missing_attribute_fails_to_decode() {
        let record = UploadRecord {
            company_id: "acme".to_string(),
            upload_timestamp: "2024-05-01 10:00:00.123456".to_string(),
            text: "hello".to_string(),
            file_url: "https://b.s3.r.amazonaws.com/uploads/a.png".to_string(),
        };
        let mut item = upload_to_item(&record);
        item.remove(FILE_URL);

        let err = item_to_upload(&item).unwrap_err();
        assert!(err.to_string().contains(FILE_URL));
    }

    #[test]
    fn test_missing_optional_attribute_decodes_as_none() {
        let mut item = extended_to_item(&extended());
        item.remove(AUDIO_URL);
        let decoded = item_to_extended(&item).unwrap();
        assert!(decoded.audio_url.is_none());
    }
}
