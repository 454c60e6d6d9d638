//! Batch upload flows for the simple and extended forms.
//!
//! Items are processed one after another. A failing item never aborts the
//! batch: it contributes an outcome entry describing the failure instead.

use textcast_core::models::{
    AssetKind, ExtendedUploadOutcome, ExtendedUploadRecord, SimpleUploadOutcome, UploadRecord,
};
use textcast_core::naming::{generate_unique_filename, new_record_id, upload_timestamp};
use textcast_core::{AppError, ErrorMetadata};
use textcast_db::RecordStoreError;
use textcast_storage::keys::{subupload_key, upload_key};

use crate::constants::DEFAULT_CONTENT_TYPE;
use crate::state::AppState;
use crate::utils::multipart::FormPart;

/// Attempts at claiming a free sort-key timestamp before giving up.
const RECORD_WRITE_ATTEMPTS: usize = 3;

/// One index of an extended batch after the form lists have been aligned.
#[derive(Debug, Default, Clone)]
pub struct ExtendedItem<'a> {
    pub text: Option<&'a str>,
    pub description: Option<&'a str>,
    pub thumbnail: Option<&'a FormPart>,
    pub media: Option<&'a FormPart>,
}

impl<'a> ExtendedItem<'a> {
    /// Align the four form lists by index, up to the longest one.
    pub fn align(
        texts: &'a [String],
        descriptions: &'a [String],
        thumbnails: &'a [FormPart],
        media: &'a [FormPart],
    ) -> Vec<Self> {
        let len = texts
            .len()
            .max(descriptions.len())
            .max(thumbnails.len())
            .max(media.len());

        (0..len)
            .map(|i| ExtendedItem {
                text: texts.get(i).map(String::as_str),
                description: descriptions.get(i).map(String::as_str),
                thumbnail: thumbnails.get(i),
                media: media.get(i),
            })
            .collect()
    }

    fn required_fields(&self) -> Option<(&'a str, &'a str)> {
        let text = self.text.filter(|t| !t.trim().is_empty())?;
        let description = self.description.filter(|d| !d.trim().is_empty())?;
        Some((text, description))
    }
}

pub struct UploadService<'a> {
    state: &'a AppState,
    last_timestamp: Option<String>,
}

impl<'a> UploadService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            last_timestamp: None,
        }
    }

    /// Sort-key timestamp, distinct from every other one issued in this batch.
    async fn next_timestamp(&mut self) -> String {
        let mut timestamp = upload_timestamp();
        while self.last_timestamp.as_deref() == Some(timestamp.as_str()) {
            tokio::task::yield_now().await;
            timestamp = upload_timestamp();
        }
        self.last_timestamp = Some(timestamp.clone());
        timestamp
    }

    async fn store_part(&self, storage_key: &str, part: &FormPart) -> Result<String, AppError> {
        let content_type = part.content_type.as_deref().unwrap_or(DEFAULT_CONTENT_TYPE);
        let url = self
            .state
            .storage
            .upload_with_key(storage_key, part.data.clone(), content_type)
            .await?;
        Ok(url)
    }

    /// Upload `(text, file)` pairs; lists of unequal length are cut to the shorter.
    pub async fn upload_simple(
        &mut self,
        texts: &[String],
        files: &[FormPart],
    ) -> Vec<SimpleUploadOutcome> {
        let mut outcomes = Vec::with_capacity(texts.len().min(files.len()));

        for (text, file) in texts.iter().zip(files) {
            let Some(original_name) = file.selected_file_name() else {
                outcomes.push(SimpleUploadOutcome::no_file());
                continue;
            };

            let outcome = match self.upload_pair(text, original_name, file).await {
                Ok(file_url) => SimpleUploadOutcome::uploaded(file_url),
                Err(e) => {
                    tracing::error!(error = %e, file_name = %original_name, "Simple upload item failed");
                    SimpleUploadOutcome::failed(e.detailed_message())
                }
            };
            outcomes.push(outcome);
        }

        tracing::info!(
            items = outcomes.len(),
            succeeded = outcomes.iter().filter(|o| o.is_success()).count(),
            "Simple upload batch processed"
        );
        outcomes
    }

    async fn upload_pair(
        &mut self,
        text: &str,
        original_name: &str,
        file: &FormPart,
    ) -> Result<String, AppError> {
        let storage_key = upload_key(&generate_unique_filename(original_name));
        let file_url = self.store_part(&storage_key, file).await?;

        let mut record = UploadRecord {
            company_id: self.state.company_id().to_string(),
            upload_timestamp: self.next_timestamp().await,
            text: text.to_string(),
            file_url: file_url.clone(),
        };

        let mut attempt = 1;
        loop {
            match self.state.records.put_upload(&record).await {
                Ok(()) => break,
                Err(RecordStoreError::Conflict(_)) if attempt < RECORD_WRITE_ATTEMPTS => {
                    tracing::debug!(
                        upload_timestamp = %record.upload_timestamp,
                        attempt,
                        "Timestamp already taken, retrying with a fresh one"
                    );
                    record.upload_timestamp = self.next_timestamp().await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        error = %e,
                        storage_key = %storage_key,
                        "Record write failed; uploaded object is orphaned"
                    );
                    return Err(e.into());
                }
            }
        }

        tracing::info!(
            upload_timestamp = %record.upload_timestamp,
            storage_key = %storage_key,
            "Simple upload stored"
        );
        Ok(file_url)
    }

    /// Process an aligned extended batch.
    ///
    /// Fails with `InvalidInput` when no item carries both text and description.
    pub async fn upload_extended(
        &mut self,
        items: &[ExtendedItem<'_>],
    ) -> Result<Vec<ExtendedUploadOutcome>, AppError> {
        if !items.iter().any(|item| item.required_fields().is_some()) {
            return Err(AppError::InvalidInput(
                "No item carries both text and description".to_string(),
            ));
        }

        let mut outcomes = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let Some((text, description)) = item.required_fields() else {
                tracing::debug!(index, "Skipping extended item with missing fields");
                outcomes.push(ExtendedUploadOutcome::skipped(index));
                continue;
            };

            let outcome = match self.upload_item(item, text, description).await {
                Ok(record) => ExtendedUploadOutcome::uploaded(record),
                Err(e) => {
                    tracing::error!(error = %e, index, "Extended upload item failed");
                    ExtendedUploadOutcome::failed(e.detailed_message())
                }
            };
            outcomes.push(outcome);
        }

        tracing::info!(
            items = outcomes.len(),
            succeeded = outcomes.iter().filter(|o| o.is_success()).count(),
            "Extended upload batch processed"
        );
        Ok(outcomes)
    }

    #[tracing::instrument(skip_all, fields(text_id = tracing::field::Empty))]
    async fn upload_item(
        &mut self,
        item: &ExtendedItem<'_>,
        text: &str,
        description: &str,
    ) -> Result<ExtendedUploadRecord, AppError> {
        let text_id = new_record_id();
        tracing::Span::current().record("text_id", text_id.as_str());

        let audio_url = self.narrate_and_store(&text_id, description).await;
        let thumbnail_url = self
            .store_asset(&text_id, AssetKind::Thumbnail, item.thumbnail)
            .await;
        let media_url = self.store_asset(&text_id, AssetKind::Media, item.media).await;

        let record = ExtendedUploadRecord {
            company_id: self.state.company_id().to_string(),
            text_id,
            upload_timestamp: self.next_timestamp().await,
            text: text.to_string(),
            description: description.to_string(),
            audio_url,
            thumbnail_url,
            media_url,
        };

        if let Err(e) = self.state.records.put_extended(&record).await {
            let orphaned: Vec<&str> = record.asset_urls().into_iter().map(|(_, url)| url).collect();
            tracing::warn!(
                error = %e,
                orphaned = ?orphaned,
                "Record write failed; uploaded assets are orphaned"
            );
            return Err(e.into());
        }

        tracing::info!(text_id = %record.text_id, "Extended upload stored");
        Ok(record)
    }

    async fn narrate_and_store(&self, text_id: &str, description: &str) -> Option<String> {
        let audio = match self.state.narrator.narrate(description).await {
            Ok(audio) => audio,
            Err(e) => {
                let err = AppError::from(e);
                tracing::warn!(
                    error = %err,
                    error_code = err.error_code(),
                    error_type = err.error_type(),
                    "Narration failed; storing item without audio"
                );
                return None;
            }
        };

        let storage_key = subupload_key(text_id, AssetKind::Audio, audio.filename());
        match self
            .state
            .storage
            .upload_from_path(&storage_key, audio.path(), audio.content_type())
            .await
        {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, storage_key = %storage_key, "Audio upload failed");
                None
            }
        }
        // `audio` drops here and its scratch directory goes with it
    }

    async fn store_asset(
        &self,
        text_id: &str,
        kind: AssetKind,
        part: Option<&FormPart>,
    ) -> Option<String> {
        let part = part?;
        let original_name = part.selected_file_name()?;
        let storage_key = subupload_key(text_id, kind, &generate_unique_filename(original_name));

        match self.store_part(&storage_key, part).await {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(error = %e, kind = %kind, storage_key = %storage_key, "Asset upload failed");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn part(name: &str) -> FormPart {
        FormPart {
            file_name: Some(name.to_string()),
            content_type: None,
            data: Bytes::from_static(b"x"),
        }
    }

    #[test]
    fn test_align_pads_to_longest_list() {
        let texts = vec!["a".to_string(), "b".to_string()];
        let descriptions = vec!["first".to_string()];
        let thumbnails = vec![part("t.png"), part("u.png"), part("v.png")];

        let items = ExtendedItem::align(&texts, &descriptions, &thumbnails, &[]);

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].required_fields(), Some(("a", "first")));
        assert!(items[1].required_fields().is_none());
        assert!(items[2].text.is_none());
        assert!(items[2].thumbnail.is_some());
        assert!(items.iter().all(|item| item.media.is_none()));
    }

    #[test]
    fn test_blank_fields_are_missing() {
        let item = ExtendedItem {
            text: Some("hello"),
            description: Some("  "),
            ..Default::default()
        };
        assert!(item.required_fields().is_none());
    }
}
