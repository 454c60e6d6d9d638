//! Per-item results returned by the batch upload endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::record::ExtendedUploadRecord;

pub const UPLOAD_SUCCESSFUL: &str = "Upload successful";
pub const NO_FILE_SELECTED: &str = "No file selected";
pub const UPLOAD_ERROR: &str = "Error processing the upload";

/// Result of one `(text, file)` pair of a simple upload batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SimpleUploadOutcome {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SimpleUploadOutcome {
    pub fn uploaded(file_url: String) -> Self {
        Self {
            message: UPLOAD_SUCCESSFUL.to_string(),
            file_url: Some(file_url),
            error: None,
        }
    }

    pub fn no_file() -> Self {
        Self {
            message: NO_FILE_SELECTED.to_string(),
            file_url: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            message: UPLOAD_ERROR.to_string(),
            file_url: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.file_url.is_some()
    }
}

/// Result of one item of an extended upload batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtendedUploadOutcome {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ExtendedUploadRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtendedUploadOutcome {
    pub fn uploaded(record: ExtendedUploadRecord) -> Self {
        Self {
            message: UPLOAD_SUCCESSFUL.to_string(),
            data: Some(record),
            error: None,
        }
    }

    pub fn skipped(index: usize) -> Self {
        Self {
            message: format!("Missing required fields for item index: {}", index),
            data: None,
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            message: UPLOAD_ERROR.to_string(),
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some()
    }
}
