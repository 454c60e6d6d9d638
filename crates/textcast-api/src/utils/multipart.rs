//! Collect a multipart form into repeated, named parts.

use std::collections::HashMap;

use axum::extract::multipart::MultipartError;
use axum::extract::Multipart;
use axum::http::StatusCode;
use bytes::Bytes;
use textcast_core::AppError;

/// One part of a multipart form.
#[derive(Debug, Clone)]
pub struct FormPart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl FormPart {
    /// Client-supplied file name, if the part carries a non-empty one.
    pub fn selected_file_name(&self) -> Option<&str> {
        self.file_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

/// Parts grouped by field name, in submission order. Field names are stored
/// without a trailing `[]` so `text[]` and `text` address the same list.
#[derive(Debug, Default)]
pub struct FormFields {
    parts: HashMap<String, Vec<FormPart>>,
}

fn normalize_name(name: &str) -> &str {
    name.strip_suffix("[]").unwrap_or(name)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::BadRequest(format!("Failed to read multipart: {}", err.body_text()))
    }
}

impl FormFields {
    pub async fn collect(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut fields = FormFields::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = normalize_name(field.name().unwrap_or_default()).to_string();
            let file_name = field.file_name().map(str::to_string);
            let content_type = field.content_type().map(str::to_string);
            let data = field.bytes().await.map_err(multipart_error)?;

            fields.push(
                name,
                FormPart {
                    file_name,
                    content_type,
                    data,
                },
            );
        }

        Ok(fields)
    }

    pub fn push(&mut self, name: impl AsRef<str>, part: FormPart) {
        self.parts
            .entry(normalize_name(name.as_ref()).to_string())
            .or_default()
            .push(part);
    }

    pub fn parts(&self, name: &str) -> &[FormPart] {
        self.parts
            .get(normalize_name(name))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn texts(&self, name: &str) -> Vec<String> {
        self.parts(name).iter().map(FormPart::text).collect()
    }
}
