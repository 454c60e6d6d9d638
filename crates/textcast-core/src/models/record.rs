use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Metadata for a simple text + file upload.
///
/// Keyed by `(company_id, upload_timestamp)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UploadRecord {
    pub company_id: String,
    pub upload_timestamp: String,
    pub text: String,
    pub file_url: String,
}

/// Metadata for an extended upload: text, description and the generated or
/// uploaded assets grouped under one `text_id`.
///
/// Keyed by `(company_id, text_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExtendedUploadRecord {
    pub company_id: String,
    pub text_id: String,
    pub upload_timestamp: String,
    pub text: String,
    pub description: String,
    pub audio_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub media_url: Option<String>,
}

impl ExtendedUploadRecord {
    /// Asset URLs that are set, in deletion order (audio, thumbnail, media).
    pub fn asset_urls(&self) -> Vec<(AssetKind, &str)> {
        [
            (AssetKind::Audio, self.audio_url.as_deref()),
            (AssetKind::Thumbnail, self.thumbnail_url.as_deref()),
            (AssetKind::Media, self.media_url.as_deref()),
        ]
        .into_iter()
        .filter_map(|(kind, url)| url.map(|u| (kind, u)))
        .collect()
    }
}

/// Kind of asset stored under `subuploads/{text_id}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Audio,
    Thumbnail,
    Media,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Audio => "audio",
            AssetKind::Thumbnail => "thumbnail",
            AssetKind::Media => "media",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
