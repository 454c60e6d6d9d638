use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of `POST /delete`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteUploadRequest {
    pub upload_timestamp: String,
}

/// Body of `POST /delete_subupload`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteSubuploadRequest {
    pub text_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
