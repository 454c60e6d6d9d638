//! Route paths and fixed response messages

pub const UPLOAD_PATH: &str = "/upload";
pub const UPLOAD_EXTENDED_PATH: &str = "/upload_extended";
pub const LIST_TEXTS_PATH: &str = "/list_texts";
pub const LIST_EXTENDED_PATH: &str = "/list_extended_uploads";
pub const DELETE_PATH: &str = "/delete";
pub const DELETE_SUBUPLOAD_PATH: &str = "/delete_subupload";
pub const HEALTH_PATH: &str = "/health";
pub const OPENAPI_PATH: &str = "/api/openapi.json";

pub const ITEM_NOT_FOUND: &str = "Item not found";
pub const DELETE_SUCCESSFUL: &str = "Delete successful";
pub const DELETE_ERROR: &str = "Error deleting item";

/// Content type used when a multipart file part does not declare one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";
