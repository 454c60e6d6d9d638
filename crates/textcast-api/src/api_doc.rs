//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use textcast_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Textcast API",
        version = "0.1.0",
        description = "Upload text with files, narrate descriptions to audio and manage the stored records."
    ),
    paths(
        handlers::upload::upload,
        handlers::upload_extended::upload_extended,
        handlers::list::list_texts,
        handlers::list::list_extended_uploads,
        handlers::delete::delete_upload,
        handlers::delete::delete_subupload,
        handlers::health::health_check,
    ),
    components(schemas(
        models::UploadRecord,
        models::ExtendedUploadRecord,
        models::SimpleUploadOutcome,
        models::ExtendedUploadOutcome,
        models::DeleteUploadRequest,
        models::DeleteSubuploadRequest,
        models::MessageResponse,
        handlers::health::HealthResponse,
        error::ErrorResponse,
    )),
    tags(
        (name = "uploads", description = "Batch uploads"),
        (name = "records", description = "Listing and deletion of stored uploads"),
        (name = "health", description = "Liveness")
    )
)]
pub struct ApiDoc;
