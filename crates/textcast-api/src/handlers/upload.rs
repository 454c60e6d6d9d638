use crate::error::{ErrorResponse, HttpAppError};
use crate::services::UploadService;
use crate::state::AppState;
use crate::utils::multipart::FormFields;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use textcast_core::models::SimpleUploadOutcome;

/// Upload a batch of `(text, file)` pairs.
///
/// Returns one outcome per pair; the lists are cut to the shorter one.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "uploads",
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "Repeated `text[]` and `file[]` fields, paired by position"
    ),
    responses(
        (status = 200, description = "Per-pair outcomes", body = [SimpleUploadOutcome]),
        (status = 400, description = "Not a readable multipart form", body = ErrorResponse),
        (status = 413, description = "Request body too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<SimpleUploadOutcome>>, HttpAppError> {
    let fields = FormFields::collect(multipart?).await?;
    let texts = fields.texts("text");
    let files = fields.parts("file");

    tracing::debug!(texts = texts.len(), files = files.len(), "Simple upload batch received");

    let outcomes = UploadService::new(&state)
        .upload_simple(&texts, files)
        .await;

    Ok(Json(outcomes))
}
