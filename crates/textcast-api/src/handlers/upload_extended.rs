use crate::error::{ErrorResponse, HttpAppError};
use crate::services::{ExtendedItem, UploadService};
use crate::state::AppState;
use crate::utils::multipart::FormFields;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use textcast_core::models::{ExtendedUploadOutcome, UPLOAD_ERROR};
use textcast_core::AppError;

/// Upload a batch of narrated items.
///
/// Each item needs `text[i]` and `description[i]`; `thumbnail[i]` and
/// `media[i]` are optional. The description is narrated and stored as audio.
#[utoipa::path(
    post,
    path = "/upload_extended",
    tag = "uploads",
    request_body(
        content = inline(Object),
        content_type = "multipart/form-data",
        description = "Repeated `text[]`, `description[]`, `thumbnail[]` and `media[]` fields, matched by position"
    ),
    responses(
        (status = 200, description = "Per-item outcomes", body = [ExtendedUploadOutcome]),
        (status = 400, description = "Malformed form or no valid item", body = ErrorResponse),
        (status = 500, description = "Error processing the upload", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_extended"))]
pub async fn upload_extended(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Vec<ExtendedUploadOutcome>>, HttpAppError> {
    let fields = FormFields::collect(multipart?).await?;
    let texts = fields.texts("text");
    let descriptions = fields.texts("description");
    let items = ExtendedItem::align(
        &texts,
        &descriptions,
        fields.parts("thumbnail"),
        fields.parts("media"),
    );

    tracing::debug!(items = items.len(), "Extended upload batch received");

    match UploadService::new(&state).upload_extended(&items).await {
        Ok(outcomes) => Ok(Json(outcomes)),
        Err(e @ (AppError::InvalidInput(_) | AppError::BadRequest(_))) => Err(e.into()),
        Err(e) => Err(HttpAppError::from(e).context(UPLOAD_ERROR)),
    }
}
