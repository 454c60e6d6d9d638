use crate::constants::{DELETE_ERROR, DELETE_SUCCESSFUL};
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::DeletionService;
use crate::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use textcast_core::models::{DeleteSubuploadRequest, DeleteUploadRequest, MessageResponse};

/// Delete a simple upload and its stored file.
#[utoipa::path(
    post,
    path = "/delete",
    tag = "records",
    request_body = DeleteUploadRequest,
    responses(
        (status = 200, description = "Upload deleted", body = MessageResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Error deleting item", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(upload_timestamp = %request.upload_timestamp, operation = "delete_upload")
)]
pub async fn delete_upload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DeleteUploadRequest>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    DeletionService::new(&state)
        .delete_simple(&request.upload_timestamp)
        .await
        .map_err(|e| HttpAppError::from(e).context(DELETE_ERROR))?;

    Ok(Json(MessageResponse::new(DELETE_SUCCESSFUL)))
}

/// Delete an extended upload and every asset it references.
#[utoipa::path(
    post,
    path = "/delete_subupload",
    tag = "records",
    request_body = DeleteSubuploadRequest,
    responses(
        (status = 200, description = "Upload deleted", body = MessageResponse),
        (status = 400, description = "Malformed JSON body", body = ErrorResponse),
        (status = 404, description = "Item not found", body = ErrorResponse),
        (status = 500, description = "Error deleting item", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(text_id = %request.text_id, operation = "delete_subupload")
)]
pub async fn delete_subupload(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<DeleteSubuploadRequest>,
) -> Result<Json<MessageResponse>, HttpAppError> {
    DeletionService::new(&state)
        .delete_extended(&request.text_id)
        .await
        .map_err(|e| HttpAppError::from(e).context(DELETE_ERROR))?;

    Ok(Json(MessageResponse::new(DELETE_SUCCESSFUL)))
}
