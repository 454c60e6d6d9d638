use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{extract::State, Json};
use std::sync::Arc;
use textcast_core::models::{ExtendedUploadRecord, UploadRecord};
use textcast_core::AppError;

#[utoipa::path(
    get,
    path = "/list_texts",
    tag = "records",
    responses(
        (status = 200, description = "Simple uploads of the company", body = [UploadRecord]),
        (status = 500, description = "Record store error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_texts"))]
pub async fn list_texts(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UploadRecord>>, HttpAppError> {
    let records = state
        .records
        .list_uploads(state.company_id())
        .await
        .map_err(AppError::from)?;
    tracing::debug!(count = records.len(), "Listed simple uploads");
    Ok(Json(records))
}

#[utoipa::path(
    get,
    path = "/list_extended_uploads",
    tag = "records",
    responses(
        (status = 200, description = "Extended uploads of the company", body = [ExtendedUploadRecord]),
        (status = 500, description = "Record store error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state), fields(operation = "list_extended_uploads"))]
pub async fn list_extended_uploads(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ExtendedUploadRecord>>, HttpAppError> {
    let records = state
        .records
        .list_extended(state.company_id())
        .await
        .map_err(AppError::from)?;
    tracing::debug!(count = records.len(), "Listed extended uploads");
    Ok(Json(records))
}
