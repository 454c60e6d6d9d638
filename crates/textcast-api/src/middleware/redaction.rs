use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::error::RedactedError;
use crate::state::AppState;

/// Replace detailed bodies of sensitive server errors in production.
pub async fn redact_sensitive_errors(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    if !state.config.is_production() {
        return response;
    }

    match response.extensions().get::<RedactedError>().cloned() {
        Some(RedactedError(body)) => (response.status(), Json(body)).into_response(),
        None => response,
    }
}
