//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Any `AppError` (or a backend
//! error that converts into one) renders as `{message, error?, code}` with the
//! status code from [`ErrorMetadata`].
//!
//! Sensitive server errors also carry a [`RedactedError`] response extension;
//! in production the redaction middleware swaps it in for the detailed body.

use axum::{
    extract::multipart::MultipartRejection,
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use textcast_core::{AppError, ErrorMetadata, LogLevel};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
}

/// Body to send instead of the detailed one when sensitive details are hidden.
#[derive(Debug, Clone)]
pub struct RedactedError(pub ErrorResponse);

/// Wrapper around `AppError` implementing `IntoResponse`.
///
/// `context` replaces the top-level message of server errors (for example
/// "Error deleting item") while the underlying cause goes into `error`.
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub context: Option<String>,
}

impl HttpAppError {
    pub fn context(mut self, message: impl Into<String>) -> Self {
        self.context = Some(message.into());
        self
    }
}

impl From<AppError> for HttpAppError {
    fn from(error: AppError) -> Self {
        HttpAppError {
            error,
            context: None,
        }
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::from(err).into()
    }
}

/// Convert JSON body deserialization failures into a 400.
impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text())).into()
    }
}

/// A request that is not a readable multipart form is a client error.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::BadRequest(format!("Invalid multipart request: {}", rejection.body_text()))
            .into()
    }
}

/// JSON body extractor that returns our ErrorResponse format (400 + JSON) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(HttpAppError::from)?;
        Ok(ValidatedJson(inner))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

impl HttpAppError {
    fn to_body(&self, hide_sensitive: bool) -> (StatusCode, ErrorResponse) {
        let app_error = &self.error;
        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if !status.is_server_error() {
            return (
                status,
                ErrorResponse {
                    message: app_error.client_message(),
                    error: None,
                    code: app_error.error_code().to_string(),
                },
            );
        }

        let hide = hide_sensitive && app_error.is_sensitive();
        let detail = if hide {
            app_error.client_message()
        } else {
            app_error.detailed_message()
        };

        let (message, error) = match &self.context {
            Some(context) => (context.clone(), Some(detail)),
            None if hide => (app_error.client_message(), None),
            None => (app_error.client_message(), Some(detail)),
        };

        (
            status,
            ErrorResponse {
                message,
                error,
                code: app_error.error_code().to_string(),
            },
        )
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        log_error(&self.error);
        let (status, body) = self.to_body(false);
        let mut response = (status, Json(body)).into_response();

        if status.is_server_error() && self.error.is_sensitive() {
            let (_, redacted) = self.to_body(true);
            response.extensions_mut().insert(RedactedError(redacted));
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_has_message_only() {
        let (status, body) =
            HttpAppError::from(AppError::NotFound("Item not found".to_string()))
                .context("Error deleting item")
                .to_body(true);
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Item not found");
        assert!(body.error.is_none());
    }

    #[test]
    fn test_server_error_uses_context_and_carries_cause() {
        let (status, body) = HttpAppError::from(AppError::PartialFailure(
            "subuploads/t/media/a.mp4".to_string(),
        ))
        .context("Error deleting item")
        .to_body(true);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Error deleting item");
        assert!(body.error.unwrap().contains("subuploads/t/media/a.mp4"));
        assert_eq!(body.code, "PARTIAL_FAILURE");
    }

    #[test]
    fn test_sensitive_error_hides_cause_when_asked() {
        let error = HttpAppError::from(AppError::Internal(
            "Cannot derive storage key from URL: https://elsewhere/a.png".to_string(),
        ))
        .context("Error deleting item");

        let (_, detailed) = error.to_body(false);
        assert!(detailed.error.unwrap().contains("elsewhere"));

        let (_, hidden) = error.to_body(true);
        assert_eq!(hidden.message, "Error deleting item");
        assert_eq!(hidden.error.as_deref(), Some("Internal server error"));
    }

    #[test]
    fn test_only_sensitive_server_errors_carry_redacted_body() {
        let sensitive = HttpAppError::from(AppError::Storage("secret-bucket".to_string()))
            .into_response();
        let redacted = sensitive.extensions().get::<RedactedError>().unwrap();
        assert_eq!(redacted.0.message, "Failed to access storage");
        assert!(redacted.0.error.is_none());

        let partial = HttpAppError::from(AppError::PartialFailure("a.png".to_string()))
            .into_response();
        assert!(partial.extensions().get::<RedactedError>().is_none());
    }
}
