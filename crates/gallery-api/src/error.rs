//! HTTP error response conversion
//!
//! Extractor rejections become an [`HttpAppError`], which renders the shared
//! JSON [`ErrorResponse`] (status, body, logging). Whether details are shown
//! comes from [`ErrorVisibility`] in the application state.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRef, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gallery_core::{AppError, ErrorMetadata, LogLevel};
use serde::de::DeserializeOwned;

use crate::state::ErrorVisibility;

pub use gallery_infra::ErrorResponse;

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rule: both the trait and `AppError` are foreign to this crate).
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    pub hide_details: bool,
}

impl HttpAppError {
    pub fn new(error: AppError, visibility: ErrorVisibility) -> Self {
        Self {
            error,
            hide_details: visibility.hide_details,
        }
    }
}

fn rejection_error(rejection: JsonRejection) -> AppError {
    AppError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
}

/// JSON body extractor that answers with [`ErrorResponse`] (400) on deserialization failure.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    ErrorVisibility: FromRef<S>,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let visibility = ErrorVisibility::from_ref(state);
        let Json(inner) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| HttpAppError::new(rejection_error(rejection), visibility))?;
        Ok(ValidatedJson(inner))
    }
}

pub(crate) fn log_error(error: &AppError) {
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

pub(crate) fn status_of(error: &AppError) -> StatusCode {
    StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Build the JSON body for an error, hiding details when asked to.
pub fn error_body(error: &AppError, hide_details: bool) -> ErrorResponse {
    let hide = hide_details || error.is_sensitive();
    ErrorResponse {
        error: error.client_message(),
        details: (!hide).then(|| error.detailed_message()),
        error_type: (!hide).then(|| error.error_type().to_string()),
        code: error.error_code().to_string(),
        recoverable: error.is_recoverable(),
        suggested_action: error.suggested_action().map(String::from),
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        log_error(&self.error);

        let body = error_body(&self.error, self.hide_details);
        (status_of(&self.error), Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_visibility() {
        let err = HttpAppError::new(
            AppError::InvalidInput("bad".to_string()),
            ErrorVisibility { hide_details: true },
        );
        assert!(err.hide_details);
        assert_eq!(status_of(&err.error), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_error_body_hides_details_when_asked() {
        let err = AppError::UnsupportedMediaType("text/plain".to_string());
        let shown = error_body(&err, false);
        assert!(shown.details.is_some());
        assert_eq!(shown.error_type.as_deref(), Some("UnsupportedMediaType"));

        let hidden = error_body(&err, true);
        assert!(hidden.details.is_none());
        assert!(hidden.error_type.is_none());
        assert_eq!(hidden.code, "UNSUPPORTED_MEDIA_TYPE");
    }

    #[test]
    fn test_sensitive_errors_never_show_details() {
        let err = AppError::Internal("db password wrong".to_string());
        let body = error_body(&err, false);
        assert!(body.details.is_none());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_of(&AppError::MissingIdentifier), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(&AppError::ExternalService("x".to_string())),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_of(&AppError::PayloadTooLarge("x".to_string())),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_error_response_shape() {
        let body = error_body(&AppError::MissingIdentifier, true);
        let json = serde_json::to_value(&body).expect("serialize");
        assert_eq!(json["error"], "No public_id provided");
        assert_eq!(json["code"], "MISSING_IDENTIFIER");
        assert!(json.get("recoverable").and_then(|v| v.as_bool()).is_some());
        assert!(json.get("details").is_none());
    }
}
