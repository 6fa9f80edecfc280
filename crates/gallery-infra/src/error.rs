//! HTTP error response body
//!
//! The `IntoResponse` conversion for `AppError` lives in the API crate; only
//! the serialized shape is shared here.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard error response format for HTTP APIs
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}
