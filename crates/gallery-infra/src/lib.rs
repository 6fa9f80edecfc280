//! Gallery Infrastructure Library
//!
//! Shared plumbing for the gallery server: tracing setup, request-id and
//! security-header middleware, and the JSON error body.

pub mod error;
pub mod middleware;
pub mod telemetry;

// Re-export commonly used types
pub use error::ErrorResponse;
pub use middleware::{
    request_id_middleware, security_headers_middleware, RequestId,
    SecurityHeaders,
};
pub use telemetry::init_telemetry;
