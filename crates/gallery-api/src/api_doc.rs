//! OpenAPI documentation for the JSON endpoints.
//!
//! The HTML pages and the multipart form target are not described here.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use crate::setup::routes::health;
use gallery_core::models;

/// Returns the OpenAPI document served at `/api/openapi.json`.
pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Personal Media Gallery",
        version = "0.1.0",
        description = "Upload images and videos to a hosting service and browse the most recent ones."
    ),
    paths(
        handlers::delete::delete_media,
        health::health_check,
    ),
    components(
        schemas(
            handlers::delete::DeleteRequest,
            handlers::delete::DeleteResponse,
            health::HealthResponse,
            models::MediaRecord,
            models::MediaKind,
            models::BatchOutcome,
            models::FileFailure,
            models::FailureKind,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "media", description = "Gallery media operations"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_json_endpoints() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/delete"));
        assert!(spec.paths.paths.contains_key("/health"));
        let schemas = spec.components.expect("components").schemas;
        assert!(schemas.contains_key("DeleteRequest"));
        assert!(schemas.contains_key("ErrorResponse"));
    }
}
