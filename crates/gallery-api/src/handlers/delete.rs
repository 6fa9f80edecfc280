use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use gallery_core::ErrorMetadata;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{log_error, status_of, ValidatedJson};
use crate::state::MediaState;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DeleteRequest {
    /// Identifier assigned by the hosting service
    #[serde(
        default,
        rename = "externalId",
        alias = "public_id",
        alias = "external_id"
    )]
    pub external_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeleteResponse {
    fn deleted() -> Self {
        Self {
            success: true,
            message: Some("Media deleted successfully".to_string()),
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error),
        }
    }
}

#[utoipa::path(
    post,
    path = "/delete",
    tag = "media",
    request_body = DeleteRequest,
    responses(
        (status = 200, description = "Media deleted (or already gone at the host)", body = DeleteResponse),
        (status = 400, description = "No identifier provided", body = DeleteResponse),
        (status = 502, description = "Hosting service refused or failed", body = DeleteResponse)
    )
)]
#[tracing::instrument(skip(media, request), fields(operation = "delete_media"))]
pub async fn delete_media(
    State(media): State<MediaState>,
    ValidatedJson(request): ValidatedJson<DeleteRequest>,
) -> impl IntoResponse {
    match media
        .delete_pipeline()
        .delete(request.external_id.as_deref())
        .await
    {
        Ok(_) => (StatusCode::OK, Json(DeleteResponse::deleted())),
        Err(e) => {
            log_error(&e);
            (status_of(&e), Json(DeleteResponse::failed(e.client_message())))
        }
    }
}
