//! Health check handler and response type.

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::MediaState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    /// Items currently held in the gallery
    pub media_count: usize,
    pub capacity: usize,
    /// Hosting provider name
    pub hosting: String,
    pub timestamp: DateTime<Utc>,
}

/// Liveness plus a cheap look at the gallery; never calls the hosting service.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(media): State<MediaState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        media_count: media.catalog.len().await,
        capacity: media.catalog.capacity(),
        hosting: media.host.provider().to_string(),
        timestamp: Utc::now(),
    })
}
