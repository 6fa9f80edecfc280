use axum::{
    extract::{Query, State},
    response::Html,
};
use serde::Deserialize;

use crate::state::{MediaState, UploadState};
use crate::views;

#[derive(Debug, Default, Deserialize)]
pub struct GalleryQuery {
    pub success: Option<String>,
}

#[tracing::instrument(skip(media, query))]
pub async fn show_gallery(
    State(media): State<MediaState>,
    Query(query): Query<GalleryQuery>,
) -> Html<String> {
    let snapshot = media.catalog.snapshot().await;
    tracing::debug!(media_count = snapshot.len(), "Rendering gallery");
    Html(views::gallery_page(&snapshot, query.success.as_deref()))
}

pub async fn upload_form(State(uploads): State<UploadState>) -> Html<String> {
    let limits = &uploads.settings.limits;
    Html(views::upload_page(
        None,
        limits.max_files,
        limits.max_file_size_bytes / 1024 / 1024,
    ))
}
