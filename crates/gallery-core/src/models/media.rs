use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Media kind, also the hosting API resource type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a content type. Anything under `video/` is a video, the rest
    /// is treated as an image.
    pub fn from_content_type(content_type: &str) -> Self {
        if normalize_content_type(content_type).starts_with("video/") {
            MediaKind::Video
        } else {
            MediaKind::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, MediaKind::Image)
    }
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// Strip MIME parameters (`; charset=...`) and lowercase the essence.
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_lowercase()
}

/// Size-tiered display addresses for one stored asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DisplayVariants {
    pub thumbnail_url: String,
    pub medium_url: String,
    pub full_url: String,
}

impl DisplayVariants {
    /// All three tiers point at the same address.
    pub fn uniform(url: &str) -> Self {
        Self {
            thumbnail_url: url.to_string(),
            medium_url: url.to_string(),
            full_url: url.to_string(),
        }
    }
}

/// One uploaded item as kept in the gallery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MediaRecord {
    pub url: String,
    pub thumbnail_url: String,
    pub medium_url: String,
    pub full_url: String,
    pub mime_type: String,
    pub kind: MediaKind,
    pub bytes: u64,
    pub uploaded_at: DateTime<Utc>,
    pub external_id: String,
    pub original_name: String,
}

impl MediaRecord {
    pub fn new(
        url: String,
        variants: DisplayVariants,
        mime_type: &str,
        bytes: u64,
        external_id: String,
        original_name: String,
    ) -> Self {
        let mime_type = normalize_content_type(mime_type);
        Self {
            url,
            thumbnail_url: variants.thumbnail_url,
            medium_url: variants.medium_url,
            full_url: variants.full_url,
            kind: MediaKind::from_content_type(&mime_type),
            mime_type,
            bytes,
            uploaded_at: Utc::now(),
            external_id,
            original_name,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}
