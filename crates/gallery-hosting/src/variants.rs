//! Display variant derivation
//!
//! A stored image is shown at three sizes. The host may have generated them
//! eagerly at upload time; otherwise they are derived from the canonical URL.

use gallery_core::{DisplayVariants, MediaKind};

use crate::traits::{HostedAsset, VariantSpec};

pub const THUMBNAIL: VariantSpec = VariantSpec {
    name: "thumbnail",
    transformation: "c_fill,w_300,h_300,q_auto,f_auto",
};

pub const MEDIUM: VariantSpec = VariantSpec {
    name: "medium",
    transformation: "c_limit,w_800,h_800,q_auto,f_auto",
};

pub const FULL: VariantSpec = VariantSpec {
    name: "full",
    transformation: "c_limit,w_1920,h_1920,q_auto,f_auto",
};

/// Produces the three display addresses for a stored asset
pub trait VariantDeriver: Send + Sync {
    fn derive(&self, asset: &HostedAsset, kind: MediaKind) -> DisplayVariants;

    /// Renditions worth requesting eagerly at upload time
    fn eager_specs(&self) -> Vec<VariantSpec>;
}

/// Inserts a transformation directive after the `/upload/` path segment
#[derive(Debug, Clone, Default)]
pub struct CloudinaryUrlRewrite;

const UPLOAD_SEGMENT: &str = "/upload/";

impl CloudinaryUrlRewrite {
    pub fn new() -> Self {
        Self
    }

    /// `None` when the URL has no `/upload/` segment to anchor on.
    pub fn rewrite(url: &str, transformation: &str) -> Option<String> {
        let idx = url.find(UPLOAD_SEGMENT)?;
        let split = idx + UPLOAD_SEGMENT.len();
        Some(format!(
            "{}{}/{}",
            &url[..split],
            transformation,
            &url[split..]
        ))
    }

    fn variant_url(asset: &HostedAsset, spec: &VariantSpec) -> String {
        asset
            .eager_urls
            .get(spec.name)
            .cloned()
            .or_else(|| Self::rewrite(&asset.canonical_url, spec.transformation))
            .unwrap_or_else(|| asset.canonical_url.clone())
    }
}

impl VariantDeriver for CloudinaryUrlRewrite {
    fn derive(&self, asset: &HostedAsset, kind: MediaKind) -> DisplayVariants {
        if !kind.is_image() {
            return DisplayVariants::uniform(&asset.canonical_url);
        }

        DisplayVariants {
            thumbnail_url: Self::variant_url(asset, &THUMBNAIL),
            medium_url: Self::variant_url(asset, &MEDIUM),
            full_url: Self::variant_url(asset, &FULL),
        }
    }

    fn eager_specs(&self) -> Vec<VariantSpec> {
        vec![THUMBNAIL, MEDIUM, FULL]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const CANONICAL: &str =
        "https://res.cloudinary.com/demo/image/upload/v1712/personal_gallery/cat.jpg";

    fn asset(url: &str) -> HostedAsset {
        HostedAsset {
            canonical_url: url.to_string(),
            external_id: "personal_gallery/cat".to_string(),
            eager_urls: HashMap::new(),
        }
    }

    #[test]
    fn test_rewrite_inserts_after_upload_segment() {
        let variants = CloudinaryUrlRewrite::new().derive(&asset(CANONICAL), MediaKind::Image);
        assert_eq!(
            variants.thumbnail_url,
            "https://res.cloudinary.com/demo/image/upload/c_fill,w_300,h_300,q_auto,f_auto/v1712/personal_gallery/cat.jpg"
        );
        assert_eq!(
            variants.medium_url,
            "https://res.cloudinary.com/demo/image/upload/c_limit,w_800,h_800,q_auto,f_auto/v1712/personal_gallery/cat.jpg"
        );
        assert_eq!(
            variants.full_url,
            "https://res.cloudinary.com/demo/image/upload/c_limit,w_1920,h_1920,q_auto,f_auto/v1712/personal_gallery/cat.jpg"
        );
    }

    #[test]
    fn test_eager_urls_take_precedence() {
        let mut hosted = asset(CANONICAL);
        hosted
            .eager_urls
            .insert("thumbnail".to_string(), "https://eager/thumb.jpg".to_string());
        let variants = CloudinaryUrlRewrite::new().derive(&hosted, MediaKind::Image);
        assert_eq!(variants.thumbnail_url, "https://eager/thumb.jpg");
        assert!(variants.medium_url.contains("/upload/c_limit,w_800"));
    }

    #[test]
    fn test_videos_use_canonical_url() {
        let url = "https://res.cloudinary.com/demo/video/upload/v1/personal_gallery/clip.mp4";
        let variants = CloudinaryUrlRewrite::new().derive(&asset(url), MediaKind::Video);
        assert_eq!(variants, DisplayVariants::uniform(url));
    }

    #[test]
    fn test_url_without_upload_segment_falls_back() {
        let url = "https://cdn.example.com/files/cat.jpg";
        let variants = CloudinaryUrlRewrite::new().derive(&asset(url), MediaKind::Image);
        assert_eq!(variants, DisplayVariants::uniform(url));
    }
}
