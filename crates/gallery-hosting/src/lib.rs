//! Gallery Hosting Library
//!
//! This crate provides the media hosting abstraction used by the gallery: the
//! `MediaHost` trait, the Cloudinary implementation and display variant
//! derivation for stored images.

pub mod cloudinary;
pub mod factory;
pub mod traits;
pub mod variants;

// Re-export commonly used types
pub use cloudinary::CloudinaryHost;
pub use factory::{create_media_host, create_variant_deriver};
pub use traits::{
    DestroyOutcome, HostError, HostResult, HostedAsset, HostedUpload, MediaHost,
    TransformOptions, VariantSpec,
};
pub use variants::{CloudinaryUrlRewrite, VariantDeriver};
