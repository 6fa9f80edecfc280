//! Media hosting abstraction
//!
//! This module defines the `MediaHost` trait every hosting backend implements,
//! together with the request/response types that cross the seam.

use async_trait::async_trait;
use bytes::Bytes;
use gallery_core::{AppError, MediaKind};
use std::collections::HashMap;
use thiserror::Error;

/// Hosting operation errors
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Hosting API returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response from hosting API: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for HostError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            HostError::InvalidResponse(err.to_string())
        } else {
            HostError::Transport(err.to_string())
        }
    }
}

impl From<HostError> for AppError {
    fn from(err: HostError) -> Self {
        match err {
            HostError::Api { message, .. } => AppError::ExternalService(message),
            HostError::ConfigError(msg) => AppError::Internal(msg),
            other => AppError::ExternalService(other.to_string()),
        }
    }
}

/// Result type for hosting operations
pub type HostResult<T> = Result<T, HostError>;

/// Upload-time transformation options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformOptions {
    /// Renditions the host should generate eagerly at upload time
    pub eager: Vec<VariantSpec>,
}

impl TransformOptions {
    pub fn with_eager(eager: Vec<VariantSpec>) -> Self {
        Self { eager }
    }
}

/// A named display rendition and its transformation directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSpec {
    pub name: &'static str,
    pub transformation: &'static str,
}

/// Everything the host needs to store one file
#[derive(Debug, Clone)]
pub struct HostedUpload {
    pub data: Bytes,
    pub file_name: String,
    pub content_type: String,
    pub kind: MediaKind,
    pub folder: String,
    pub options: TransformOptions,
}

/// Stored asset as reported by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedAsset {
    pub canonical_url: String,
    pub external_id: String,
    /// Eagerly generated rendition URLs keyed by variant name
    pub eager_urls: HashMap<String, String>,
}

/// What the host said about a destroy request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DestroyOutcome {
    Deleted,
    NotFound,
    Other(String),
}

impl DestroyOutcome {
    /// Map the raw `result` field of a destroy response
    pub fn from_result(result: &str) -> Self {
        match result {
            "ok" => DestroyOutcome::Deleted,
            "not found" => DestroyOutcome::NotFound,
            other => DestroyOutcome::Other(other.to_string()),
        }
    }

    /// Both "ok" and "not found" mean the asset is gone.
    pub fn is_gone(&self) -> bool {
        matches!(self, DestroyOutcome::Deleted | DestroyOutcome::NotFound)
    }
}

/// Media hosting trait
///
/// The pipelines only see this trait, so tests can swap in an in-process mock.
#[async_trait]
pub trait MediaHost: Send + Sync {
    /// Store a file and return its canonical URL and external id
    async fn upload(&self, upload: HostedUpload) -> HostResult<HostedAsset>;

    /// Delete an asset by external id
    async fn destroy(&self, external_id: &str, kind: MediaKind) -> HostResult<DestroyOutcome>;

    /// Short provider name, reported by `/health`
    fn provider(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_outcome_from_result() {
        assert_eq!(DestroyOutcome::from_result("ok"), DestroyOutcome::Deleted);
        assert_eq!(
            DestroyOutcome::from_result("not found"),
            DestroyOutcome::NotFound
        );
        assert!(DestroyOutcome::from_result("not found").is_gone());
        let other = DestroyOutcome::from_result("error");
        assert_eq!(other, DestroyOutcome::Other("error".to_string()));
        assert!(!other.is_gone());
    }

    #[test]
    fn test_host_error_maps_to_external_service() {
        let err: AppError = HostError::Api {
            status: 401,
            message: "Invalid Signature".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::ExternalService(ref m) if m == "Invalid Signature"));

        let err: AppError = HostError::Transport("connection refused".to_string()).into();
        assert!(matches!(err, AppError::ExternalService(_)));
    }
}
