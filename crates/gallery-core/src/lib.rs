//! Gallery Core Library
//!
//! This crate provides the domain models, error types, configuration and the
//! in-memory media catalog shared by every gallery component.

pub mod catalog;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod recency;

// Re-export commonly used types
pub use catalog::{InMemoryCatalog, MediaCatalog};
pub use config::{Config, HostingConfig, SignatureAlgorithm, StagingBackend, UploadLimits};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    BatchOutcome, DisplayVariants, FailureKind, FileFailure, MediaKind, MediaRecord,
};
pub use recency::RecencyList;
