//! Upload service: staging of incoming bytes and the batch pipeline.

pub mod pipeline;
pub mod staging;

pub use pipeline::{UploadPipeline, UploadSettings};
pub use staging::{release_all, StagedFile, StagingArea};
