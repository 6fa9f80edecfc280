//! Gallery API Library
//!
//! HTTP handlers, upload and delete pipelines, HTML rendering and application setup.

mod api_doc;
mod handlers;
pub mod services;
pub mod setup;
mod utils;
mod views;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use services::{DeletePipeline, StagingArea, UploadPipeline, UploadSettings};
