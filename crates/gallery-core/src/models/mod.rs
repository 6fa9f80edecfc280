//! Data models for the gallery
//!
//! `media` holds the records kept in the recency list, `batch` the per-request
//! outcome of an upload batch.

mod batch;
mod media;

pub use batch::*;
pub use media::*;
