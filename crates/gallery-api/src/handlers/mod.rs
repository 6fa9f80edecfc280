//! HTTP handlers for the gallery pages and JSON endpoints.

pub mod delete;
pub mod gallery;
pub mod upload;
