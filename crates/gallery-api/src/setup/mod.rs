//! Application setup and initialization
//!
//! Wiring lives here rather than in main.rs so tests can build the same
//! state and router around a fake hosting service.

pub mod routes;
pub mod server;
pub mod validation;

use crate::services::{StagingArea, UploadSettings};
use crate::state::{AppState, MediaState, UploadState};
use anyhow::{Context, Result};
use gallery_core::{Config, InMemoryCatalog};
use gallery_hosting::{create_media_host, create_variant_deriver, MediaHost, VariantDeriver};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    gallery_infra::init_telemetry("gallery", config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    // Fail fast on misconfiguration
    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let host = create_media_host(&config).context("Failed to create media host")?;
    let deriver = create_variant_deriver(&config);

    let state = build_state(&config, host, deriver).await?;
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}

/// Assemble application state around the given hosting service.
pub async fn build_state(
    config: &Config,
    host: Arc<dyn MediaHost>,
    deriver: Arc<dyn VariantDeriver>,
) -> Result<Arc<AppState>> {
    let staging = StagingArea::new(config.staging_backend(), config.staging_dir());
    staging
        .prepare()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!(
        capacity = config.capacity(),
        staging_backend = %staging.backend(),
        staging_dir = %staging.dir().display(),
        hosting = host.provider(),
        "Gallery initialized"
    );

    let settings = UploadSettings {
        limits: config.limits.clone(),
        folder: config.hosting.folder.clone(),
        eager_variants: config.hosting.eager_variants,
    };

    Ok(Arc::new(AppState {
        media: MediaState {
            catalog: Arc::new(InMemoryCatalog::new(config.capacity())),
            host,
            deriver,
        },
        uploads: UploadState { settings, staging },
        is_production: config.is_production(),
    }))
}
