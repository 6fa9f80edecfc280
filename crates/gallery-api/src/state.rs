//! Application state and sub-state extractors.
//!
//! Handlers extract only the sub-state they need through Axum's `FromRef`.

use gallery_core::MediaCatalog;
use gallery_hosting::{MediaHost, VariantDeriver};
use std::sync::Arc;

use crate::services::{DeletePipeline, StagingArea, UploadPipeline, UploadSettings};

// ----- Sub-state types -----

/// Gallery contents and the hosting service behind them.
#[derive(Clone)]
pub struct MediaState {
    pub catalog: Arc<dyn MediaCatalog>,
    pub host: Arc<dyn MediaHost>,
    pub deriver: Arc<dyn VariantDeriver>,
}

impl MediaState {
    pub fn upload_pipeline(&self, settings: UploadSettings) -> UploadPipeline {
        UploadPipeline::new(
            self.host.clone(),
            self.catalog.clone(),
            self.deriver.clone(),
            settings,
        )
    }

    pub fn delete_pipeline(&self) -> DeletePipeline {
        DeletePipeline::new(self.host.clone(), self.catalog.clone())
    }
}

/// Whether error responses may carry diagnostic details.
#[derive(Debug, Clone, Copy)]
pub struct ErrorVisibility {
    pub hide_details: bool,
}

/// Intake limits and where upload bytes are staged.
#[derive(Clone)]
pub struct UploadState {
    pub settings: UploadSettings,
    pub staging: StagingArea,
}

// ----- AppState -----

/// Main application state: aggregates sub-states for dependency injection.
#[derive(Clone)]
pub struct AppState {
    pub media: MediaState,
    pub uploads: UploadState,
    pub is_production: bool,
}

// ----- FromRef for sub-state extraction -----

impl axum::extract::FromRef<Arc<AppState>> for MediaState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.media.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for UploadState {
    fn from_ref(state: &Arc<AppState>) -> Self {
        state.uploads.clone()
    }
}

impl axum::extract::FromRef<Arc<AppState>> for ErrorVisibility {
    fn from_ref(state: &Arc<AppState>) -> Self {
        ErrorVisibility {
            hide_details: state.is_production,
        }
    }
}

fn _assert_app_state_send_sync() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    assert_send::<AppState>();
    assert_sync::<AppState>();
}
