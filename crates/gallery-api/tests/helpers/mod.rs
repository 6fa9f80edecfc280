//! Test helpers: build AppState and router around an in-process hosting fake.
//!
//! Run from workspace root: `cargo test -p gallery-api`.

#![allow(dead_code)]

pub mod fixtures;

use async_trait::async_trait;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use gallery_api::setup::{build_state, routes};
use gallery_api::state::AppState;
use gallery_core::{Config, MediaKind};
use gallery_hosting::{
    CloudinaryUrlRewrite, DestroyOutcome, HostError, HostResult, HostedAsset, HostedUpload,
    MediaHost,
};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

/// Hosting fake: records every call, fails uploads for chosen file names and
/// answers destroys with a scripted outcome.
pub struct MockHost {
    next_id: AtomicUsize,
    failing: Mutex<HashSet<String>>,
    uploads: Mutex<Vec<HostedUpload>>,
    destroys: Mutex<Vec<(String, MediaKind)>>,
    destroy_outcome: Mutex<DestroyOutcome>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            next_id: AtomicUsize::new(1),
            failing: Mutex::new(HashSet::new()),
            uploads: Mutex::new(Vec::new()),
            destroys: Mutex::new(Vec::new()),
            destroy_outcome: Mutex::new(DestroyOutcome::Deleted),
        }
    }

    pub fn fail_upload_of(&self, name: &str) {
        self.failing.lock().unwrap().insert(name.to_string());
    }

    pub fn set_destroy_outcome(&self, outcome: DestroyOutcome) {
        *self.destroy_outcome.lock().unwrap() = outcome;
    }

    pub fn uploaded_names(&self) -> Vec<String> {
        self.uploads
            .lock()
            .unwrap()
            .iter()
            .map(|u| u.file_name.clone())
            .collect()
    }

    pub fn uploads(&self) -> Vec<HostedUpload> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn destroy_calls(&self) -> Vec<(String, MediaKind)> {
        self.destroys.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaHost for MockHost {
    async fn upload(&self, upload: HostedUpload) -> HostResult<HostedAsset> {
        let name = upload.file_name.clone();
        let kind = upload.kind;
        let folder = upload.folder.clone();
        self.uploads.lock().unwrap().push(upload);

        if self.failing.lock().unwrap().contains(&name) {
            return Err(HostError::Api {
                status: 400,
                message: format!("Invalid image file {}", name),
            });
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        let external_id = format!("{}/asset-{}", folder, n);
        Ok(HostedAsset {
            canonical_url: format!(
                "https://res.cloudinary.com/demo/{}/upload/v1/{}",
                kind.as_str(),
                external_id
            ),
            external_id,
            eager_urls: HashMap::new(),
        })
    }

    async fn destroy(&self, external_id: &str, kind: MediaKind) -> HostResult<DestroyOutcome> {
        self.destroys
            .lock()
            .unwrap()
            .push((external_id.to_string(), kind));
        Ok(self.destroy_outcome.lock().unwrap().clone())
    }

    fn provider(&self) -> &'static str {
        "mock"
    }
}

/// Test application: server, state and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub host: Arc<MockHost>,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn staging_path(&self) -> &Path {
        self.staging_dir.path()
    }

    pub async fn media_count(&self) -> usize {
        self.state.media.catalog.len().await
    }

    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path())
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Setup a test app with default settings and in-memory staging.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(&[]).await
}

/// Setup a test app with extra configuration variables.
pub async fn setup_test_app_with(extra: &[(&str, &str)]) -> TestApp {
    let staging_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let staging_path = staging_dir.path().to_string_lossy().to_string();

    let mut vars: HashMap<String, String> = [
        ("CLOUDINARY_CLOUD_NAME", "demo"),
        ("CLOUDINARY_API_KEY", "test-key"),
        ("CLOUDINARY_API_SECRET", "test-secret"),
        ("STATIC_DIR", "public"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    vars.insert("STAGING_DIR".to_string(), staging_path);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }

    let config = Config::from_lookup(|k| vars.get(k).cloned()).expect("Invalid test config");

    let host = Arc::new(MockHost::new());
    let state = build_state(
        &config,
        host.clone(),
        Arc::new(CloudinaryUrlRewrite::new()),
    )
    .await
    .expect("Failed to build state");

    let router = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        state,
        host,
        staging_dir,
    }
}

/// Multipart form with one `media` part per file.
pub fn media_form(files: &[(&str, &str, Vec<u8>)]) -> MultipartForm {
    files
        .iter()
        .fold(MultipartForm::new(), |form, (name, mime, data)| {
            form.add_part(
                "media",
                Part::bytes(data.clone())
                    .file_name(name.to_string())
                    .mime_type(mime.to_string()),
            )
        })
}

/// Decode the `success` query parameter of a redirect location.
pub fn success_message(location: &str) -> String {
    let encoded = location
        .strip_prefix("/?success=")
        .unwrap_or_else(|| panic!("unexpected redirect location {}", location));
    urlencoding::decode(encoded)
        .expect("valid percent-encoding")
        .into_owned()
}
