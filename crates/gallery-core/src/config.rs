//! Configuration module
//!
//! This module provides configuration structures for the gallery server: the
//! HTTP listener, the hosting API credentials, upload limits and the
//! in-memory gallery itself. Everything is read from the environment (a
//! `.env` file is loaded first when present).

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::str::FromStr;

use crate::constants::{
    ALLOWED_CONTENT_TYPES, DEFAULT_GALLERY_CAPACITY, DEFAULT_HOSTING_API_BASE_URL,
    DEFAULT_UPLOAD_FOLDER,
};

// Common constants
const SERVER_PORT: u16 = 3000;
const MAX_FILE_SIZE_MB: usize = 20;
const MAX_FILES_PER_UPLOAD: usize = 10;
const HOSTING_TIMEOUT_SECS: u64 = 120;
const MEGABYTE: usize = 1024 * 1024;

fn megabytes(name: &str, mb: usize) -> Result<usize, anyhow::Error> {
    mb.checked_mul(MEGABYTE)
        .ok_or_else(|| anyhow::anyhow!("{} is too large: {} MB", name, mb))
}

/// Where incoming upload bytes are held before they are forwarded
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StagingBackend {
    Memory,
    Disk,
}

impl FromStr for StagingBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StagingBackend::Memory),
            "disk" => Ok(StagingBackend::Disk),
            _ => Err(anyhow::anyhow!("Invalid staging backend: {}", s)),
        }
    }
}

impl Display for StagingBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StagingBackend::Memory => write!(f, "memory"),
            StagingBackend::Disk => write!(f, "disk"),
        }
    }
}

/// Digest used to sign hosting API requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sha1" => Ok(SignatureAlgorithm::Sha1),
            "sha256" => Ok(SignatureAlgorithm::Sha256),
            _ => Err(anyhow::anyhow!("Invalid signature algorithm: {}", s)),
        }
    }
}

/// Base configuration for the HTTP server
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    pub static_dir: PathBuf,
}

/// Hosting API credentials and upload options
#[derive(Clone)]
pub struct HostingConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub signature_algorithm: SignatureAlgorithm,
    pub api_base_url: String,
    pub timeout_secs: u64,
    pub folder: String,
    pub eager_variants: bool,
}

impl std::fmt::Debug for HostingConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("HostingConfig")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .field("signature_algorithm", &self.signature_algorithm)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("folder", &self.folder)
            .field("eager_variants", &self.eager_variants)
            .finish()
    }
}

/// Limits applied to an upload batch at intake
#[derive(Clone, Debug)]
pub struct UploadLimits {
    pub max_file_size_bytes: usize,
    pub max_files: usize,
    pub max_total_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub concurrency: usize,
}

impl Default for UploadLimits {
    fn default() -> Self {
        let max_file_size_bytes = MAX_FILE_SIZE_MB * MEGABYTE;
        Self {
            max_file_size_bytes,
            max_files: MAX_FILES_PER_UPLOAD,
            max_total_bytes: max_file_size_bytes * MAX_FILES_PER_UPLOAD + MEGABYTE,
            allowed_content_types: ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            concurrency: MAX_FILES_PER_UPLOAD,
        }
    }
}

/// In-memory gallery and staging configuration
#[derive(Clone, Debug)]
pub struct GalleryConfig {
    pub capacity: usize,
    pub staging_backend: StagingBackend,
    pub staging_dir: PathBuf,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    pub hosting: HostingConfig,
    pub limits: UploadLimits,
    pub gallery: GalleryConfig,
}

impl Config {
    /// Load `.env` (if any) and read the configuration from the process environment.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map so they never mutate the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = var("ENVIRONMENT")
            .or_else(|| var("NODE_ENV"))
            .unwrap_or_else(|| "development".to_string());

        let cors_origins = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: var("PORT")
                .unwrap_or_else(|| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            static_dir: PathBuf::from(var("STATIC_DIR").unwrap_or_else(|| "public".to_string())),
        };

        let hosting = HostingConfig {
            cloud_name: var("CLOUDINARY_CLOUD_NAME").unwrap_or_default(),
            api_key: var("CLOUDINARY_API_KEY").unwrap_or_default(),
            api_secret: var("CLOUDINARY_API_SECRET").unwrap_or_default(),
            signature_algorithm: var("CLOUDINARY_SIGNATURE_ALGORITHM")
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(SignatureAlgorithm::Sha1),
            api_base_url: var("HOSTING_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_HOSTING_API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout_secs: var("HOSTING_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(HOSTING_TIMEOUT_SECS),
            folder: var("UPLOAD_FOLDER").unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_string()),
            eager_variants: var("EAGER_VARIANTS")
                .unwrap_or_else(|| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
        };

        let max_file_size_mb = var("MAX_FILE_SIZE_MB")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_FILE_SIZE_MB);
        let max_files = var("MAX_FILES_PER_UPLOAD")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(MAX_FILES_PER_UPLOAD);
        let max_file_size_bytes = megabytes("MAX_FILE_SIZE_MB", max_file_size_mb)?;
        let max_total_bytes = match var("MAX_TOTAL_UPLOAD_MB").and_then(|s| s.parse::<usize>().ok()) {
            Some(mb) => megabytes("MAX_TOTAL_UPLOAD_MB", mb)?,
            None => max_file_size_bytes
                .checked_mul(max_files)
                .and_then(|bytes| bytes.checked_add(MEGABYTE))
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "MAX_FILE_SIZE_MB x MAX_FILES_PER_UPLOAD is too large ({} MB x {})",
                        max_file_size_mb,
                        max_files
                    )
                })?,
        };

        let limits = UploadLimits {
            max_file_size_bytes,
            max_files,
            max_total_bytes,
            allowed_content_types: ALLOWED_CONTENT_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            concurrency: var("UPLOAD_CONCURRENCY")
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(max_files),
        };

        let gallery = GalleryConfig {
            capacity: var("GALLERY_CAPACITY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_GALLERY_CAPACITY),
            staging_backend: var("STAGING_BACKEND")
                .map(|s| s.parse())
                .transpose()?
                .unwrap_or(StagingBackend::Memory),
            staging_dir: PathBuf::from(var("STAGING_DIR").unwrap_or_else(|| "uploads".to_string())),
        };

        let config = Config {
            base,
            hosting,
            limits,
            gallery,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.hosting.cloud_name.is_empty()
            || self.hosting.api_key.is_empty()
            || self.hosting.api_secret.is_empty()
        {
            return Err(anyhow::anyhow!(
                "CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET must be set \
                (run `gallery-cli setup` to create a .env file)"
            ));
        }

        if self.is_production() && self.base.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.gallery.capacity == 0 {
            return Err(anyhow::anyhow!("GALLERY_CAPACITY cannot be 0"));
        }

        if self.limits.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB cannot be 0"));
        }

        if self.limits.max_files == 0 {
            return Err(anyhow::anyhow!("MAX_FILES_PER_UPLOAD cannot be 0"));
        }

        if self.limits.max_total_bytes < self.limits.max_file_size_bytes {
            return Err(anyhow::anyhow!(
                "MAX_TOTAL_UPLOAD_MB must be at least MAX_FILE_SIZE_MB"
            ));
        }

        if self.limits.concurrency == 0 {
            return Err(anyhow::anyhow!("UPLOAD_CONCURRENCY cannot be 0"));
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    // Convenience getters for common fields
    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn static_dir(&self) -> &std::path::Path {
        &self.base.static_dir
    }

    pub fn capacity(&self) -> usize {
        self.gallery.capacity
    }

    pub fn staging_backend(&self) -> StagingBackend {
        self.gallery.staging_backend
    }

    pub fn staging_dir(&self) -> &std::path::Path {
        &self.gallery.staging_dir
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.limits.max_file_size_bytes
    }

    pub fn max_files(&self) -> usize {
        self.limits.max_files
    }

    pub fn max_total_bytes(&self) -> usize {
        self.limits.max_total_bytes
    }
}
