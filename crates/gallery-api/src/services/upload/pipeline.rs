//! Upload pipeline
//!
//! validate batch → fan out uploads → derive variants → record → release staging

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use gallery_core::models::normalize_content_type;
use gallery_core::{
    AppError, BatchOutcome, ErrorMetadata, FailureKind, FileFailure, MediaCatalog, MediaKind,
    MediaRecord, UploadLimits,
};
use gallery_hosting::{HostedUpload, MediaHost, TransformOptions, VariantDeriver};

use super::staging::{release_all, StagedFile};

/// Per-deployment upload settings
#[derive(Debug, Clone)]
pub struct UploadSettings {
    pub limits: UploadLimits,
    pub folder: String,
    pub eager_variants: bool,
}

pub struct UploadPipeline {
    host: Arc<dyn MediaHost>,
    catalog: Arc<dyn MediaCatalog>,
    deriver: Arc<dyn VariantDeriver>,
    settings: UploadSettings,
}

impl UploadPipeline {
    pub fn new(
        host: Arc<dyn MediaHost>,
        catalog: Arc<dyn MediaCatalog>,
        deriver: Arc<dyn VariantDeriver>,
        settings: UploadSettings,
    ) -> Self {
        Self {
            host,
            catalog,
            deriver,
            settings,
        }
    }

    /// Run one batch. Batch-level violations come back as `Err`; per-file
    /// problems are reported inside the outcome.
    #[tracing::instrument(skip(self, files), fields(file_count = files.len()))]
    pub async fn process(&self, files: Vec<StagedFile>) -> Result<BatchOutcome, AppError> {
        let limits = &self.settings.limits;

        if files.is_empty() {
            return Err(AppError::InvalidInput("No files uploaded.".to_string()));
        }

        if files.len() > limits.max_files {
            let count = files.len();
            release_all(files).await;
            return Err(AppError::TooManyFiles {
                count,
                max: limits.max_files,
            });
        }

        let total: u64 = files.iter().map(|f| f.size).sum();
        if total > limits.max_total_bytes as u64 {
            release_all(files).await;
            return Err(AppError::PayloadTooLarge(format!(
                "Upload exceeds maximum total size of {} MB",
                limits.max_total_bytes / 1024 / 1024
            )));
        }

        let rejected: Vec<FileFailure> = files
            .iter()
            .filter_map(|file| self.validate_file(file).err())
            .collect();
        if !rejected.is_empty() {
            tracing::debug!(
                rejected = rejected.len(),
                "Batch rejected at intake, no files forwarded"
            );
            release_all(files).await;
            return Ok(BatchOutcome::Failure { failed: rejected });
        }

        // `buffered` keeps input order and drives every upload to completion.
        let results: Vec<Result<MediaRecord, FileFailure>> = stream::iter(files)
            .map(|file| self.process_file(file))
            .buffered(limits.concurrency.max(1))
            .collect()
            .await;

        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for result in results {
            match result {
                Ok(record) => succeeded.push(record),
                Err(failure) => failed.push(failure),
            }
        }

        tracing::info!(
            succeeded = succeeded.len(),
            failed = failed.len(),
            "Upload batch finished"
        );

        Ok(BatchOutcome::from_results(succeeded, failed))
    }

    fn validate_file(&self, file: &StagedFile) -> Result<(), FileFailure> {
        let limits = &self.settings.limits;
        let content_type = normalize_content_type(&file.content_type);

        if !limits
            .allowed_content_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(&content_type))
        {
            return Err(FileFailure::new(
                file.name.clone(),
                FailureKind::UnsupportedMediaType,
                "Only jpg, jpeg, png, and mp4 files are allowed.",
            ));
        }

        if file.size > limits.max_file_size_bytes as u64 {
            return Err(FileFailure::new(
                file.name.clone(),
                FailureKind::PayloadTooLarge,
                format!(
                    "File size exceeds maximum allowed size of {} MB",
                    limits.max_file_size_bytes / 1024 / 1024
                ),
            ));
        }

        Ok(())
    }

    fn transform_options(&self, kind: MediaKind) -> TransformOptions {
        if self.settings.eager_variants && kind.is_image() {
            TransformOptions::with_eager(self.deriver.eager_specs())
        } else {
            TransformOptions::default()
        }
    }

    async fn process_file(&self, file: StagedFile) -> Result<MediaRecord, FileFailure> {
        let name = file.name.clone();
        let content_type = normalize_content_type(&file.content_type);
        let size = file.size;
        let kind = MediaKind::from_content_type(&content_type);

        let uploaded = async {
            let data = file.read().await?;
            let asset = self
                .host
                .upload(HostedUpload {
                    data,
                    file_name: name.clone(),
                    content_type: content_type.clone(),
                    kind,
                    folder: self.settings.folder.clone(),
                    options: self.transform_options(kind),
                })
                .await?;
            Ok::<_, AppError>(asset)
        }
        .await;

        file.release().await;

        match uploaded {
            Ok(asset) => {
                let variants = self.deriver.derive(&asset, kind);
                let record = MediaRecord::new(
                    asset.canonical_url,
                    variants,
                    &content_type,
                    size,
                    asset.external_id,
                    name,
                );
                self.catalog.insert_front(record.clone()).await;
                tracing::debug!(
                    external_id = %record.external_id,
                    kind = %kind,
                    "Stored upload"
                );
                Ok(record)
            }
            Err(e) => {
                tracing::warn!(file = %name, error = %e, "Upload to hosting service failed");
                Err(FileFailure::new(
                    name,
                    FailureKind::ExternalServiceError,
                    e.client_message(),
                ))
            }
        }
    }
}
