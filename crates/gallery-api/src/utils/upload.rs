//! Multipart intake for upload handlers

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use gallery_core::constants::UPLOAD_FIELD_NAME;
use gallery_core::{AppError, UploadLimits};

use crate::services::upload::{release_all, StagedFile, StagingArea};

const MAX_DISPLAY_NAME_LENGTH: usize = 255;

/// Stream every `media` field of the form into staging.
///
/// Other fields are skipped. Fields past the file-count limit are counted but
/// not staged. A file larger than the per-file limit keeps its full size but
/// only the allowed prefix is staged, so the pipeline can still report it.
/// On error everything staged so far is released.
pub async fn extract_media_files(
    mut multipart: Multipart,
    limits: &UploadLimits,
    staging: &StagingArea,
) -> Result<Vec<StagedFile>, AppError> {
    let mut files = Vec::new();
    let mut overflow = 0usize;

    let result = read_fields(&mut multipart, limits, staging, &mut files, &mut overflow).await;

    if let Err(e) = result {
        release_all(files).await;
        return Err(e);
    }

    if overflow > 0 {
        let count = files.len() + overflow;
        release_all(files).await;
        return Err(AppError::TooManyFiles {
            count,
            max: limits.max_files,
        });
    }

    Ok(files)
}

async fn read_fields(
    multipart: &mut Multipart,
    limits: &UploadLimits,
    staging: &StagingArea,
    files: &mut Vec<StagedFile>,
    overflow: &mut usize,
) -> Result<(), AppError> {
    let mut total: u64 = 0;

    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        let raw_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();

        if files.len() >= limits.max_files {
            // A blank file input only counts once it turns out to carry bytes.
            if raw_name.is_empty() && drain(&mut field).await? == 0 {
                continue;
            }
            *overflow += 1;
            continue;
        }

        let mut buffer = staging.begin().await?;
        let mut size: u64 = 0;

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            size += chunk.len() as u64;
            total += chunk.len() as u64;

            if total > limits.max_total_bytes as u64 {
                return Err(AppError::PayloadTooLarge(format!(
                    "Upload exceeds maximum total size of {} MB",
                    limits.max_total_bytes / 1024 / 1024
                )));
            }

            if size <= limits.max_file_size_bytes as u64 {
                buffer.write(&chunk).await?;
            }
        }

        // Browsers send an empty part when the file input is left blank.
        if raw_name.is_empty() && size == 0 {
            continue;
        }

        tracing::debug!(
            file = %raw_name,
            content_type = %content_type,
            size,
            "Staged upload field"
        );

        files.push(buffer.finish(display_name(&raw_name), content_type, size).await?);
    }

    Ok(())
}

async fn drain(field: &mut Field<'_>) -> Result<u64, AppError> {
    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        size += chunk.len() as u64;
    }
    Ok(size)
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Client file name reduced to its last path component, for display only.
pub fn display_name(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();

    if base.is_empty() || base == "." || base == ".." {
        return "unnamed".to_string();
    }

    base.chars()
        .filter(|c| !c.is_control())
        .take(MAX_DISPLAY_NAME_LENGTH)
        .collect()
}
