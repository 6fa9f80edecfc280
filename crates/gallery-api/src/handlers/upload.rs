use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use gallery_core::{AppError, BatchOutcome, ErrorMetadata, FailureKind, FileFailure};

use crate::error::{log_error, status_of};
use crate::state::{MediaState, UploadState};
use crate::utils::upload::extract_media_files;
use crate::views;

/// Accept a multipart batch from the upload form.
///
/// Redirects to the gallery with a summary when at least one file made it,
/// otherwise re-renders the form with the reason.
#[tracing::instrument(skip(media, uploads, multipart), fields(operation = "upload_media"))]
pub async fn upload_media(
    State(media): State<MediaState>,
    State(uploads): State<UploadState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let result = async {
        let multipart = multipart
            .map_err(|e| AppError::InvalidInput(format!("Expected a multipart form: {}", e)))?;
        let files =
            extract_media_files(multipart, &uploads.settings.limits, &uploads.staging).await?;
        media
            .upload_pipeline(uploads.settings.clone())
            .process(files)
            .await
    }
    .await;

    match result {
        Ok(outcome) if outcome.is_success() => {
            let location = format!("/?success={}", urlencoding::encode(&outcome.message()));
            Redirect::to(&location).into_response()
        }
        Ok(outcome) => {
            tracing::warn!(failed = outcome.failed().len(), "Upload batch failed");
            form_with_error(&uploads, failure_status(&outcome), &outcome.message())
        }
        Err(e) => {
            log_error(&e);
            form_with_error(&uploads, status_of(&e), &e.client_message())
        }
    }
}

fn form_with_error(uploads: &UploadState, status: StatusCode, message: &str) -> Response {
    let limits = &uploads.settings.limits;
    let page = views::upload_page(
        Some(message),
        limits.max_files,
        limits.max_file_size_bytes / 1024 / 1024,
    );
    (status, Html(page)).into_response()
}

/// Status for a batch where nothing was stored.
fn failure_status(outcome: &BatchOutcome) -> StatusCode {
    let failed: &[FileFailure] = outcome.failed();
    let any = |kind: FailureKind| failed.iter().any(|f| f.kind == kind);

    if any(FailureKind::UnsupportedMediaType) {
        StatusCode::UNSUPPORTED_MEDIA_TYPE
    } else if any(FailureKind::PayloadTooLarge) {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_GATEWAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(kinds: &[FailureKind]) -> BatchOutcome {
        BatchOutcome::Failure {
            failed: kinds
                .iter()
                .enumerate()
                .map(|(i, kind)| FileFailure::new(format!("f{}", i), *kind, "x"))
                .collect(),
        }
    }

    #[test]
    fn failure_status_prefers_validation_kinds() {
        assert_eq!(
            failure_status(&failure(&[
                FailureKind::PayloadTooLarge,
                FailureKind::UnsupportedMediaType
            ])),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(
            failure_status(&failure(&[FailureKind::PayloadTooLarge])),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            failure_status(&failure(&[FailureKind::ExternalServiceError])),
            StatusCode::BAD_GATEWAY
        );
    }
}
