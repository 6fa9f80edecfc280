use serde::Serialize;
use utoipa::ToSchema;

use super::media::MediaRecord;

/// Why a single file of a batch was not stored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    UnsupportedMediaType,
    PayloadTooLarge,
    ExternalServiceError,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FileFailure {
    pub name: String,
    pub kind: FailureKind,
    pub message: String,
}

impl FileFailure {
    pub fn new(name: impl Into<String>, kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Result of processing an upload batch.
///
/// `Success` with a non-empty `failed` list is a partial batch failure: some
/// files were stored, some were not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BatchOutcome {
    Success {
        succeeded: Vec<MediaRecord>,
        failed: Vec<FileFailure>,
    },
    Failure {
        failed: Vec<FileFailure>,
    },
}

impl BatchOutcome {
    /// Classify per-file results: one stored file is enough for `Success`.
    pub fn from_results(succeeded: Vec<MediaRecord>, failed: Vec<FileFailure>) -> Self {
        if succeeded.is_empty() {
            BatchOutcome::Failure { failed }
        } else {
            BatchOutcome::Success { succeeded, failed }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BatchOutcome::Success { .. })
    }

    pub fn succeeded(&self) -> &[MediaRecord] {
        match self {
            BatchOutcome::Success { succeeded, .. } => succeeded,
            BatchOutcome::Failure { .. } => &[],
        }
    }

    pub fn failed(&self) -> &[FileFailure] {
        match self {
            BatchOutcome::Success { failed, .. } | BatchOutcome::Failure { failed } => failed,
        }
    }

    /// User-facing summary shown after the upload redirect or on the form.
    pub fn message(&self) -> String {
        match self {
            BatchOutcome::Success { succeeded, failed } => {
                let names: Vec<&str> = succeeded.iter().map(|r| r.original_name.as_str()).collect();
                let mut message = format!(
                    "Successfully uploaded {} file(s): {}. ",
                    succeeded.len(),
                    names.join(", ")
                );
                if !failed.is_empty() {
                    let failed_names: Vec<&str> = failed.iter().map(|f| f.name.as_str()).collect();
                    message.push_str(&format!(
                        "Failed to upload {} file(s): {}.",
                        failed.len(),
                        failed_names.join(", ")
                    ));
                }
                message.trim_end().to_string()
            }
            BatchOutcome::Failure { failed } => {
                let reasons: Vec<String> = failed
                    .iter()
                    .map(|f| format!("{}: {}", f.name, f.message))
                    .collect();
                format!("All uploads failed. {}", reasons.join("; "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisplayVariants;

    fn record(name: &str) -> MediaRecord {
        let url = format!("https://cdn.example.com/{}", name);
        MediaRecord::new(
            url.clone(),
            DisplayVariants::uniform(&url),
            "image/png",
            10,
            format!("personal_gallery/{}", name),
            name.to_string(),
        )
    }

    #[test]
    fn test_success_message_without_failures() {
        let outcome = BatchOutcome::from_results(vec![record("a.png"), record("b.png")], vec![]);
        assert!(outcome.is_success());
        assert_eq!(
            outcome.message(),
            "Successfully uploaded 2 file(s): a.png, b.png."
        );
    }

    #[test]
    fn test_partial_failure_message() {
        let outcome = BatchOutcome::from_results(
            vec![record("a.png")],
            vec![FileFailure::new(
                "c.png",
                FailureKind::ExternalServiceError,
                "timeout",
            )],
        );
        assert_eq!(outcome.succeeded().len(), 1);
        assert_eq!(outcome.failed().len(), 1);
        assert_eq!(
            outcome.message(),
            "Successfully uploaded 1 file(s): a.png. Failed to upload 1 file(s): c.png."
        );
    }

    #[test]
    fn test_all_failed_message() {
        let outcome = BatchOutcome::from_results(
            vec![],
            vec![
                FileFailure::new("x.gif", FailureKind::UnsupportedMediaType, "unsupported"),
                FileFailure::new("y.bmp", FailureKind::UnsupportedMediaType, "unsupported"),
            ],
        );
        assert!(!outcome.is_success());
        assert!(outcome.succeeded().is_empty());
        assert_eq!(
            outcome.message(),
            "All uploads failed. x.gif: unsupported; y.bmp: unsupported"
        );
    }
}
