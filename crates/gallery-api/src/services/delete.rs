//! Delete pipeline
//!
//! The hosting service is the source of truth: a record is only dropped from
//! the gallery once the host confirms the asset is gone ("ok" or "not found").

use std::sync::Arc;

use gallery_core::{AppError, MediaCatalog, MediaKind};
use gallery_hosting::MediaHost;

pub struct DeletePipeline {
    host: Arc<dyn MediaHost>,
    catalog: Arc<dyn MediaCatalog>,
}

impl DeletePipeline {
    pub fn new(host: Arc<dyn MediaHost>, catalog: Arc<dyn MediaCatalog>) -> Self {
        Self { host, catalog }
    }

    /// Returns whether a local record was removed.
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, external_id: Option<&str>) -> Result<bool, AppError> {
        let external_id = external_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(AppError::MissingIdentifier)?;

        let kind = self
            .catalog
            .get(external_id)
            .await
            .map(|record| record.kind)
            .unwrap_or(MediaKind::Image);

        let outcome = self.host.destroy(external_id, kind).await?;

        if !outcome.is_gone() {
            tracing::warn!(external_id = %external_id, host_result = ?outcome, "Hosting service refused delete");
            return Err(AppError::ExternalService(format!(
                "Failed to delete from {}",
                self.host.provider()
            )));
        }

        let removed = self.catalog.remove(external_id).await;
        tracing::info!(
            external_id = %external_id,
            host_result = ?outcome,
            removed_locally = removed,
            "Media deleted"
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use gallery_core::{DisplayVariants, InMemoryCatalog, MediaRecord};
    use gallery_hosting::{DestroyOutcome, HostError, HostResult, HostedAsset, HostedUpload};
    use std::sync::Mutex;

    struct ScriptedHost {
        result: HostResult<DestroyOutcome>,
        calls: Mutex<Vec<(String, MediaKind)>>,
    }

    impl ScriptedHost {
        fn new(result: HostResult<DestroyOutcome>) -> Arc<Self> {
            Arc::new(Self {
                result,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<(String, MediaKind)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MediaHost for ScriptedHost {
        async fn upload(&self, _upload: HostedUpload) -> HostResult<HostedAsset> {
            Err(HostError::UploadFailed("not scripted".to_string()))
        }

        async fn destroy(&self, external_id: &str, kind: MediaKind) -> HostResult<DestroyOutcome> {
            self.calls
                .lock()
                .unwrap()
                .push((external_id.to_string(), kind));
            match &self.result {
                Ok(outcome) => Ok(outcome.clone()),
                Err(e) => Err(HostError::Transport(e.to_string())),
            }
        }

        fn provider(&self) -> &'static str {
            "scripted"
        }
    }

    fn record(id: &str, mime: &str) -> MediaRecord {
        let url = format!("https://cdn.example.com/{}", id);
        MediaRecord::new(
            url.clone(),
            DisplayVariants::uniform(&url),
            mime,
            1,
            id.to_string(),
            id.to_string(),
        )
    }

    #[tokio::test]
    async fn test_missing_identifier_makes_no_call() {
        let host = ScriptedHost::new(Ok(DestroyOutcome::Deleted));
        let catalog = Arc::new(InMemoryCatalog::new(10));
        let pipeline = DeletePipeline::new(host.clone(), catalog);

        assert!(matches!(
            pipeline.delete(None).await,
            Err(AppError::MissingIdentifier)
        ));
        assert!(matches!(
            pipeline.delete(Some("  ")).await,
            Err(AppError::MissingIdentifier)
        ));
        assert!(host.calls().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_success_and_list_unchanged() {
        let host = ScriptedHost::new(Ok(DestroyOutcome::NotFound));
        let catalog = Arc::new(InMemoryCatalog::new(10));
        catalog.insert_front(record("keep", "image/png")).await;
        let pipeline = DeletePipeline::new(host.clone(), catalog.clone());

        let removed = pipeline.delete(Some("absent")).await.unwrap();

        assert!(!removed);
        assert_eq!(catalog.len().await, 1);
        assert_eq!(host.calls(), vec![("absent".to_string(), MediaKind::Image)]);
    }

    #[tokio::test]
    async fn test_deleted_removes_record_using_its_kind() {
        let host = ScriptedHost::new(Ok(DestroyOutcome::Deleted));
        let catalog = Arc::new(InMemoryCatalog::new(10));
        catalog.insert_front(record("clip", "video/mp4")).await;
        let pipeline = DeletePipeline::new(host.clone(), catalog.clone());

        assert!(pipeline.delete(Some("clip")).await.unwrap());
        assert_eq!(catalog.len().await, 0);
        assert_eq!(host.calls(), vec![("clip".to_string(), MediaKind::Video)]);
    }

    #[tokio::test]
    async fn test_other_result_keeps_record() {
        let host = ScriptedHost::new(Ok(DestroyOutcome::Other("error".to_string())));
        let catalog = Arc::new(InMemoryCatalog::new(10));
        catalog.insert_front(record("a", "image/png")).await;
        let pipeline = DeletePipeline::new(host, catalog.clone());

        let err = pipeline.delete(Some("a")).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalService(ref m) if m == "Failed to delete from scripted"));
        assert_eq!(catalog.len().await, 1);
    }

    #[tokio::test]
    async fn test_transport_error_keeps_record() {
        let host = ScriptedHost::new(Err(HostError::Transport("connection refused".to_string())));
        let catalog = Arc::new(InMemoryCatalog::new(10));
        catalog.insert_front(record("a", "image/png")).await;
        let pipeline = DeletePipeline::new(host, catalog.clone());

        let err = pipeline.delete(Some("a")).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalService(_)));
        assert_eq!(catalog.len().await, 1);
    }
}
