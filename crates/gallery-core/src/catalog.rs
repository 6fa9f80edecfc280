//! Media catalog abstraction
//!
//! Pipelines talk to the gallery through [`MediaCatalog`] instead of a shared
//! global, which keeps them testable with a fresh catalog per test.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::MediaRecord;
use crate::recency::RecencyList;

#[async_trait]
pub trait MediaCatalog: Send + Sync {
    /// Insert at the head, returning evicted records
    async fn insert_front(&self, record: MediaRecord) -> Vec<MediaRecord>;

    /// Remove by external id; `false` when nothing matched
    async fn remove(&self, external_id: &str) -> bool;

    async fn get(&self, external_id: &str) -> Option<MediaRecord>;

    async fn snapshot(&self) -> Vec<MediaRecord>;

    async fn len(&self) -> usize;

    fn capacity(&self) -> usize;
}

/// Process-lifetime catalog backed by a [`RecencyList`]
pub struct InMemoryCatalog {
    list: RwLock<RecencyList>,
    capacity: usize,
}

impl InMemoryCatalog {
    pub fn new(capacity: usize) -> Self {
        let list = RecencyList::new(capacity);
        let capacity = list.capacity();
        Self {
            list: RwLock::new(list),
            capacity,
        }
    }
}

#[async_trait]
impl MediaCatalog for InMemoryCatalog {
    async fn insert_front(&self, record: MediaRecord) -> Vec<MediaRecord> {
        let external_id = record.external_id.clone();
        let evicted = self.list.write().await.insert_front(record);
        for old in &evicted {
            tracing::debug!(
                external_id = %old.external_id,
                inserted = %external_id,
                "Evicted oldest media record from gallery"
            );
        }
        evicted
    }

    async fn remove(&self, external_id: &str) -> bool {
        self.list.write().await.remove(external_id)
    }

    async fn get(&self, external_id: &str) -> Option<MediaRecord> {
        self.list.read().await.get(external_id).cloned()
    }

    async fn snapshot(&self) -> Vec<MediaRecord> {
        self.list.read().await.snapshot()
    }

    async fn len(&self) -> usize {
        self.list.read().await.len()
    }

    fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DisplayVariants;
    use std::sync::Arc;

    fn record(id: &str) -> MediaRecord {
        let url = format!("https://cdn.example.com/{}", id);
        MediaRecord::new(
            url.clone(),
            DisplayVariants::uniform(&url),
            "image/jpeg",
            1,
            id.to_string(),
            id.to_string(),
        )
    }

    #[tokio::test]
    async fn test_catalog_insert_and_remove() {
        let catalog = InMemoryCatalog::new(2);
        assert_eq!(catalog.capacity(), 2);

        catalog.insert_front(record("a")).await;
        catalog.insert_front(record("b")).await;
        let evicted = catalog.insert_front(record("c")).await;

        assert_eq!(evicted[0].external_id, "a");
        assert_eq!(catalog.len().await, 2);
        assert!(catalog.get("c").await.is_some());
        assert!(catalog.remove("c").await);
        assert!(!catalog.remove("c").await);
        assert_eq!(catalog.snapshot().await[0].external_id, "b");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_inserts_respect_capacity() {
        let catalog = Arc::new(InMemoryCatalog::new(10));
        let mut handles = Vec::new();
        for i in 0..50 {
            let catalog = catalog.clone();
            handles.push(tokio::spawn(async move {
                catalog.insert_front(record(&format!("m{}", i))).await;
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert_eq!(catalog.len().await, 10);
    }
}
