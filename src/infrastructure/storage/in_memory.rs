//! In-memory snapshot store implementation

use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::storage::{CacheSnapshot, SnapshotStore};
use crate::domain::DomainError;

/// Thread-safe in-memory snapshot store
///
/// Useful for testing and development. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    snapshot: RwLock<Option<CacheSnapshot>>,
}

impl InMemorySnapshotStore {
    /// Creates a new empty snapshot store
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with a snapshot
    pub fn with_snapshot(snapshot: CacheSnapshot) -> Self {
        Self {
            snapshot: RwLock::new(Some(snapshot)),
        }
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<Option<CacheSnapshot>, DomainError> {
        let snapshot = self
            .snapshot
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(snapshot.clone())
    }

    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
        let mut slot = self
            .snapshot
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))?;

        *slot = Some(snapshot.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::domain::artifact::ArtifactCategory;
    use crate::domain::storage::CacheEntry;

    use super::*;

    fn sample_snapshot() -> CacheSnapshot {
        vec![(
            "abc123".to_string(),
            CacheEntry {
                payload: json!({"topic": "desks"}),
                fingerprint: "abc123".to_string(),
                topic: "desks".to_string(),
                category: ArtifactCategory::GeneratedArticle,
                created_at_ms: 1_000,
                hit_count: 2,
            },
        )]
    }

    #[tokio::test]
    async fn test_load_empty_store() {
        let store = InMemorySnapshotStore::new();

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = InMemorySnapshotStore::new();

        store.save(&sample_snapshot()).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].0, "abc123");
    }

    #[tokio::test]
    async fn test_save_overwrites() {
        let store = InMemorySnapshotStore::with_snapshot(sample_snapshot());

        store.save(&Vec::new()).await.unwrap();

        assert_eq!(store.load().await.unwrap().unwrap().len(), 0);
    }
}
