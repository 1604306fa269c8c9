//! File-backed snapshot store implementation

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::storage::{CacheSnapshot, SnapshotStore};
use crate::domain::DomainError;

/// Snapshot store backed by a single JSON file
///
/// Loads are forgiving: a missing or corrupt file yields an empty
/// result so a damaged snapshot never blocks startup. Saves replace
/// the whole file.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<CacheSnapshot>, DomainError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read snapshot file");
                return Ok(None);
            }
        };

        match serde_json::from_str(&contents) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt snapshot file");
                Ok(None)
            }
        }
    }

    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                DomainError::storage(format!(
                    "Failed to create snapshot directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let contents = serde_json::to_string_pretty(snapshot)
            .map_err(|e| DomainError::storage(format!("Failed to serialize snapshot: {}", e)))?;

        tokio::fs::write(&self.path, contents).await.map_err(|e| {
            DomainError::storage(format!(
                "Failed to write snapshot file {}: {}",
                self.path.display(),
                e
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::tempdir;
    use tokio_test::assert_ok;

    use crate::domain::artifact::ArtifactCategory;
    use crate::domain::storage::CacheEntry;

    use super::*;

    fn sample_snapshot() -> CacheSnapshot {
        vec![(
            "deadbeef".to_string(),
            CacheEntry {
                payload: json!({"slug": "standing-desks"}),
                fingerprint: "deadbeef".to_string(),
                topic: "standing desks".to_string(),
                category: ArtifactCategory::GeneratedArticle,
                created_at_ms: 42,
                hit_count: 0,
            },
        )]
    }

    #[tokio::test]
    async fn test_load_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("missing.json"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("cache.json"));

        assert_ok!(store.save(&sample_snapshot()).await);

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].1.topic, "standing desks");
    }

    #[tokio::test]
    async fn test_corrupt_file_loads_as_none() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cache.json");
        std::fs::write(&path, "{not valid json").unwrap();

        let store = FileSnapshotStore::new(path);

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested/deep/cache.json"));

        store.save(&sample_snapshot()).await.unwrap();

        assert!(store.load().await.unwrap().is_some());
    }
}
