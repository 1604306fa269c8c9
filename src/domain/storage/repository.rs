//! Durable storage trait for cache snapshots

use std::fmt::Debug;

use async_trait::async_trait;

use super::snapshot::CacheSnapshot;
use crate::domain::DomainError;

/// Best-effort durable storage for the fingerprint cache.
///
/// The cache swallows `save` failures (shrinking itself instead) and treats
/// any `load` failure or corrupt snapshot as an empty cache; implementations
/// are free to be lossy but must never panic on bad data.
#[async_trait]
pub trait SnapshotStore: Send + Sync + Debug {
    /// Loads the persisted snapshot, if any
    async fn load(&self) -> Result<Option<CacheSnapshot>, DomainError>;

    /// Persists the full snapshot
    async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError>;
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    /// Mock snapshot store with error injection
    #[derive(Debug, Default)]
    pub struct MockSnapshotStore {
        snapshot: Mutex<Option<CacheSnapshot>>,
        load_error: Mutex<Option<String>>,
        save_error: Mutex<Option<String>>,
    }

    impl MockSnapshotStore {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_snapshot(self, snapshot: CacheSnapshot) -> Self {
            *self.snapshot.lock().unwrap() = Some(snapshot);
            self
        }

        pub fn with_load_error(self, error: impl Into<String>) -> Self {
            *self.load_error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn with_save_error(self, error: impl Into<String>) -> Self {
            *self.save_error.lock().unwrap() = Some(error.into());
            self
        }

        /// The last snapshot successfully saved
        pub fn saved(&self) -> Option<CacheSnapshot> {
            self.snapshot.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl SnapshotStore for MockSnapshotStore {
        async fn load(&self) -> Result<Option<CacheSnapshot>, DomainError> {
            if let Some(error) = self.load_error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            Ok(self.snapshot.lock().unwrap().clone())
        }

        async fn save(&self, snapshot: &CacheSnapshot) -> Result<(), DomainError> {
            if let Some(error) = self.save_error.lock().unwrap().clone() {
                return Err(DomainError::storage(error));
            }
            *self.snapshot.lock().unwrap() = Some(snapshot.clone());
            Ok(())
        }
    }
}
