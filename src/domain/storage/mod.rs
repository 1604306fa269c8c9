//! Storage domain - durable persistence contract for the cache

mod repository;
mod snapshot;

pub use repository::SnapshotStore;
pub use snapshot::{CacheEntry, CacheSnapshot};

#[cfg(test)]
pub use repository::mock::MockSnapshotStore;
