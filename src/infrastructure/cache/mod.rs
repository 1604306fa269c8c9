//! Fingerprint cache - deterministic keys, TTL expiry, frequency eviction

mod fingerprint;
mod store;

pub use fingerprint::{day_bucket, fingerprint, fingerprint_today};
pub use store::{CacheConfig, CacheStats, FingerprintCache};
