//! Persisted cache snapshot entities

use serde::{Deserialize, Serialize};

use crate::domain::artifact::ArtifactCategory;

/// One cached artifact, exactly as the fingerprint cache owns it.
///
/// Mutated only through the cache's get/set/evict operations; destroyed on
/// expiry, explicit invalidation, or eviction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cached payload, serialized form
    pub payload: serde_json::Value,
    pub fingerprint: String,
    /// Topic the fingerprint was derived from (needed for topic-wide
    /// invalidation)
    pub topic: String,
    pub category: ArtifactCategory,
    /// Milliseconds since the unix epoch
    pub created_at_ms: u64,
    pub hit_count: u64,
}

impl CacheEntry {
    /// Entry age in milliseconds relative to `now_ms`
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.created_at_ms)
    }
}

/// Ordered (fingerprint, entry) pairs, the durable wire form of the cache
pub type CacheSnapshot = Vec<(String, CacheEntry)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_age() {
        let entry = CacheEntry {
            payload: serde_json::json!({"v": 1}),
            fingerprint: "abc".to_string(),
            topic: "rust".to_string(),
            category: ArtifactCategory::GeneratedArticle,
            created_at_ms: 1_000,
            hit_count: 0,
        };

        assert_eq!(entry.age_ms(3_500), 2_500);
        // Clock skew never underflows
        assert_eq!(entry.age_ms(500), 0);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let entry = CacheEntry {
            payload: serde_json::json!("payload"),
            fingerprint: "f1".to_string(),
            topic: "rust".to_string(),
            category: ArtifactCategory::KeywordSet,
            created_at_ms: 42,
            hit_count: 3,
        };
        let snapshot: CacheSnapshot = vec![("f1".to_string(), entry)];

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: CacheSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.len(), 1);
        assert_eq!(restored[0].0, "f1");
        assert_eq!(restored[0].1.hit_count, 3);
    }
}
