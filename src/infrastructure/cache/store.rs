//! Fingerprint-keyed artifact cache

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::fingerprint::fingerprint_today;
use crate::domain::storage::{CacheEntry, CacheSnapshot, SnapshotStore};
use crate::domain::ArtifactCategory;

/// Share of entries dropped per eviction round (lowest hit counts first)
const EVICTION_FRACTION: f64 = 0.10;

/// Configuration for the fingerprint cache
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of entries; insertion above this evicts first
    pub capacity: usize,
    /// Overrides every category TTL when set (test hook)
    pub ttl_override: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 500,
            ttl_override: None,
        }
    }
}

impl CacheConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_ttl_override(mut self, ttl: Duration) -> Self {
        self.ttl_override = Some(ttl);
        self
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub mean_hit_count: f64,
    /// Age of the oldest entry in milliseconds, if the cache is non-empty
    pub oldest_entry_age_ms: Option<u64>,
}

/// Capacity-bounded cache keyed by deterministic fingerprints.
///
/// Expiry is checked lazily at read time against the per-category TTL table;
/// there is no background sweep. Eviction is frequency-based (lowest hit
/// counts go first), which approximates but is not true recency LRU. After
/// every mutation the full entry set is persisted best-effort to the injected
/// snapshot store; a failed save is answered with an immediate cleanup rather
/// than an error.
#[derive(Debug)]
pub struct FingerprintCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    config: CacheConfig,
    store: Option<Arc<dyn SnapshotStore>>,
}

impl FingerprintCache {
    /// Creates an empty cache without persistence
    pub fn new(config: CacheConfig) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
            store: None,
        }
    }

    /// Creates an empty cache that persists to the given store
    pub fn with_store(config: CacheConfig, store: Arc<dyn SnapshotStore>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            config,
            store: Some(store),
        }
    }

    /// Restores a cache from persisted state.
    ///
    /// A load failure or corrupt snapshot falls back to an empty cache; it is
    /// never surfaced to the caller.
    pub async fn load_from(config: CacheConfig, store: Arc<dyn SnapshotStore>) -> Self {
        let entries = match store.load().await {
            Ok(Some(snapshot)) => {
                debug!(entries = snapshot.len(), "Restored cache snapshot");
                snapshot.into_iter().collect()
            }
            Ok(None) => HashMap::new(),
            Err(e) => {
                warn!("Failed to load cache snapshot, starting empty: {}", e);
                HashMap::new()
            }
        };

        Self {
            entries: Mutex::new(entries),
            config,
            store: Some(store),
        }
    }

    fn now_ms() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn effective_ttl(&self, category: ArtifactCategory) -> Duration {
        self.config.ttl_override.unwrap_or_else(|| category.ttl())
    }

    fn is_expired(&self, entry: &CacheEntry, now_ms: u64) -> bool {
        entry.age_ms(now_ms) as u128 > self.effective_ttl(entry.category).as_millis()
    }

    /// Gets a typed value; expired entries are deleted and reported absent.
    ///
    /// A hit increments the entry's hit counter. Never fails: a payload that
    /// no longer deserializes is treated as absent and dropped.
    pub async fn get<T>(&self, topic: &str, intent: &str, category: ArtifactCategory) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let fp = fingerprint_today(topic, intent, category);
        let now = Self::now_ms();

        let (payload, mutated) = {
            let mut entries = self.lock();
            let expired = matches!(entries.get(&fp), Some(entry) if self.is_expired(entry, now));

            if expired {
                entries.remove(&fp);
                (None, true)
            } else if let Some(entry) = entries.get_mut(&fp) {
                entry.hit_count += 1;
                (Some(entry.payload.clone()), true)
            } else {
                (None, false)
            }
        };

        if mutated {
            self.persist().await;
        }

        let payload = payload?;
        match serde_json::from_value(payload) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(fingerprint = %fp, "Dropping cache entry with stale payload shape: {}", e);
                self.lock().remove(&fp);
                self.persist().await;
                None
            }
        }
    }

    /// Stores a typed value, evicting first when at capacity
    pub async fn set<T>(&self, topic: &str, intent: &str, category: ArtifactCategory, value: &T)
    where
        T: Serialize,
    {
        let payload = match serde_json::to_value(value) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Refusing to cache unserializable payload: {}", e);
                return;
            }
        };

        let fp = fingerprint_today(topic, intent, category);
        let entry = CacheEntry {
            payload,
            fingerprint: fp.clone(),
            topic: topic.trim().to_lowercase(),
            category,
            created_at_ms: Self::now_ms(),
            hit_count: 0,
        };

        {
            let mut entries = self.lock();
            if !entries.contains_key(&fp) && entries.len() >= self.config.capacity {
                let evicted = Self::evict_locked(&mut entries);
                debug!(evicted, "Evicted low-hit entries to make room");
            }
            entries.insert(fp, entry);
        }

        self.persist().await;
    }

    /// Expiry-aware existence check (does not bump the hit counter)
    pub async fn has(&self, topic: &str, intent: &str, category: ArtifactCategory) -> bool {
        let fp = fingerprint_today(topic, intent, category);
        let now = Self::now_ms();

        let (found, removed) = {
            let mut entries = self.lock();
            let expired = matches!(entries.get(&fp), Some(entry) if self.is_expired(entry, now));

            if expired {
                entries.remove(&fp);
                (false, true)
            } else {
                (entries.contains_key(&fp), false)
            }
        };

        if removed {
            self.persist().await;
        }
        found
    }

    /// Removes one entry; returns whether it existed
    pub async fn invalidate(
        &self,
        topic: &str,
        intent: &str,
        category: ArtifactCategory,
    ) -> bool {
        let fp = fingerprint_today(topic, intent, category);
        let existed = self.lock().remove(&fp).is_some();

        if existed {
            self.persist().await;
        }
        existed
    }

    /// Removes every entry derived from the given topic, across categories
    /// and intents; returns the number removed.
    pub async fn invalidate_topic(&self, topic: &str) -> usize {
        let normalized = topic.trim().to_lowercase();
        let removed = {
            let mut entries = self.lock();
            let before = entries.len();
            entries.retain(|_, entry| entry.topic != normalized);
            before - entries.len()
        };

        if removed > 0 {
            self.persist().await;
        }
        removed
    }

    /// Sweeps all entries past their category TTL; returns the count removed
    pub async fn cleanup(&self) -> usize {
        let removed = self.cleanup_locked();
        if removed > 0 {
            self.persist().await;
        }
        removed
    }

    fn cleanup_locked(&self) -> usize {
        let now = Self::now_ms();
        let mut entries = self.lock();
        let before = entries.len();
        // Cannot borrow self inside retain while holding the guard, so the
        // TTL check is inlined.
        let ttl_override = self.config.ttl_override;
        entries.retain(|_, entry| {
            let ttl = ttl_override.unwrap_or_else(|| entry.category.ttl());
            entry.age_ms(now) as u128 <= ttl.as_millis()
        });
        before - entries.len()
    }

    /// Drops the lowest-hit-count 10% of entries (at least one).
    ///
    /// Frequency-based by design, not true recency LRU.
    pub async fn evict_least_used(&self) -> usize {
        let evicted = {
            let mut entries = self.lock();
            Self::evict_locked(&mut entries)
        };

        if evicted > 0 {
            self.persist().await;
        }
        evicted
    }

    fn evict_locked(entries: &mut HashMap<String, CacheEntry>) -> usize {
        if entries.is_empty() {
            return 0;
        }

        let target = ((entries.len() as f64 * EVICTION_FRACTION).ceil() as usize).max(1);

        let mut ranked: Vec<(String, u64)> = entries
            .iter()
            .map(|(fp, entry)| (fp.clone(), entry.hit_count))
            .collect();
        ranked.sort_by_key(|(_, hits)| *hits);

        for (fp, _) in ranked.into_iter().take(target) {
            entries.remove(&fp);
        }
        target
    }

    /// Removes every entry
    pub async fn clear(&self) {
        self.lock().clear();
        self.persist().await;
    }

    /// Current cache statistics
    pub fn stats(&self) -> CacheStats {
        let now = Self::now_ms();
        let entries = self.lock();

        let size = entries.len();
        let mean_hit_count = if size == 0 {
            0.0
        } else {
            entries.values().map(|e| e.hit_count as f64).sum::<f64>() / size as f64
        };
        let oldest_entry_age_ms = entries.values().map(|e| e.age_ms(now)).max();

        CacheStats {
            size,
            capacity: self.config.capacity,
            mean_hit_count,
            oldest_entry_age_ms,
        }
    }

    /// Best-effort persistence of the full entry set.
    ///
    /// A failed save shrinks the cache via cleanup instead of surfacing
    /// the error.
    async fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };

        let snapshot: CacheSnapshot = {
            let entries = self.lock();
            let mut pairs: Vec<_> = entries
                .iter()
                .map(|(fp, entry)| (fp.clone(), entry.clone()))
                .collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            pairs
        };

        if let Err(e) = store.save(&snapshot).await {
            warn!("Cache snapshot save failed, running cleanup: {}", e);
            self.cleanup_locked();
        }
    }
}
