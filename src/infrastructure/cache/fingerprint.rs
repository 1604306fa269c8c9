//! Deterministic cache fingerprints

use chrono::Utc;
use sha2::{Digest, Sha256};

use crate::domain::ArtifactCategory;

/// Length of the hex fingerprint; collision-tolerant, not cryptographic
const FINGERPRINT_LEN: usize = 16;

/// Current day bucket (whole days since the unix epoch).
///
/// Two calls with the same logical inputs on the same day always share a
/// fingerprint; the bucket rolls at UTC midnight.
pub fn day_bucket() -> i64 {
    Utc::now().timestamp() / 86_400
}

/// Computes the fingerprint for the given key inputs and day bucket.
///
/// Pure function of its inputs; performs no I/O. The topic is lowercased and
/// trimmed so cosmetic differences do not fragment the cache.
pub fn fingerprint(topic: &str, intent: &str, category: ArtifactCategory, day: i64) -> String {
    let normalized = topic.trim().to_lowercase();
    let material = format!("{}|{}|{}|{}", normalized, intent, category.as_str(), day);

    let digest = Sha256::digest(material.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(FINGERPRINT_LEN);
    hex
}

/// Fingerprint for the current day bucket
pub fn fingerprint_today(topic: &str, intent: &str, category: ArtifactCategory) -> String {
    fingerprint(topic, intent, category, day_bucket())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_within_day() {
        let a = fingerprint("Ergonomic Keyboards", "generate", ArtifactCategory::GeneratedArticle, 20_000);
        let b = fingerprint("ergonomic keyboards ", "generate", ArtifactCategory::GeneratedArticle, 20_000);

        // Case and surrounding whitespace are normalized away
        assert_eq!(a, b);
        assert_eq!(a.len(), FINGERPRINT_LEN);
    }

    #[test]
    fn test_differs_by_component() {
        let base = fingerprint("rust", "generate", ArtifactCategory::GeneratedArticle, 20_000);

        assert_ne!(base, fingerprint("go", "generate", ArtifactCategory::GeneratedArticle, 20_000));
        assert_ne!(base, fingerprint("rust", "research", ArtifactCategory::GeneratedArticle, 20_000));
        assert_ne!(base, fingerprint("rust", "generate", ArtifactCategory::KeywordSet, 20_000));
        assert_ne!(base, fingerprint("rust", "generate", ArtifactCategory::GeneratedArticle, 20_001));
    }

    #[test]
    fn test_today_matches_manual_bucket() {
        let manual = fingerprint("rust", "generate", ArtifactCategory::GeneratedArticle, day_bucket());
        let today = fingerprint_today("rust", "generate", ArtifactCategory::GeneratedArticle);
        assert_eq!(manual, today);
    }
}
