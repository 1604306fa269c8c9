//! Artifact categories and their cache lifetimes

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Kind of artifact moving through the pipeline and cache.
///
/// Each category carries its own time-to-live; the table is process-wide,
/// read-only configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactCategory {
    /// Snapshot of external search results for a topic
    SearchSnapshot,
    /// Competitor content analysis
    CompetitorAnalysis,
    /// Extracted keyword set
    KeywordSet,
    /// A generated long-form article
    GeneratedArticle,
    /// "People also ask" style question set
    QuestionSet,
    /// Collected reference set
    ReferenceSet,
}

impl ArtifactCategory {
    /// Time-to-live for cached artifacts of this category
    pub fn ttl(&self) -> Duration {
        match self {
            Self::SearchSnapshot => Duration::from_secs(12 * 3600),
            Self::CompetitorAnalysis => Duration::from_secs(24 * 3600),
            Self::KeywordSet => Duration::from_secs(7 * 24 * 3600),
            Self::GeneratedArticle => Duration::from_secs(24 * 3600),
            Self::QuestionSet => Duration::from_secs(7 * 24 * 3600),
            Self::ReferenceSet => Duration::from_secs(7 * 24 * 3600),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchSnapshot => "search_snapshot",
            Self::CompetitorAnalysis => "competitor_analysis",
            Self::KeywordSet => "keyword_set",
            Self::GeneratedArticle => "generated_article",
            Self::QuestionSet => "question_set",
            Self::ReferenceSet => "reference_set",
        }
    }
}

impl std::fmt::Display for ArtifactCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ttl_table() {
        assert_eq!(
            ArtifactCategory::GeneratedArticle.ttl(),
            Duration::from_secs(86400)
        );
        assert_eq!(
            ArtifactCategory::KeywordSet.ttl(),
            Duration::from_secs(7 * 86400)
        );
        assert!(ArtifactCategory::SearchSnapshot.ttl() < ArtifactCategory::KeywordSet.ttl());
    }

    #[test]
    fn test_as_str_roundtrip() {
        let json = serde_json::to_string(&ArtifactCategory::GeneratedArticle).unwrap();
        assert_eq!(json, "\"generated_article\"");

        let parsed: ArtifactCategory = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ArtifactCategory::GeneratedArticle);
    }
}
