//! Pipeline output and quality score types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::generation::Usage;

/// The seven independent quality metrics computed for a finished artifact
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityScore {
    pub word_count: u32,
    /// Percentage of words matching the target topic
    pub keyword_density: f64,
    /// Flesch-Kincaid style grade estimate
    pub readability_grade: f64,
    /// 100 minus 10 per distinct banned phrase found, floored at 0
    pub unique_phrase_index: u32,
    pub internal_links: u32,
    pub external_references: u32,
    /// 0-100 human-likeness estimate
    pub human_likeness: u32,
    /// Weighted aggregate, 0-100
    pub confidence: u32,
}

/// Publishability verdict with itemized issues and suggestions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QualityReport {
    pub score: QualityScore,
    pub can_publish: bool,
    pub issues: Vec<String>,
    pub suggestions: Vec<String>,
}

impl QualityReport {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Result of a full pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub slug: String,
    pub body: String,
    pub word_count: u32,
    pub quality: QualityReport,
    pub usage: Usage,
    pub elapsed_ms: u64,
    /// True when this output was served from the fingerprint cache
    #[serde(default)]
    pub from_cache: bool,
}

impl PipelineOutput {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        slug: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            slug: slug.into(),
            body: body.into(),
            word_count: 0,
            quality: QualityReport::default(),
            usage: Usage::default(),
            elapsed_ms: 0,
            from_cache: false,
        }
    }

    pub fn with_quality(mut self, quality: QualityReport) -> Self {
        self.word_count = quality.score.word_count;
        self.quality = quality;
        self
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_with_quality() {
        let report = QualityReport {
            score: QualityScore {
                word_count: 2700,
                confidence: 91,
                ..Default::default()
            },
            can_publish: true,
            issues: vec![],
            suggestions: vec![],
        };

        let output = PipelineOutput::new("Title", "Desc", "slug", "Body").with_quality(report);

        assert_eq!(output.word_count, 2700);
        assert!(output.quality.can_publish);
        assert!(!output.from_cache);
    }

    #[test]
    fn test_report_has_issues() {
        let mut report = QualityReport::default();
        assert!(!report.has_issues());

        report.issues.push("Word count below target".to_string());
        assert!(report.has_issues());
    }
}
