//! Resource tiers bounding generation size and temperature

use serde::Serialize;

use crate::domain::ArtifactCategory;

/// Named configuration bounding input/output size and temperature for one
/// generation request. Immutable; selected per request by category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceTier {
    pub name: &'static str,
    pub max_input_tokens: u32,
    pub max_output_tokens: u32,
    pub temperature: f32,
}

/// Full-length article generation
pub const STANDARD: ResourceTier = ResourceTier {
    name: "standard",
    max_input_tokens: 8_000,
    max_output_tokens: 4_000,
    temperature: 0.7,
};

/// Research-heavy analysis: wide input, tight output, low temperature
pub const RESEARCH: ResourceTier = ResourceTier {
    name: "research",
    max_input_tokens: 12_000,
    max_output_tokens: 2_000,
    temperature: 0.3,
};

/// Short structured artifacts (keywords, questions, references)
pub const LIGHT: ResourceTier = ResourceTier {
    name: "light",
    max_input_tokens: 2_000,
    max_output_tokens: 1_000,
    temperature: 0.5,
};

/// Fixed category-to-tier lookup; unrecognized categories get `STANDARD`.
pub fn select_tier(category: ArtifactCategory) -> &'static ResourceTier {
    match category {
        ArtifactCategory::GeneratedArticle => &STANDARD,
        ArtifactCategory::CompetitorAnalysis | ArtifactCategory::SearchSnapshot => &RESEARCH,
        ArtifactCategory::KeywordSet
        | ArtifactCategory::QuestionSet
        | ArtifactCategory::ReferenceSet => &LIGHT,
    }
}
