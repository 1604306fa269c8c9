//! Multi-metric publishability gate

use tracing::debug;

use super::text::{
    self, banned_phrases_found, human_likeness_score, keyword_density, link_counts,
    readability_grade, strip_markup, unique_phrase_index, word_count,
};
use crate::domain::{QualityReport, QualityScore};

// Target bands
const MIN_WORDS: u32 = 2_500;
const MAX_WORDS: u32 = 3_200;
const MIN_DENSITY: f64 = 0.8;
const MAX_DENSITY: f64 = 2.5;
const MAX_GRADE: f64 = 8.0;
const MIN_INTERNAL_LINKS: u32 = 6;
const MIN_EXTERNAL_REFS: u32 = 2;
const MIN_HUMAN_SCORE: u32 = 70;

// Metric weights, totalling 100
const WEIGHT_WORDS: f64 = 25.0;
const WEIGHT_DENSITY: f64 = 15.0;
const WEIGHT_READABILITY: f64 = 15.0;
const WEIGHT_UNIQUE: f64 = 10.0;
const WEIGHT_INTERNAL: f64 = 10.0;
const WEIGHT_EXTERNAL: f64 = 10.0;
const WEIGHT_HUMAN: f64 = 15.0;

const PUBLISH_CONFIDENCE: u32 = 85;
const QUICK_CHECK_THRESHOLD: f64 = 60.0;

/// Computes seven independent metrics from a finished artifact, combines
/// them into a weighted confidence score, and decides publishability.
///
/// Quality rejection is not an error: the caller gets `can_publish = false`
/// with itemized issues and suggestions and decides what to do.
#[derive(Debug, Clone, Default)]
pub struct QualityGate;

impl QualityGate {
    pub fn new() -> Self {
        Self
    }

    /// Full preflight: all metrics, issues, suggestions, and the verdict
    pub fn preflight_check(&self, body: &str, topic: &str) -> QualityReport {
        let plain = strip_markup(body);

        let words = word_count(&plain);
        let density = keyword_density(&plain, topic);
        let grade = readability_grade(&plain);
        let unique = unique_phrase_index(&plain);
        let (internal, external) = link_counts(body);
        let human = human_likeness_score(&plain);

        let mut issues = Vec::new();
        let mut suggestions = Vec::new();

        if words < MIN_WORDS {
            issues.push(format!(
                "Word count {} is below the {} word minimum",
                words, MIN_WORDS
            ));
            suggestions.push(format!(
                "Add approximately {} more words of substantive content",
                MIN_WORDS - words
            ));
        } else if words > MAX_WORDS {
            issues.push(format!(
                "Word count {} exceeds the {} word maximum",
                words, MAX_WORDS
            ));
            suggestions.push(format!(
                "Trim approximately {} words, starting with repetitive sections",
                words - MAX_WORDS
            ));
        }

        if density < MIN_DENSITY {
            issues.push(format!(
                "Keyword density {:.2}% is below the {:.1}% minimum",
                density, MIN_DENSITY
            ));
            suggestions.push(format!(
                "Work '{}' into more headings and paragraphs where it reads naturally",
                topic
            ));
        } else if density > MAX_DENSITY {
            issues.push(format!(
                "Keyword density {:.2}% exceeds the {:.1}% maximum",
                density, MAX_DENSITY
            ));
            suggestions.push(format!(
                "Replace some mentions of '{}' with pronouns or synonyms",
                topic
            ));
        }

        if grade > MAX_GRADE {
            issues.push(format!(
                "Readability grade {:.1} is above the grade {} target",
                grade, MAX_GRADE
            ));
            suggestions
                .push("Shorten long sentences and prefer simpler words".to_string());
        }

        if internal < MIN_INTERNAL_LINKS {
            issues.push(format!(
                "Only {} internal links; at least {} required",
                internal, MIN_INTERNAL_LINKS
            ));
            suggestions.push(
                "Add {{link:slug}} placeholders pointing at related articles".to_string(),
            );
        }

        if external < MIN_EXTERNAL_REFS {
            issues.push(format!(
                "Only {} external references; at least {} required",
                external, MIN_EXTERNAL_REFS
            ));
            suggestions.push("Cite authoritative sources with [[cite:url]] markers".to_string());
        }

        if human < MIN_HUMAN_SCORE {
            issues.push(format!(
                "Human-likeness score {} is below the {} minimum",
                human, MIN_HUMAN_SCORE
            ));
            suggestions.push(
                "Vary sentence rhythm and use contractions; cut formulaic phrasing".to_string(),
            );
        }

        let confidence = (word_weight(words)
            + density_weight(density)
            + readability_weight(grade)
            + WEIGHT_UNIQUE * unique as f64 / 100.0
            + WEIGHT_INTERNAL * ratio(internal, MIN_INTERNAL_LINKS)
            + WEIGHT_EXTERNAL * ratio(external, MIN_EXTERNAL_REFS)
            + human_weight(human))
        .round()
        .clamp(0.0, 100.0) as u32;

        let can_publish = confidence >= PUBLISH_CONFIDENCE && issues.is_empty();

        debug!(
            words,
            density, grade, unique, internal, external, human, confidence, can_publish,
            "Preflight check complete"
        );

        QualityReport {
            score: QualityScore {
                word_count: words,
                keyword_density: density,
                readability_grade: grade,
                unique_phrase_index: unique,
                internal_links: internal,
                external_references: external,
                human_likeness: human,
                confidence,
            },
            can_publish,
            issues,
            suggestions,
        }
    }

    /// Cheap boolean gate for fast rejection: word count and human score
    /// only, against a lower threshold.
    pub fn quick_check(&self, body: &str, topic: &str) -> bool {
        let _ = topic;
        let plain = strip_markup(body);

        let words = word_weight(word_count(&plain)) / WEIGHT_WORDS * 100.0;
        let human = human_weight(human_likeness_score(&plain)) / WEIGHT_HUMAN * 100.0;

        (words + human) / 2.0 >= QUICK_CHECK_THRESHOLD
    }

    /// List of phrases the gate penalizes; shared with the humanizer
    pub fn banned_phrases() -> &'static [&'static str] {
        text::BANNED_PHRASES
    }

    /// Distinct banned phrases present in the text
    pub fn flag_phrases(body: &str) -> Vec<&'static str> {
        banned_phrases_found(body)
    }
}

/// Full weight inside the band, degraded by distance from the band center
/// outside it. Moving toward the band never lowers the award.
fn word_weight(words: u32) -> f64 {
    if (MIN_WORDS..=MAX_WORDS).contains(&words) {
        return WEIGHT_WORDS;
    }
    let center = f64::from(MIN_WORDS + MAX_WORDS) / 2.0;
    (WEIGHT_WORDS - (f64::from(words) - center).abs() / 50.0).max(0.0)
}

fn density_weight(density: f64) -> f64 {
    if (MIN_DENSITY..=MAX_DENSITY).contains(&density) {
        return WEIGHT_DENSITY;
    }
    let center = (MIN_DENSITY + MAX_DENSITY) / 2.0;
    (WEIGHT_DENSITY - (density - center).abs() * 4.0).max(0.0)
}

fn readability_weight(grade: f64) -> f64 {
    if grade <= MAX_GRADE {
        return WEIGHT_READABILITY;
    }
    (WEIGHT_READABILITY - (grade - MAX_GRADE) * 2.0).max(0.0)
}

fn ratio(actual: u32, required: u32) -> f64 {
    (f64::from(actual) / f64::from(required)).min(1.0)
}

fn human_weight(score: u32) -> f64 {
    if score >= MIN_HUMAN_SCORE {
        return WEIGHT_HUMAN;
    }
    WEIGHT_HUMAN * f64::from(score) / f64::from(MIN_HUMAN_SCORE)
}
