//! Text analysis primitives shared by the quality gate and the humanizer

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;

/// Phrases that read as machine-written; each distinct phrase found costs
/// 10 points of unique-phrase index and 5 points of human-likeness.
pub const BANNED_PHRASES: &[&str] = &[
    "delve into",
    "in today's digital landscape",
    "it's important to note that",
    "in conclusion",
    "furthermore",
    "moreover",
    "leverage",
    "seamlessly",
    "game-changer",
    "unlock the potential",
    "in the realm of",
    "a testament to",
    "ever-evolving",
    "dive deep",
    "harness the power",
    "robust solution",
    "elevate your",
    "navigating the complexities",
];

/// Sentence-length variance above this reads as natural rhythm (+5)
const HIGH_VARIANCE: f64 = 60.0;
/// Variance below this reads as machine-uniform (-10)
const LOW_VARIANCE: f64 = 10.0;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static INTERNAL_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{link:[^}]+\}\}").unwrap());
static CITE_MARKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\[cite:[^\]]+\]\]").unwrap());
static HTML_ANCHOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<a\s+[^>]*href\s*=\s*["']([^"']+)["']"#).unwrap());
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[.!?]+").unwrap());
static SILENT_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:[^laeiouy]es|[^laeiouy]e|ed)$").unwrap());
static VOWEL_GROUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[aeiouy]{1,2}").unwrap());
static CONTRACTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\w+'(?:t|s|re|ve|ll|d|m)\b").unwrap());
static INFORMAL_OPENER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^(?:and|but|so|well|look|honestly|here's the thing)\b").unwrap()
});
static INFORMAL_ADVERB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:really|actually|honestly|frankly|basically|pretty much)\b").unwrap()
});

/// Strips markdown and HTML markup, leaving readable text.
///
/// Cross-reference placeholders and citation markers are removed too; they
/// are counted separately by [`link_counts`].
pub fn strip_markup(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());

    for event in Parser::new(text) {
        match event {
            Event::Text(t) | Event::Code(t) => plain.push_str(&t),
            Event::SoftBreak | Event::HardBreak => plain.push(' '),
            Event::End(Tag::Paragraph)
            | Event::End(Tag::Heading(..))
            | Event::End(Tag::Item)
            | Event::End(Tag::CodeBlock(_))
            | Event::End(Tag::BlockQuote) => plain.push('\n'),
            _ => {}
        }
    }

    let plain = HTML_TAG.replace_all(&plain, " ");
    let plain = INTERNAL_MARKER.replace_all(&plain, " ");
    let plain = CITE_MARKER.replace_all(&plain, " ");
    plain.trim().to_string()
}

/// Whitespace-separated token count
pub fn word_count(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

/// Sentences split on terminal punctuation, empties dropped
pub fn sentences(text: &str) -> Vec<&str> {
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Vowel-group syllable approximation with a trailing silent-e/ed/es strip
pub fn count_syllables(word: &str) -> u32 {
    let cleaned: String = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_lowercase();
    if cleaned.is_empty() {
        return 0;
    }

    let stripped = SILENT_SUFFIX.replace(&cleaned, "");
    let groups = VOWEL_GROUP.find_iter(&stripped).count() as u32;
    groups.max(1)
}

/// Flesch-Kincaid style grade estimate
pub fn readability_grade(text: &str) -> f64 {
    let words: Vec<&str> = text.split_whitespace().collect();
    let sentence_count = sentences(text).len().max(1) as f64;
    if words.is_empty() {
        return 0.0;
    }

    let syllables: u32 = words.iter().map(|w| count_syllables(w)).sum();
    let word_count = words.len() as f64;

    0.39 * (word_count / sentence_count) + 11.8 * (syllables as f64 / word_count) - 15.59
}

/// Share of the text matching the topic, as a percentage of words.
///
/// Single-word topics count words containing the topic substring; multi-word
/// topics count occurrences of the full phrase.
pub fn keyword_density(text: &str, topic: &str) -> f64 {
    let words = word_count(text);
    if words == 0 {
        return 0.0;
    }

    let text_lc = text.to_lowercase();
    let topic_lc = topic.trim().to_lowercase();
    if topic_lc.is_empty() {
        return 0.0;
    }

    let matches = if topic_lc.contains(char::is_whitespace) {
        text_lc.matches(&topic_lc).count()
    } else {
        text_lc
            .split_whitespace()
            .filter(|w| w.contains(&topic_lc))
            .count()
    };

    (matches as f64 / words as f64) * 100.0
}

/// Anchor counts from the raw (marked-up) body: internal links have no
/// absolute external URL; `{{link:..}}` placeholders count as internal and
/// `[[cite:..]]` markers as external references.
pub fn link_counts(raw: &str) -> (u32, u32) {
    let mut internal = 0u32;
    let mut external = 0u32;

    for event in Parser::new(raw) {
        if let Event::Start(Tag::Link(_, dest, _)) = event {
            if is_external_url(&dest) {
                external += 1;
            } else {
                internal += 1;
            }
        }
    }

    for capture in HTML_ANCHOR.captures_iter(raw) {
        if is_external_url(&capture[1]) {
            external += 1;
        } else {
            internal += 1;
        }
    }

    internal += INTERNAL_MARKER.find_iter(raw).count() as u32;
    external += CITE_MARKER.find_iter(raw).count() as u32;

    (internal, external)
}

fn is_external_url(url: &str) -> bool {
    let lower = url.to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Distinct banned phrases present in the (lowercased) text
pub fn banned_phrases_found(text: &str) -> Vec<&'static str> {
    let text_lc = text.to_lowercase();
    BANNED_PHRASES
        .iter()
        .copied()
        .filter(|phrase| text_lc.contains(phrase))
        .collect()
}

/// 100 minus 10 per distinct banned phrase, floored at 0
pub fn unique_phrase_index(text: &str) -> u32 {
    let found = banned_phrases_found(text).len() as u32;
    100u32.saturating_sub(found * 10)
}

/// Population variance of words-per-sentence
pub fn sentence_length_variance(text: &str) -> f64 {
    let lengths: Vec<f64> = sentences(text)
        .iter()
        .map(|s| s.split_whitespace().count() as f64)
        .collect();
    if lengths.len() < 2 {
        return 0.0;
    }

    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64
}

/// 0-100 human-likeness estimate over markup-stripped text.
///
/// Starts at 100; -5 per distinct banned phrase; +2 per human-pattern marker
/// (contractions, informal openers, informal adverbs) capped at +15; +5 when
/// sentence-length variance is high, -10 when it is machine-uniform.
pub fn human_likeness_score(text: &str) -> u32 {
    let mut score: i64 = 100;

    score -= 5 * banned_phrases_found(text).len() as i64;

    let markers = CONTRACTION.find_iter(text).count()
        + INFORMAL_OPENER.find_iter(text).count()
        + INFORMAL_ADVERB.find_iter(text).count();
    score += (2 * markers as i64).min(15);

    let variance = sentence_length_variance(text);
    if variance > HIGH_VARIANCE {
        score += 5;
    } else if variance < LOW_VARIANCE {
        score -= 10;
    }

    score.clamp(0, 100) as u32
}
