//! Text humanization passes

use std::sync::Mutex;

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use regex::Regex;

use super::tables::{
    CONNECTORS, CONTRACTIONS, CONVERSATIONAL_SWAPS, OPENERS, PHRASE_SWAPS, RHETORICAL_QUESTIONS,
};
use crate::infrastructure::quality::{human_likeness_score, strip_markup};

/// Probability that a formal phrase becomes a contraction
const CONTRACTION_PROBABILITY: f64 = 0.7;
/// Probability that a non-initial sentence gets a coordinating connector
const CONNECTOR_PROBABILITY: f64 = 0.15;
/// Every Nth second-level heading gets a persona opener
const OPENER_INTERVAL: usize = 3;

static PHRASE_PATTERNS: Lazy<Vec<(Regex, &'static [&'static str])>> = Lazy::new(|| {
    PHRASE_SWAPS
        .iter()
        .map(|(phrase, alts)| (word_pattern(phrase), *alts))
        .collect()
});

static CONTRACTION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    CONTRACTIONS
        .iter()
        .map(|(formal, contracted)| (word_pattern(formal), *contracted))
        .collect()
});

static CONVERSATIONAL_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    CONVERSATIONAL_SWAPS
        .iter()
        .map(|(formal, casual)| (word_pattern(formal), *casual))
        .collect()
});

static SENTENCE_WITH_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^.!?]+[.!?]+").unwrap());

fn word_pattern(phrase: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{}\b", regex::escape(phrase))).unwrap()
}

/// Rewrites generated text to reduce detectable machine-authorship
/// signatures: phrase substitution, contraction insertion, sentence-rhythm
/// variation, persona openers, and strategic imperfections, in that order.
///
/// Non-deterministic by design; the random source is injectable so tests
/// can pin the behavior down.
pub struct Humanizer {
    rng: Mutex<Box<dyn RngCore + Send>>,
}

impl std::fmt::Debug for Humanizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Humanizer").finish_non_exhaustive()
    }
}

impl Default for Humanizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Humanizer {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: impl RngCore + Send + 'static) -> Self {
        Self {
            rng: Mutex::new(Box::new(rng)),
        }
    }

    /// Applies all five passes to the markdown body
    pub fn humanize(&self, text: &str) -> String {
        let mut guard = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let rng: &mut dyn RngCore = &mut **guard;

        let text = substitute_phrases(text, rng);
        let text = insert_contractions(&text, rng);
        let text = vary_rhythm(&text, rng);
        let text = inject_openers(&text, rng);
        strategic_imperfections(&text, rng)
    }

    /// Independent human-likeness self-check, same shape as the gate metric
    pub fn score(&self, text: &str) -> u32 {
        human_likeness_score(&strip_markup(text))
    }
}

/// Keeps the original leading capitalization when swapping words in place
fn match_case(replacement: &str, original: &str) -> String {
    if original.chars().next().is_some_and(|c| c.is_uppercase()) {
        let mut chars = replacement.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => String::new(),
        }
    } else {
        replacement.to_string()
    }
}

fn lowercase_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Pass 1: every banned phrase occurrence becomes a random alternative
fn substitute_phrases(text: &str, rng: &mut dyn RngCore) -> String {
    let mut result = text.to_string();
    for (pattern, alternatives) in PHRASE_PATTERNS.iter() {
        result = pattern
            .replace_all(&result, |caps: &regex::Captures<'_>| {
                let pick = alternatives[rng.gen_range(0..alternatives.len())];
                match_case(pick, &caps[0])
            })
            .into_owned();
    }
    result
}

/// Pass 2: formal phrasing contracts with probability 0.7, staying formal
/// otherwise to preserve natural variance
fn insert_contractions(text: &str, rng: &mut dyn RngCore) -> String {
    let mut result = text.to_string();
    for (pattern, contracted) in CONTRACTION_PATTERNS.iter() {
        result = pattern
            .replace_all(&result, |caps: &regex::Captures<'_>| {
                if rng.gen::<f64>() < CONTRACTION_PROBABILITY {
                    match_case(contracted, &caps[0])
                } else {
                    caps[0].to_string()
                }
            })
            .into_owned();
    }
    result
}

/// Pass 3: in blocks of three or more sentences, non-initial sentences get
/// a coordinating connector with low probability
fn vary_rhythm(text: &str, rng: &mut dyn RngCore) -> String {
    text.split("\n\n")
        .map(|block| vary_block_rhythm(block, rng))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn vary_block_rhythm(block: &str, rng: &mut dyn RngCore) -> String {
    if block.trim_start().starts_with('#') {
        return block.to_string();
    }

    let mut parts: Vec<String> = SENTENCE_WITH_END
        .find_iter(block)
        .map(|m| m.as_str().trim().to_string())
        .collect();
    if parts.len() < 3 {
        return block.to_string();
    }

    let tail_start = SENTENCE_WITH_END
        .find_iter(block)
        .last()
        .map(|m| m.end())
        .unwrap_or(0);
    let tail = block[tail_start..].trim();

    for sentence in parts.iter_mut().skip(1) {
        if rng.gen::<f64>() >= CONNECTOR_PROBABILITY {
            continue;
        }
        if CONNECTORS.iter().any(|c| sentence.starts_with(c)) {
            continue;
        }
        let connector = CONNECTORS[rng.gen_range(0..CONNECTORS.len())];
        *sentence = format!("{} {}", connector, lowercase_first(sentence));
    }

    let mut rebuilt = parts.join(" ");
    if !tail.is_empty() {
        rebuilt.push(' ');
        rebuilt.push_str(tail);
    }
    rebuilt
}

/// Pass 4: every third second-level heading gets a bolded persona opener
/// inserted immediately after it
fn inject_openers(text: &str, rng: &mut dyn RngCore) -> String {
    let mut headings_seen = 0usize;
    let mut lines = Vec::new();

    for line in text.lines() {
        let is_h2 = line.starts_with("## ");
        lines.push(line.to_string());

        if is_h2 {
            headings_seen += 1;
            if headings_seen % OPENER_INTERVAL == 0 {
                let opener = OPENERS[rng.gen_range(0..OPENERS.len())];
                lines.push(String::new());
                lines.push(format!("**{}**", opener));
            }
        }
    }

    lines.join("\n")
}

/// Pass 5: one rhetorical question a third of the way through, plus the
/// deterministic formal-to-conversational swaps
fn strategic_imperfections(text: &str, rng: &mut dyn RngCore) -> String {
    let mut blocks: Vec<String> = text.split("\n\n").map(str::to_string).collect();

    if blocks.len() >= 3 {
        let question = RHETORICAL_QUESTIONS[rng.gen_range(0..RHETORICAL_QUESTIONS.len())];
        let position = (blocks.len() / 3).max(1);
        blocks.insert(position, question.to_string());
    }

    let mut result = blocks.join("\n\n");
    for (pattern, casual) in CONVERSATIONAL_PATTERNS.iter() {
        result = pattern
            .replace_all(&result, |caps: &regex::Captures<'_>| match_case(casual, &caps[0]))
            .into_owned();
    }
    result
}
