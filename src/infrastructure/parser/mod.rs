//! Draft parsing - model output to structured article fields
//!
//! Model responses are supposed to be a JSON envelope, but providers
//! drift: fenced code blocks, trailing prose, broken escapes. Parsing
//! degrades through three strategies and never fails; the worst case is
//! the raw text as the body with synthesized metadata.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::debug;

static FENCED_JSON: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").unwrap());
static TITLE_FIELD: Lazy<Regex> = Lazy::new(|| field_pattern("title"));
static DESCRIPTION_FIELD: Lazy<Regex> = Lazy::new(|| field_pattern("description"));
static SLUG_FIELD: Lazy<Regex> = Lazy::new(|| field_pattern("slug"));
static BODY_FIELD: Lazy<Regex> = Lazy::new(|| field_pattern("(?:body|content)"));
static FIRST_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

fn field_pattern(name: &str) -> Regex {
    Regex::new(&format!(
        r#""{}"\s*:\s*"((?:[^"\\]|\\.)*)""#,
        name
    ))
    .unwrap()
}

/// Structured fields recovered from a raw model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDraft {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct DraftEnvelope {
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(alias = "content")]
    body: String,
}

/// Parses raw model output into article fields, degrading gracefully
#[derive(Debug, Default, Clone)]
pub struct DraftParser;

impl DraftParser {
    pub fn new() -> Self {
        Self
    }

    /// Never fails. Tries a JSON envelope first, then loose field
    /// extraction, then falls back to the raw text with metadata
    /// synthesized from the topic.
    pub fn parse(&self, raw: &str, topic: &str) -> ParsedDraft {
        if let Some(draft) = self.parse_envelope(raw, topic) {
            return draft;
        }
        if let Some(draft) = self.extract_fields(raw, topic) {
            debug!("draft envelope parse failed, recovered via field extraction");
            return draft;
        }
        debug!("draft field extraction failed, using raw body fallback");
        self.raw_fallback(raw, topic)
    }

    fn parse_envelope(&self, raw: &str, topic: &str) -> Option<ParsedDraft> {
        let candidate = FENCED_JSON
            .captures(raw)
            .map(|caps| caps[1].to_string())
            .unwrap_or_else(|| raw.trim().to_string());

        let envelope: DraftEnvelope = serde_json::from_str(&candidate).ok()?;
        if envelope.body.trim().is_empty() {
            return None;
        }

        let slug = envelope
            .slug
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&envelope.title));
        let description = envelope
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| synthesize_description(&envelope.body, topic));

        Some(ParsedDraft {
            title: envelope.title,
            description,
            slug,
            body: envelope.body,
        })
    }

    /// Field-by-field regex recovery for envelopes that are not valid
    /// JSON as a whole (truncated, trailing prose, stray characters)
    fn extract_fields(&self, raw: &str, topic: &str) -> Option<ParsedDraft> {
        let title = capture_string(&TITLE_FIELD, raw)?;
        let body = capture_string(&BODY_FIELD, raw)?;
        if body.trim().is_empty() {
            return None;
        }

        let slug = capture_string(&SLUG_FIELD, raw)
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| slugify(&title));
        let description = capture_string(&DESCRIPTION_FIELD, raw)
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| synthesize_description(&body, topic));

        Some(ParsedDraft {
            title,
            description,
            slug,
            body,
        })
    }

    fn raw_fallback(&self, raw: &str, topic: &str) -> ParsedDraft {
        let body = raw.trim().to_string();
        let title = FIRST_HEADING
            .captures(&body)
            .map(|caps| caps[1].trim().to_string())
            .unwrap_or_else(|| title_case(topic));

        ParsedDraft {
            description: synthesize_description(&body, topic),
            slug: slugify(&title),
            title,
            body,
        }
    }
}

/// Unescapes a JSON string capture by re-quoting it and running it back
/// through the JSON parser
fn capture_string(pattern: &Regex, raw: &str) -> Option<String> {
    let captured = pattern.captures(raw)?.get(1)?.as_str().to_string();
    serde_json::from_str(&format!("\"{}\"", captured)).ok()
}

/// Lowercase ASCII slug, non-alphanumeric runs collapsed to single hyphens
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_was_hyphen = true;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

fn title_case(topic: &str) -> String {
    topic
        .split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// First paragraph of prose, trimmed of markup and cut at a word
/// boundary near the meta-description length limit
fn synthesize_description(body: &str, topic: &str) -> String {
    const MAX_LEN: usize = 157;

    let first_paragraph = body
        .split("\n\n")
        .map(str::trim)
        .find(|block| !block.is_empty() && !block.starts_with('#'));

    let text = match first_paragraph {
        Some(paragraph) => paragraph.replace('\n', " "),
        None => return format!("A practical guide to {}.", topic),
    };

    if text.chars().count() <= MAX_LEN {
        return text;
    }

    let mut truncated = String::new();
    for word in text.split_whitespace() {
        if truncated.chars().count() + word.chars().count() + 1 > MAX_LEN {
            break;
        }
        if !truncated.is_empty() {
            truncated.push(' ');
        }
        truncated.push_str(word);
    }
    format!("{}...", truncated)
}
