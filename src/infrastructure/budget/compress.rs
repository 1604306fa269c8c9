//! Deterministic prompt compression

use once_cell::sync::Lazy;
use regex::Regex;

static HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static EXTRA_BREAKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Normalizes prompt whitespace: runs of horizontal whitespace collapse to
/// one space, each line is trimmed, three or more consecutive line breaks
/// collapse to two, and the whole text is trimmed. Idempotent.
pub fn compress_prompt(text: &str) -> String {
    let collapsed = HORIZONTAL_WS.replace_all(text, " ");

    let trimmed_lines = collapsed
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n");

    EXTRA_BREAKS
        .replace_all(&trimmed_lines, "\n\n")
        .trim()
        .to_string()
}
