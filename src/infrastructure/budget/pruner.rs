//! Priority-ordered context pruning under a token budget

use serde::{Deserialize, Serialize};

use crate::domain::AuxiliaryContext;

/// Approximate characters per token for the length heuristic
const CHARS_PER_TOKEN: usize = 4;

/// At most this many search snippets are considered
const MAX_SNIPPETS: usize = 5;
/// At most this many competitor gaps are considered
const MAX_GAPS: usize = 10;

/// Cheap length-based size estimate.
///
/// Used only for relative budgeting, never for billing-grade accuracy.
pub fn estimate_tokens(text: &str) -> u32 {
    text.chars().count().div_ceil(CHARS_PER_TOKEN) as u32
}

/// Context classes in fixed pruning priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextClass {
    Questions,
    SearchSnippets,
    CompetitorGaps,
    PriorArticle,
}

/// One included context class, rendered and measured
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSegment {
    pub class: ContextClass,
    pub text: String,
    pub estimated_tokens: u32,
}

/// The auxiliary material that fit inside the input budget
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrunedContext {
    pub segments: Vec<ContextSegment>,
    pub total_tokens: u32,
    /// Classes dropped whole because they would have overflowed
    pub skipped: Vec<ContextClass>,
}

impl PrunedContext {
    pub fn includes(&self, class: ContextClass) -> bool {
        self.segments.iter().any(|s| s.class == class)
    }

    /// Renders the surviving segments in priority order for the prompt
    pub fn render(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn push(&mut self, class: ContextClass, text: String) {
        let estimated_tokens = estimate_tokens(&text);
        self.total_tokens += estimated_tokens;
        self.segments.push(ContextSegment {
            class,
            text,
            estimated_tokens,
        });
    }
}

/// Greedy, priority-ordered packing of context material under the budget.
///
/// Classes are walked in fixed order (questions, search snippets, competitor
/// gaps, prior article); a class that would overflow the remaining budget is
/// skipped whole, except the prior article, which is truncated to exactly
/// fill what remains. High information density per unit cost wins ties.
pub fn prune_context(
    context: &AuxiliaryContext,
    prior_article: Option<&str>,
    max_input_tokens: u32,
) -> PrunedContext {
    let mut pruned = PrunedContext::default();

    if !context.questions.is_empty() {
        let block = format!(
            "Reader questions to answer:\n{}",
            context
                .questions
                .iter()
                .map(|q| format!("- {}", q))
                .collect::<Vec<_>>()
                .join("\n")
        );
        try_include(&mut pruned, ContextClass::Questions, block, max_input_tokens);
    }

    if !context.search_snippets.is_empty() {
        let block = format!(
            "Top search results:\n{}",
            context
                .search_snippets
                .iter()
                .take(MAX_SNIPPETS)
                .map(|s| format!("- {} ({}): {}", s.title, s.url, s.snippet))
                .collect::<Vec<_>>()
                .join("\n")
        );
        try_include(&mut pruned, ContextClass::SearchSnippets, block, max_input_tokens);
    }

    if !context.competitor_gaps.is_empty() {
        let block = format!(
            "Topics competitors fail to cover:\n{}",
            context
                .competitor_gaps
                .iter()
                .take(MAX_GAPS)
                .map(|g| format!("- {}", g))
                .collect::<Vec<_>>()
                .join("\n")
        );
        try_include(&mut pruned, ContextClass::CompetitorGaps, block, max_input_tokens);
    }

    if let Some(prior) = prior_article.filter(|p| !p.trim().is_empty()) {
        include_prior_article(&mut pruned, prior, max_input_tokens);
    }

    pruned
}

fn try_include(pruned: &mut PrunedContext, class: ContextClass, block: String, budget: u32) {
    if pruned.total_tokens + estimate_tokens(&block) <= budget {
        pruned.push(class, block);
    } else {
        pruned.skipped.push(class);
    }
}

/// The final class is truncated rather than skipped: whatever budget is left
/// gets filled with the head of the prior article.
fn include_prior_article(pruned: &mut PrunedContext, prior: &str, budget: u32) {
    const HEADER: &str = "Previous version of this article:\n";

    let remaining = budget.saturating_sub(pruned.total_tokens) as usize;
    let header_tokens = estimate_tokens(HEADER) as usize;
    if remaining <= header_tokens {
        pruned.skipped.push(ContextClass::PriorArticle);
        return;
    }

    let body_chars = (remaining - header_tokens) * CHARS_PER_TOKEN;
    let body: String = if prior.chars().count() <= body_chars {
        prior.to_string()
    } else {
        prior.chars().take(body_chars).collect()
    };

    pruned.push(ContextClass::PriorArticle, format!("{}{}", HEADER, body));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SearchSnippet;

    fn full_context() -> AuxiliaryContext {
        AuxiliaryContext {
            questions: vec!["What is it?".to_string(), "Why use it?".to_string()],
            search_snippets: vec![SearchSnippet::new(
                "Guide",
                "A thorough guide to the topic",
                "https://example.com/guide",
            )],
            competitor_gaps: vec!["No pricing discussion".to_string()],
        }
    }

    #[test]
    fn test_estimate_tokens() {
        assert_eq!(estimate_tokens(""), 0);
        assert_eq!(estimate_tokens("abcd"), 1);
        assert_eq!(estimate_tokens("abcde"), 2);
    }

    #[test]
    fn test_everything_fits_in_large_budget() {
        let pruned = prune_context(&full_context(), Some("old article body"), 8_000);

        assert!(pruned.includes(ContextClass::Questions));
        assert!(pruned.includes(ContextClass::SearchSnippets));
        assert!(pruned.includes(ContextClass::CompetitorGaps));
        assert!(pruned.includes(ContextClass::PriorArticle));
        assert!(pruned.skipped.is_empty());
        assert!(pruned.total_tokens <= 8_000);
    }

    #[test]
    fn test_budget_never_exceeded() {
        let prior = "word ".repeat(5_000);
        for budget in [10u32, 50, 200, 1_000] {
            let pruned = prune_context(&full_context(), Some(&prior), budget);
            assert!(
                pruned.total_tokens <= budget,
                "budget {} exceeded: {}",
                budget,
                pruned.total_tokens
            );
        }
    }

    #[test]
    fn test_overflowing_class_skipped_whole() {
        let mut context = full_context();
        // A snippet block far larger than the budget
        context.search_snippets = vec![SearchSnippet::new(
            "Huge",
            "x".repeat(4_000),
            "https://example.com",
        )];

        let pruned = prune_context(&context, None, 100);

        assert!(pruned.includes(ContextClass::Questions));
        assert!(!pruned.includes(ContextClass::SearchSnippets));
        assert!(pruned.skipped.contains(&ContextClass::SearchSnippets));
        // Lower-priority class still gets its chance at the remaining budget
        assert!(pruned.includes(ContextClass::CompetitorGaps));
    }

    #[test]
    fn test_prior_article_truncated_to_fill() {
        let prior = "a".repeat(100_000);
        let pruned = prune_context(&AuxiliaryContext::default(), Some(&prior), 500);

        assert!(pruned.includes(ContextClass::PriorArticle));
        assert!(pruned.total_tokens <= 500);
        // Within one token of the budget: truncation fills what remains
        assert!(pruned.total_tokens >= 499);
    }

    #[test]
    fn test_priority_order_in_render() {
        let pruned = prune_context(&full_context(), Some("prior text"), 8_000);
        let rendered = pruned.render();

        let q = rendered.find("Reader questions").unwrap();
        let s = rendered.find("Top search results").unwrap();
        let g = rendered.find("competitors fail").unwrap();
        let p = rendered.find("Previous version").unwrap();
        assert!(q < s && s < g && g < p);
    }

    #[test]
    fn test_empty_context() {
        let pruned = prune_context(&AuxiliaryContext::default(), None, 1_000);
        assert!(pruned.segments.is_empty());
        assert_eq!(pruned.total_tokens, 0);
    }
}
