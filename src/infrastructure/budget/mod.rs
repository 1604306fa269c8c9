//! Budget manager - resource tiers, context pruning, usage accounting

mod compress;
mod pruner;
mod tier;
mod usage;

pub use compress::compress_prompt;
pub use pruner::{estimate_tokens, prune_context, ContextClass, ContextSegment, PrunedContext};
pub use tier::{select_tier, ResourceTier, LIGHT, RESEARCH, STANDARD};
pub use usage::{BudgetConfig, UsageStats, UsageTracker};

use crate::domain::{ArtifactCategory, AuxiliaryContext};

/// Shapes how much context and output a generation call is allowed, and
/// accumulates what was spent doing it. One instance is shared across
/// concurrent pipeline runs; the counters are atomic.
#[derive(Debug, Default)]
pub struct BudgetManager {
    config: BudgetConfig,
    usage: UsageTracker,
}

impl BudgetManager {
    pub fn new(config: BudgetConfig) -> Self {
        Self {
            config,
            usage: UsageTracker::new(),
        }
    }

    /// Fixed category-to-tier lookup
    pub fn select_tier(&self, category: ArtifactCategory) -> &'static ResourceTier {
        select_tier(category)
    }

    /// Cheap length-based size estimate (relative budgeting only)
    pub fn estimate_tokens(&self, text: &str) -> u32 {
        estimate_tokens(text)
    }

    /// Greedy priority-ordered packing into the tier's input budget
    pub fn prune_context(
        &self,
        context: &AuxiliaryContext,
        prior_article: Option<&str>,
        max_input_tokens: u32,
    ) -> PrunedContext {
        prune_context(context, prior_article, max_input_tokens)
    }

    /// Idempotent whitespace normalization for prompts
    pub fn compress_prompt(&self, text: &str) -> String {
        compress_prompt(text)
    }

    pub fn track_usage(&self, input_tokens: u64, output_tokens: u64) {
        self.usage.track(input_tokens, output_tokens);
    }

    pub fn usage_stats(&self) -> UsageStats {
        self.usage.stats()
    }

    pub fn estimate_cost(&self) -> f64 {
        self.usage.estimate_cost(&self.config)
    }

    pub fn reset_usage(&self) {
        self.usage.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manager_wires_components() {
        let manager = BudgetManager::default();

        let tier = manager.select_tier(ArtifactCategory::GeneratedArticle);
        assert_eq!(tier.name, "standard");

        manager.track_usage(2_000, 3_500);
        let stats = manager.usage_stats();
        assert_eq!(stats.calls, 1);
        assert!(manager.estimate_cost() > 0.0);

        manager.reset_usage();
        assert_eq!(manager.usage_stats().calls, 0);
    }

    #[test]
    fn test_prune_respects_tier_budget() {
        let manager = BudgetManager::default();
        let tier = manager.select_tier(ArtifactCategory::GeneratedArticle);

        let context = AuxiliaryContext {
            questions: vec!["q".to_string(); 50],
            ..Default::default()
        };
        let pruned = manager.prune_context(&context, Some("prior"), tier.max_input_tokens);
        assert!(pruned.total_tokens <= tier.max_input_tokens);
    }
}
