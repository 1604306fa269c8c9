//! Running usage counters and cost estimation

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Per-million-token pricing for cost estimates
#[derive(Debug, Clone)]
pub struct BudgetConfig {
    /// USD per million input tokens
    pub input_rate_per_million: f64,
    /// USD per million output tokens
    pub output_rate_per_million: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            input_rate_per_million: 3.0,
            output_rate_per_million: 15.0,
        }
    }
}

impl BudgetConfig {
    pub fn with_rates(mut self, input_per_million: f64, output_per_million: f64) -> Self {
        self.input_rate_per_million = input_per_million;
        self.output_rate_per_million = output_per_million;
        self
    }
}

/// Snapshot of the running counters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsageStats {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub calls: u64,
}

/// Atomic usage accumulator shared across concurrent pipeline runs
#[derive(Debug, Default)]
pub struct UsageTracker {
    input_tokens: AtomicU64,
    output_tokens: AtomicU64,
    calls: AtomicU64,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&self, input_tokens: u64, output_tokens: u64) {
        self.input_tokens.fetch_add(input_tokens, Ordering::Relaxed);
        self.output_tokens.fetch_add(output_tokens, Ordering::Relaxed);
        self.calls.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> UsageStats {
        UsageStats {
            input_tokens: self.input_tokens.load(Ordering::Relaxed),
            output_tokens: self.output_tokens.load(Ordering::Relaxed),
            calls: self.calls.load(Ordering::Relaxed),
        }
    }

    /// Estimated spend in USD at the configured per-million rates
    pub fn estimate_cost(&self, config: &BudgetConfig) -> f64 {
        let stats = self.stats();
        (stats.input_tokens as f64 / 1_000_000.0) * config.input_rate_per_million
            + (stats.output_tokens as f64 / 1_000_000.0) * config.output_rate_per_million
    }

    pub fn reset(&self) {
        self.input_tokens.store(0, Ordering::Relaxed);
        self.output_tokens.store(0, Ordering::Relaxed);
        self.calls.store(0, Ordering::Relaxed);
    }
}
