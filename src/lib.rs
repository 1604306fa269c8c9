//! Content Forge
//!
//! Orchestration core for long-form content generation:
//! - Fingerprint cache with TTL expiry and frequency-based eviction
//! - Resource budgeting, context pruning, and usage accounting
//! - Quality gate with a weighted publish decision
//! - Humanization pass over generated drafts
//! - Pipeline orchestrator with bounded repair-retry

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    ArtifactCategory, AuxiliaryContext, CrossLinkCandidate, DomainError, GenerationProvider,
    GenerationRequest, GenerationResponse, PipelineInput, PipelineOutput, QualityReport,
    QualityScore, SearchSnippet, Usage,
};
pub use infrastructure::budget::BudgetManager;
pub use infrastructure::cache::{CacheConfig, FingerprintCache};
pub use infrastructure::humanize::Humanizer;
pub use infrastructure::quality::QualityGate;
pub use infrastructure::services::{PipelineConfig, PipelineService};
