//! Domain layer - entities, traits, and errors

pub mod artifact;
pub mod generation;
pub mod storage;

mod error;

pub use artifact::{
    ArtifactCategory, AuxiliaryContext, CrossLinkCandidate, PipelineInput, PipelineInputBuilder,
    PipelineOutput, QualityReport, QualityScore, SearchSnippet,
};
pub use error::DomainError;
pub use generation::{GenerationProvider, GenerationRequest, GenerationResponse, Usage};
pub use storage::{CacheEntry, CacheSnapshot, SnapshotStore};
