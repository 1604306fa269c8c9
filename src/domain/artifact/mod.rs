//! Artifact domain - categories, pipeline inputs and outputs

mod category;
mod input;
mod output;

pub use category::ArtifactCategory;
pub use input::{
    AuxiliaryContext, CrossLinkCandidate, PipelineInput, PipelineInputBuilder, SearchSnippet,
};
pub use output::{PipelineOutput, QualityReport, QualityScore};
