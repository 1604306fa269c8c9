//! Application services

mod pipeline_service;

pub use pipeline_service::{PipelineConfig, PipelineService};
