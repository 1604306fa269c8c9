use std::fmt::Debug;

use async_trait::async_trait;

use super::{GenerationRequest, GenerationResponse};
use crate::domain::DomainError;

/// Trait for the external text-generation capability.
///
/// Implementations wrap whatever transport and model backs generation; the
/// pipeline treats any error here as fatal for that attempt. Callers that
/// need a timeout wrap the invocation themselves (e.g. `tokio::time::timeout`)
/// so an aborted call records no usage and caches nothing.
#[async_trait]
pub trait GenerationProvider: Send + Sync + Debug {
    /// Generate text for the given request
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
