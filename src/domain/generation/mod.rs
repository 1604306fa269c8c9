//! Generation domain - the external text-generation capability contract

mod provider;
mod request;
mod response;

pub use provider::GenerationProvider;
pub use request::{GenerationRequest, GenerationRequestBuilder};
pub use response::{GenerationResponse, Usage};

#[cfg(test)]
pub use provider::mock::MockGenerationProvider;
