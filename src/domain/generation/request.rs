use serde::{Deserialize, Serialize};

/// Parameters for a single external generation call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System-level writing instructions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// The assembled user prompt
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            prompt: prompt.into(),
            max_output_tokens: None,
            temperature: None,
        }
    }

    pub fn builder(prompt: impl Into<String>) -> GenerationRequestBuilder {
        GenerationRequestBuilder {
            request: Self::new(prompt),
        }
    }
}

/// Builder for [`GenerationRequest`]
#[derive(Debug)]
pub struct GenerationRequestBuilder {
    request: GenerationRequest,
}

impl GenerationRequestBuilder {
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.request.system_prompt = Some(prompt.into());
        self
    }

    pub fn max_output_tokens(mut self, tokens: u32) -> Self {
        self.request.max_output_tokens = Some(tokens);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.request.temperature = Some(temperature);
        self
    }

    pub fn build(self) -> GenerationRequest {
        self.request
    }
}
