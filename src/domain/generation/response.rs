use serde::{Deserialize, Serialize};

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Raw response from the external generation capability.
///
/// The text is not guaranteed to be well-formed structured data; the draft
/// parser owns turning it into a usable artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

impl GenerationResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_totals() {
        let usage = Usage::new(1200, 3400);
        assert_eq!(usage.total_tokens, 4600);
    }

    #[test]
    fn test_response_with_usage() {
        let response = GenerationResponse::new("text").with_usage(Usage::new(10, 20));
        assert_eq!(response.usage.unwrap().total_tokens, 30);
    }
}
