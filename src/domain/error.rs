use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Generation error: {provider} - {message}")]
    Generation { provider: String, message: String },

    #[error("Cache error: {message}")]
    Cache { message: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn generation(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Generation {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// True when the error came from the external generation capability.
    ///
    /// Generation failures are the only errors the pipeline surfaces to the
    /// caller; everything else degrades to a best-effort result.
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_error() {
        let error = DomainError::generation("mock", "model timed out");
        assert_eq!(error.to_string(), "Generation error: mock - model timed out");
        assert!(error.is_generation());
    }

    #[test]
    fn test_cache_error() {
        let error = DomainError::cache("snapshot write failed");
        assert_eq!(error.to_string(), "Cache error: snapshot write failed");
        assert!(!error.is_generation());
    }

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("empty topic");
        assert_eq!(error.to_string(), "Validation error: empty topic");
    }
}
