use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Provider timeout: {provider} - {message}")]
    Timeout { provider: String, message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn timeout(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Timeout {
            provider: provider.into(),
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

    /// Whether the error was caused by the caller's input rather than a downstream fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let error = DomainError::validation("No messages provided.");
        assert_eq!(error.to_string(), "Validation error: No messages provided.");
        assert!(error.is_client_error());
    }

    #[test]
    fn test_provider_error() {
        let error = DomainError::provider("deepseek", "HTTP 503 Service Unavailable");
        assert_eq!(
            error.to_string(),
            "Provider error: deepseek - HTTP 503 Service Unavailable"
        );
        assert!(!error.is_client_error());
    }

    #[test]
    fn test_timeout_error() {
        let error = DomainError::timeout("http", "request timed out after 30s");
        assert!(error.to_string().contains("timed out"));
        assert!(!error.is_client_error());
    }
}
