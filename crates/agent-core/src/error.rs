//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider error
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unavailable or not responding
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The model service answered without any usable text
    #[error("No response from model")]
    EmptyResponse,

    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool validation failed
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AgentError {
    /// Whether the failure is likely transient on the provider side.
    ///
    /// Every failure is retried; this only picks the log level.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::ProviderUnavailable(_) | Self::RateLimited(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_response_is_distinct() {
        let err = AgentError::EmptyResponse;
        assert_eq!(err.to_string(), "No response from model");
        assert!(!err.is_transient());
    }

    #[test]
    fn test_transient_classification() {
        assert!(AgentError::RateLimited("429".into()).is_transient());
        assert!(AgentError::ProviderUnavailable("down".into()).is_transient());
        assert!(!AgentError::Auth("bad key".into()).is_transient());
    }
}
