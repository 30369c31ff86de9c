//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for remote model services. The provider owns
//! function calling: it receives the tool registry and may execute any number
//! of tool calls before returning the final text.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{CompletionRequest, LlmProvider};
//!
//! let request = CompletionRequest::new(system_prompt, "How is AAPL doing?");
//! let completion = provider.complete(&request, &tools).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tool::ToolRegistry;

/// Default model identifier
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for LLM generation
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g., "gemini-2.5-flash")
    pub model: String,

    /// Temperature for sampling; provider default when unset
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate; provider default when unset
    #[serde(default)]
    pub max_output_tokens: Option<u32>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            temperature: None,
            max_output_tokens: None,
        }
    }
}

/// One model invocation: fixed system instruction plus the user's message
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system_instruction: String,
    pub message: String,
    #[serde(default)]
    pub options: GenerationOptions,
}

impl CompletionRequest {
    pub fn new(system_instruction: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            message: message.into(),
            options: GenerationOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }
}

/// Response from an LLM completion
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Completion {
    /// The generated text (may be empty when the model produced none)
    pub content: String,

    /// Model that generated this response
    pub model: String,

    /// Token usage statistics (if available)
    pub usage: Option<TokenUsage>,

    /// Finish reason
    pub finish_reason: Option<FinishReason>,

    /// Tool calls the provider dispatched while producing this response
    #[serde(default)]
    pub tool_calls: usize,
}

impl Completion {
    /// True when there is no usable text
    pub fn is_empty(&self) -> bool {
        self.content.trim().is_empty()
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolUse,
    ContentFilter,
    Error,
}

/// Information about a model
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    pub display_name: String,
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new model services.
/// The agent works exclusively through this interface.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &str;

    /// Check if the provider is reachable and the credentials work
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion, letting the model call tools from `tools`
    async fn complete(
        &self,
        request: &CompletionRequest,
        tools: &ToolRegistry,
    ) -> Result<Completion>;

    /// List available models
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_options_defaults() {
        let opts = GenerationOptions::default();
        assert_eq!(opts.model, DEFAULT_MODEL);
        assert!(opts.temperature.is_none());
    }

    #[test]
    fn test_completion_emptiness() {
        let mut completion = Completion::default();
        assert!(completion.is_empty());
        completion.content = "  \n".into();
        assert!(completion.is_empty());
        completion.content = "Neutral".into();
        assert!(!completion.is_empty());
    }
}
