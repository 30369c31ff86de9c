//! Invocation Loop
//!
//! Sends one user message, the fixed system instruction and the registered
//! tools to the model service, retrying failed calls with exponential backoff.
//! Tool dispatch happens inside the provider; this loop never picks tools.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AgentError, Result};
use crate::provider::{Completion, CompletionRequest, GenerationOptions, LlmProvider};
use crate::retry::RetryPolicy;
use crate::tool::ToolRegistry;

/// Agent configuration
#[derive(Clone, Debug)]
pub struct AgentConfig {
    /// System instruction sent with every invocation
    pub system_prompt: String,

    /// Generation options
    pub generation: GenerationOptions,

    /// Backoff schedule for failed model calls
    pub retry: RetryPolicy,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            generation: GenerationOptions::default(),
            retry: RetryPolicy::default(),
        }
    }
}

const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful AI assistant. Use the available tools when they help, then answer concisely.";

/// Outcome of a successful analysis
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseStatus {
    #[serde(rename = "success")]
    Success,
}

/// Final text returned to the caller
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentResponse {
    pub text: String,
    pub status: ResponseStatus,
}

impl AgentResponse {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: ResponseStatus::Success,
        }
    }
}

/// The main Agent struct
///
/// Holds only shared, immutable handles, so one instance serves every request.
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    fn request(&self, message: &str) -> CompletionRequest {
        CompletionRequest::new(self.config.system_prompt.as_str(), message)
            .with_options(self.config.generation.clone())
    }

    /// Invoke the model service, retrying per the configured policy.
    ///
    /// Each attempt is an independent call with identical inputs. The error of
    /// the final attempt is returned unchanged.
    pub async fn invoke(&self, message: &str) -> Result<Completion> {
        let owned = self.request(message);
        let request = &owned;
        let tools = self.tools.as_ref();
        let provider = self.provider.as_ref();

        self.config
            .retry
            .run(move |attempt| async move {
                tracing::debug!(
                    attempt = attempt + 1,
                    provider = provider.name(),
                    model = %request.options.model,
                    "Invoking model"
                );
                provider.complete(request, tools).await.inspect_err(|e| {
                    if e.is_transient() {
                        tracing::warn!(
                            attempt = attempt + 1,
                            error = %e,
                            "Model service busy or unreachable"
                        );
                    } else {
                        tracing::error!(attempt = attempt + 1, error = %e, "Model call failed");
                    }
                })
            })
            .await
    }

    /// Invoke and extract the final text.
    ///
    /// A completion without usable text is [`AgentError::EmptyResponse`],
    /// reported separately from retry exhaustion and not retried.
    pub async fn analyze(&self, message: &str) -> Result<AgentResponse> {
        let completion = self.invoke(message).await?;

        if completion.is_empty() {
            tracing::warn!(model = %completion.model, "Model returned no text");
            return Err(AgentError::EmptyResponse);
        }

        tracing::info!(
            model = %completion.model,
            tool_calls = completion.tool_calls,
            chars = completion.content.len(),
            "Analysis complete"
        );

        Ok(AgentResponse::success(completion.content))
    }

}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    #[must_use]
    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    #[must_use]
    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    #[must_use]
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    #[must_use]
    pub const fn retry(mut self, retry: RetryPolicy) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
