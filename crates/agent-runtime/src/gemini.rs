//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` over the Gemini `generateContent` REST API,
//! with automatic function calling: tool schemas go out as function
//! declarations, and every `functionCall` the model emits is run through the
//! registry and answered with a `functionResponse` until the model returns
//! plain text.

use std::collections::HashMap;
use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    provider::{Completion, CompletionRequest, FinishReason, LlmProvider, ModelInfo, TokenUsage},
    tool::{ToolCall, ToolRegistry},
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Gemini provider configuration
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,

    /// API root including version, without trailing slash
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum tool calls dispatched within one completion
    pub max_remote_calls: usize,
}

impl GeminiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            timeout_secs: 120,
            max_remote_calls: 10,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn generate_url(&self, model: &str) -> String {
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.base_url)
    }
}

/// Gemini LLM provider
pub struct GeminiProvider {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create from configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(AgentError::Config("Gemini API key is empty".into()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| AgentError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Tool registry as Gemini function declarations
    fn declarations(tools: &ToolRegistry) -> Vec<ToolDeclarations> {
        if tools.is_empty() {
            return Vec::new();
        }

        let function_declarations = tools
            .schemas()
            .into_iter()
            .map(|schema| FunctionDeclaration {
                parameters: schema.parameters_json_schema(),
                name: schema.name,
                description: schema.description,
            })
            .collect();

        vec![ToolDeclarations {
            function_declarations,
        }]
    }

    async fn generate_content(
        &self,
        request: &CompletionRequest,
        contents: &[Content],
        tools: &[ToolDeclarations],
    ) -> Result<GenerateContentResponse> {
        let body = GenerateContentRequest {
            contents,
            system_instruction: Content::text(None, &request.system_instruction),
            tools,
            generation_config: GenerationConfig::from_options(request),
        };

        let response = self
            .client
            .post(self.config.generate_url(&request.options.model))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status(status.as_u16(), &text));
        }

        response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Failed to parse Gemini response: {e}")))
    }
}

/// Run every requested call through the registry and build the reply turn
async fn answer_function_calls(tools: &ToolRegistry, calls: Vec<FunctionCall>) -> Content {
    let mut parts = Vec::with_capacity(calls.len());

    for call in calls {
        let arguments: HashMap<String, Value> = call.args.unwrap_or_default().into_iter().collect();
        let tool_call = ToolCall {
            name: call.name.clone(),
            arguments,
            id: Some(
                call.id
                    .clone()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            ),
        };

        tracing::debug!(
            tool = %tool_call.name,
            call_id = tool_call.id.as_deref().unwrap_or_default(),
            "Model requested tool"
        );

        let result = tools.dispatch(&tool_call).await;

        parts.push(Part::function_response(FunctionResponse {
            id: call.id,
            name: call.name,
            response: result.response_payload(),
        }));
    }

    Content {
        role: Some("user".into()),
        parts,
    }
}

fn map_transport_error(e: reqwest::Error) -> AgentError {
    if e.is_timeout() || e.is_connect() {
        AgentError::ProviderUnavailable(e.to_string())
    } else {
        AgentError::Provider(e.to_string())
    }
}

fn map_status(status: u16, body: &str) -> AgentError {
    let message = error_message(body).unwrap_or_else(|| body.to_string());
    let detail = format!("HTTP {status}: {message}");

    match status {
        429 => AgentError::RateLimited(detail),
        401 | 403 => AgentError::Auth(detail),
        500..=599 => AgentError::ProviderUnavailable(detail),
        _ => AgentError::Provider(detail),
    }
}

/// Pull `error.message` out of a Google API error body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(ToString::to_string)
}

fn convert_finish_reason(reason: &str) -> FinishReason {
    match reason {
        "STOP" => FinishReason::Stop,
        "MAX_TOKENS" => FinishReason::Length,
        "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
            FinishReason::ContentFilter
        }
        _ => FinishReason::Error,
    }
}

/// Convert the final Gemini response to an agent completion
fn convert_completion(
    response: GenerateContentResponse,
    model: &str,
    tool_calls: usize,
) -> Completion {
    let usage = response.usage_metadata.map(|u| {
        let prompt_tokens = u.prompt_token_count.unwrap_or(0);
        let completion_tokens = u.candidates_token_count.unwrap_or(0);
        TokenUsage {
            prompt_tokens,
            completion_tokens,
            total_tokens: u
                .total_token_count
                .unwrap_or(prompt_tokens + completion_tokens),
        }
    });

    let candidate = response.candidates.into_iter().next();
    let pending_calls = candidate.as_ref().is_some_and(|c| !c.function_calls().is_empty());

    let finish_reason = if pending_calls {
        Some(FinishReason::ToolUse)
    } else {
        candidate
            .as_ref()
            .and_then(|c| c.finish_reason.as_deref())
            .map(convert_finish_reason)
    };

    Completion {
        content: candidate.map(|c| c.text()).unwrap_or_default(),
        model: response.model_version.unwrap_or_else(|| model.to_string()),
        usage,
        finish_reason,
        tool_calls,
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn health_check(&self) -> Result<bool> {
        match self.list_models().await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
        tools: &ToolRegistry,
    ) -> Result<Completion> {
        let declarations = Self::declarations(tools);
        let mut contents = vec![Content::text(Some("user"), &request.message)];
        let mut tool_calls = 0;

        loop {
            let response = self
                .generate_content(request, &contents, &declarations)
                .await?;

            let calls = response
                .candidates
                .first()
                .map(Candidate::function_calls)
                .unwrap_or_default();
            if calls.is_empty() {
                return Ok(convert_completion(response, &request.options.model, tool_calls));
            }

            if tool_calls + calls.len() > self.config.max_remote_calls {
                tracing::warn!(
                    limit = self.config.max_remote_calls,
                    "Tool call limit reached, returning model output as is"
                );
                return Ok(convert_completion(response, &request.options.model, tool_calls));
            }

            tool_calls += calls.len();
            let mut model_turn = response
                .candidates
                .into_iter()
                .next()
                .and_then(|c| c.content)
                .unwrap_or_default();
            model_turn.role = Some("model".into());
            contents.push(model_turn);
            contents.push(answer_function_calls(tools, calls).await);
        }
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let response = self
            .client
            .get(self.config.models_url())
            .header("x-goog-api-key", &self.config.api_key)
            .query(&[("pageSize", "1000")])
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(map_status(status.as_u16(), &text));
        }

        let listing: ModelList = response
            .json()
            .await
            .map_err(|e| AgentError::Provider(format!("Failed to parse model list: {e}")))?;

        Ok(listing.into_model_infos())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: &'a [Content],
    system_instruction: Content,
    #[serde(skip_serializing_if = "is_empty_slice")]
    tools: &'a [ToolDeclarations],
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

fn is_empty_slice<T>(slice: &&[T]) -> bool {
    slice.is_empty()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

impl GenerationConfig {
    fn from_options(request: &CompletionRequest) -> Option<Self> {
        let options = &request.options;
        if options.temperature.is_none() && options.max_output_tokens.is_none() {
            return None;
        }
        Some(Self {
            temperature: options.temperature,
            max_output_tokens: options.max_output_tokens,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolDeclarations {
    function_declarations: Vec<FunctionDeclaration>,
}

#[derive(Debug, Serialize)]
struct FunctionDeclaration {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&str>, text: &str) -> Self {
        Self {
            role: role.map(Into::into),
            parts: vec![Part {
                text: Some(text.to_string()),
                ..Default::default()
            }],
        }
    }
}

/// One content part. Unknown fields (e.g. thought signatures) are kept so the
/// model turn can be echoed back verbatim.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<FunctionResponse>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Part {
    fn function_response(response: FunctionResponse) -> Self {
        Self {
            function_response: Some(response),
            ..Default::default()
        }
    }

    fn is_thought(&self) -> bool {
        self.extra.get("thought").and_then(Value::as_bool).unwrap_or(false)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    args: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    response: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    model_version: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

impl Candidate {
    fn parts(&self) -> &[Part] {
        self.content
            .as_ref()
            .map(|c| c.parts.as_slice())
            .unwrap_or_default()
    }

    fn function_calls(&self) -> Vec<FunctionCall> {
        self.parts()
            .iter()
            .filter_map(|p| p.function_call.clone())
            .collect()
    }

    /// Concatenated answer text, skipping thought summaries
    fn text(&self) -> String {
        self.parts()
            .iter()
            .filter(|p| !p.is_thought())
            .filter_map(|p| p.text.as_deref())
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct ModelList {
    #[serde(default)]
    models: Vec<RemoteModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteModel {
    name: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl ModelList {
    fn into_model_infos(self) -> Vec<ModelInfo> {
        self.models
            .into_iter()
            .map(|m| ModelInfo {
                display_name: m.display_name.unwrap_or_else(|| m.name.clone()),
                name: m.name,
            })
            .collect()
    }
}
