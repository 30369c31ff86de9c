//! # agent-core
//!
//! Core agent logic with provider-agnostic LLM abstraction and extensible tool system.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Retry Loop  │  │    Tools    │  │   LlmProvider       │  │
//! │  │  (backoff)  │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` owns function calling: it receives the registry and lets
//! the model decide which tools to run. The agent only wraps the call in
//! retries and turns the completion into a response.

pub mod error;
pub mod provider;
pub mod reasoning;
pub mod retry;
pub mod tool;

pub use error::{AgentError, Result};
pub use provider::{Completion, CompletionRequest, GenerationOptions, LlmProvider, ModelInfo};
pub use reasoning::{Agent, AgentBuilder, AgentConfig, AgentResponse, ResponseStatus};
pub use retry::RetryPolicy;
pub use tool::{ParameterSchema, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
