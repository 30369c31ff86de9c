//! # agent-runtime
//!
//! Model-service providers for the finagent workspace.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google Gemini `generateContent` with automatic
//!   function calling
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::gemini::{GeminiConfig, GeminiProvider};
//!
//! let provider = GeminiProvider::new(GeminiConfig::new(api_key))?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

// Re-export core types for convenience
pub use agent_core::{Agent, AgentError, LlmProvider, Result, Tool, ToolRegistry};
