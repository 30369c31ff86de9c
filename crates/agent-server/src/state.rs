//! Application State

use std::sync::Arc;

use agent_core::{Agent, LlmProvider};

/// Shared application state
///
/// Everything behind the `Arc`s is built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// Analyst agent (provider + tool registry + retry policy)
    pub agent: Arc<Agent>,

    /// Model service, used directly for the model listing
    pub provider: Arc<dyn LlmProvider>,
}
