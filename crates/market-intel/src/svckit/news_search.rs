//! News Search Tool
//!
//! Searches recent financial news and sentiment. Any failure is returned as
//! `{ "error": .. }`.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    AgentError, ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::model::{NewsResult, SearchOptions};
use crate::source::SearchSource;

pub const TOOL_NAME: &str = "search_news";

/// Tool for searching news and sentiment
pub struct NewsSearchTool {
    source: Arc<dyn SearchSource>,
    options: SearchOptions,
}

impl NewsSearchTool {
    pub fn new(source: Arc<dyn SearchSource>) -> Self {
        Self {
            source,
            options: SearchOptions::default(),
        }
    }

    /// Run one search
    pub async fn search(&self, query: &str) -> NewsResult {
        let query = query.trim();
        if query.is_empty() {
            return NewsResult::error("Search query is empty");
        }

        match self.source.search(query, &self.options).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    query,
                    error = %e,
                    "News search failed"
                );
                NewsResult::error(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Tool for NewsSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.into(),
            description: "Searches for real-time financial news and market sentiment. Returns up to 3 articles and a synthesized answer.".into(),
            parameters: vec![ParameterSchema::required_string(
                "query",
                "Free-text search query, e.g. 'NVDA earnings sentiment'",
            )],
            category: Some("news".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let query = call
            .str_arg("query")
            .ok_or_else(|| AgentError::ToolValidation("'query' must be a string".into()))?;

        let result = self.search(query).await;
        let data = serde_json::to_value(&result)?;

        let tool_result = if result.is_error() {
            ToolResult::failure(TOOL_NAME, result.summary())
        } else {
            ToolResult::success(TOOL_NAME, result.summary())
        };

        Ok(tool_result.with_data(data))
    }
}
