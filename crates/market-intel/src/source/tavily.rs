//! Tavily Search Client

use async_trait::async_trait;
use serde::Serialize;

use super::{DEFAULT_TIMEOUT_SECS, SearchSource, ensure_success, http_client};
use crate::error::{IntelError, Result};
use crate::model::{NewsResult, SearchDepth, SearchOptions};

/// Tavily client configuration
#[derive(Clone, Debug)]
pub struct TavilyConfig {
    pub api_key: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl TavilyConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.tavily.com";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: Self::DEFAULT_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    api_key: &'a str,
    query: &'a str,
    search_depth: SearchDepth,
    include_answer: bool,
    max_results: u8,
}

impl<'a> SearchRequest<'a> {
    const fn new(api_key: &'a str, query: &'a str, options: &SearchOptions) -> Self {
        Self {
            api_key,
            query,
            search_depth: options.search_depth,
            include_answer: options.include_answer,
            max_results: options.max_results,
        }
    }
}

/// News search against Tavily's `/search` endpoint
pub struct TavilyClient {
    client: reqwest::Client,
    config: TavilyConfig,
}

impl TavilyClient {
    pub fn new(config: TavilyConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(IntelError::Config("Tavily API key is empty".into()));
        }

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            config,
        })
    }
}

#[async_trait]
impl SearchSource for TavilyClient {
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<NewsResult> {
        tracing::debug!(query, "Searching Tavily");

        let response = self
            .client
            .post(self.config.search_url())
            .json(&SearchRequest::new(&self.config.api_key, query, options))
            .send()
            .await?;

        let response = ensure_success("Tavily", response).await?;
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    fn name(&self) -> &str {
        "Tavily"
    }
}
