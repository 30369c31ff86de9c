//! Remote Data Sources
//!
//! Abstractions over the quote and news providers. The tools only see these
//! traits, so tests swap in canned sources.

mod finnhub;
mod tavily;

pub use finnhub::{FinnhubClient, FinnhubConfig};
pub use tavily::{TavilyClient, TavilyConfig};

use async_trait::async_trait;

use crate::error::{IntelError, Result};
use crate::model::{NewsResult, QuoteSnapshot, SearchOptions};

/// Timeout applied to every tool-side HTTP request
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Quote provider (Strategy pattern)
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the quote snapshot for an already-normalized symbol.
    ///
    /// `Ok(None)` means the provider answered with an empty body.
    async fn quote(&self, symbol: &str) -> Result<Option<QuoteSnapshot>>;

    /// Source name
    fn name(&self) -> &str;
}

/// News search provider
#[async_trait]
pub trait SearchSource: Send + Sync {
    /// Run one search
    async fn search(&self, query: &str, options: &SearchOptions) -> Result<NewsResult>;

    /// Source name
    fn name(&self) -> &str;
}

/// Turn a non-success response into [`IntelError::Status`]
async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(IntelError::Status {
        service,
        status: status.as_u16(),
        body,
    })
}

fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(IntelError::from)
}

/// Serve `app` on an ephemeral local port and return its base URL
#[cfg(test)]
pub(crate) async fn serve_local(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}
