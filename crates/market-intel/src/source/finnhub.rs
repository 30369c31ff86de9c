//! Finnhub Quote Client

use async_trait::async_trait;

use super::{DEFAULT_TIMEOUT_SECS, QuoteSource, ensure_success, http_client};
use crate::error::{IntelError, Result};
use crate::model::QuoteSnapshot;

/// Finnhub client configuration
#[derive(Clone, Debug)]
pub struct FinnhubConfig {
    /// API token
    pub api_key: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FinnhubConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://finnhub.io/api/v1";

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

    fn quote_url(&self) -> String {
        format!("{}/quote", self.base_url)
    }
}

/// Quote lookups against Finnhub's `/quote` endpoint
pub struct FinnhubClient {
    client: reqwest::Client,
    config: FinnhubConfig,
}

impl FinnhubClient {
    pub fn new(config: FinnhubConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(IntelError::Config("Finnhub API key is empty".into()));
        }

        Ok(Self {
            client: http_client(config.timeout_secs)?,
            config,
        })
    }
}

#[async_trait]
impl QuoteSource for FinnhubClient {
    async fn quote(&self, symbol: &str) -> Result<Option<QuoteSnapshot>> {
        tracing::debug!(symbol, "Fetching Finnhub quote");

        let response = self
            .client
            .get(self.config.quote_url())
            .query(&[("symbol", symbol), ("token", self.config.api_key.as_str())])
            .send()
            .await?;

        let response = ensure_success("Finnhub", response).await?;
        let body = response.bytes().await?;

        Ok(serde_json::from_slice(&body)?)
    }

    fn name(&self) -> &str {
        "Finnhub"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::serve_local;
    use crate::svckit::MarketDataTool;
    use axum::{Json, Router, extract::Query, http::StatusCode, routing::get};
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;

    fn client(base_url: &str) -> FinnhubClient {
        FinnhubClient::new(FinnhubConfig::new("test-token").with_base_url(base_url)).unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let config = FinnhubConfig::new("key");
        assert_eq!(config.base_url, "https://finnhub.io/api/v1");
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.quote_url(), "https://finnhub.io/api/v1/quote");
    }

    #[test]
    fn test_base_url_override_trims_slash() {
        let config = FinnhubConfig::new("key").with_base_url("http://localhost:9000/");
        assert_eq!(config.quote_url(), "http://localhost:9000/quote");
    }

    #[test]
    fn test_rejects_empty_key() {
        assert!(matches!(
            FinnhubClient::new(FinnhubConfig::new(" ")),
            Err(IntelError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_quote_sends_symbol_and_token() {
        let app = Router::new().route(
            "/quote",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let authorized = params.get("token").map(String::as_str) == Some("test-token");
                match params.get("symbol").map(String::as_str) {
                    Some("AAPL") if authorized => {
                        Json(json!({"c": 150.0, "h": 152, "l": 148, "pc": 149, "d": 1, "dp": 0.67}))
                    }
                    _ => Json(json!({})),
                }
            }),
        );
        let base_url = serve_local(app).await;

        let snapshot = client(&base_url).quote("AAPL").await.unwrap().unwrap();
        assert_eq!(snapshot.current, Some(dec!(150.0)));
        assert_eq!(snapshot.percent_change, Some(dec!(0.67)));

        let quote = MarketDataTool::new(Arc::new(client(&base_url)))
            .lookup(" $aapl ")
            .await;
        assert_eq!(serde_json::to_value(&quote).unwrap()["current_price"], json!(150.0));
    }

    #[tokio::test]
    async fn test_null_body_means_no_data() {
        let app = Router::new().route("/quote", get(|| async { Json(Value::Null) }));
        let base_url = serve_local(app).await;

        assert!(client(&base_url).quote("ZZZZ").await.unwrap().is_none());

        let result = MarketDataTool::new(Arc::new(client(&base_url)))
            .lookup("zzzz")
            .await;
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"error": "No data found for ZZZZ"})
        );
    }

    #[tokio::test]
    async fn test_unauthorized_becomes_error_marker() {
        let app = Router::new().route(
            "/quote",
            get(|| async { (StatusCode::UNAUTHORIZED, "Invalid API key") }),
        );
        let base_url = serve_local(app).await;

        let err = client(&base_url).quote("AAPL").await.unwrap_err();
        assert!(matches!(
            err,
            IntelError::Status { service: "Finnhub", status: 401, ref body } if body == "Invalid API key"
        ));

        let result = MarketDataTool::new(Arc::new(client(&base_url)))
            .lookup("AAPL")
            .await;
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"error": "Finnhub returned HTTP 401: Invalid API key"})
        );
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let app = Router::new().route(
            "/quote",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(json!({"c": 1}))
            }),
        );
        let base_url = serve_local(app).await;

        let mut config = FinnhubConfig::new("test-token").with_base_url(base_url);
        config.timeout_secs = 1;
        let err = FinnhubClient::new(config).unwrap().quote("AAPL").await.unwrap_err();

        assert!(matches!(err, IntelError::Network(ref e) if e.is_timeout()));
    }
}
