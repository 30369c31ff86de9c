//! Market Data Tool
//!
//! Fetches a quote snapshot for one ticker. Provider failures come back as an
//! error marker in the result, never as an `Err`.

use std::sync::Arc;

use async_trait::async_trait;

use agent_core::{
    AgentError, ParameterSchema, Result as CoreResult, Tool, ToolCall, ToolResult, ToolSchema,
};

use crate::model::{MarketDataResult, MarketQuote};
use crate::source::QuoteSource;

pub const TOOL_NAME: &str = "get_market_data";

/// Upper-case a ticker and drop `$` currency-prefix markers
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().replace('$', "").trim().to_uppercase()
}

/// Tool for looking up stock/crypto quotes
pub struct MarketDataTool {
    source: Arc<dyn QuoteSource>,
}

impl MarketDataTool {
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self { source }
    }

    /// Look up one ticker
    pub async fn lookup(&self, ticker: &str) -> MarketDataResult {
        let symbol = normalize_ticker(ticker);
        if symbol.is_empty() {
            return MarketDataResult::error("Ticker symbol is empty");
        }

        match self.source.quote(&symbol).await {
            Ok(Some(snapshot)) => MarketQuote::from_snapshot(symbol.as_str(), snapshot)
                .map_or_else(|| MarketDataResult::no_data(&symbol), MarketDataResult::Quote),
            Ok(None) => MarketDataResult::no_data(&symbol),
            Err(e) => {
                tracing::warn!(
                    source = self.source.name(),
                    symbol = %symbol,
                    error = %e,
                    "Quote lookup failed"
                );
                MarketDataResult::error(e.to_string())
            }
        }
    }
}

#[async_trait]
impl Tool for MarketDataTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: TOOL_NAME.into(),
            description: "Fetches real-time stock/crypto price data: current price, day high/low, previous close, and absolute/percent change.".into(),
            parameters: vec![ParameterSchema::required_string(
                "ticker",
                "Ticker symbol, e.g. 'AAPL', 'NVDA' or 'BINANCE:BTCUSDT'",
            )],
            category: Some("market_data".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let ticker = call
            .str_arg("ticker")
            .ok_or_else(|| AgentError::ToolValidation("'ticker' must be a string".into()))?;

        let result = self.lookup(ticker).await;
        let data = serde_json::to_value(&result)?;

        Ok(match &result {
            MarketDataResult::Quote(quote) => ToolResult::success(TOOL_NAME, quote.summary()),
            MarketDataResult::Error { error } => ToolResult::failure(TOOL_NAME, error.as_str()),
        }
        .with_data(data))
    }
}
