//! # market-intel
//!
//! Market quote and news search tools for the financial analyst agent, plus
//! the system instruction that tells the model how to use them.
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────┐     ┌──────────────────────┐
//! │  MarketDataTool  │────▶│  QuoteSource  │────▶│  Finnhub /quote      │
//! └──────────────────┘     └───────────────┘     └──────────────────────┘
//! ┌──────────────────┐     ┌───────────────┐     ┌──────────────────────┐
//! │  NewsSearchTool  │────▶│ SearchSource  │────▶│  Tavily /search      │
//! └──────────────────┘     └───────────────┘     └──────────────────────┘
//! ```
//!
//! Both tools treat provider failures as data: the model receives
//! `{"error": ..}` instead of the call failing.

pub mod error;
pub mod model;
pub mod source;
pub mod svckit;

pub use error::{IntelError, Result};
pub use model::{MarketDataResult, MarketQuote, NewsResult, NewsSnippet, SearchOptions};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{MarketDataTool, NewsSearchTool};
}

/// System instruction for the analyst agent
pub const FINANCIAL_ANALYST_PROMPT: &str = "You are an expert financial analyst agent. \
Use 'get_market_data' for prices and 'search_news' for news/sentiment. \
Synthesize findings into a concise report. \
Always provide a sentiment (Bullish/Bearish/Neutral) and a Risk Score (1-10). \
Respond in clear Markdown.";
