//! Service Kit - Agent Tools
//!
//! Domain-specific tools that implement `agent_core::Tool` for the analyst agent.

pub mod market_data;
pub mod news_search;

pub use market_data::{MarketDataTool, normalize_ticker};
pub use news_search::NewsSearchTool;
