//! Domain Models
//!
//! Payloads produced by the market data and news tools. Prices use
//! `rust_decimal` and are written out as JSON numbers for the model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw quote snapshot as returned by the quote endpoint
///
/// Every field is optional; a snapshot without `c` means the symbol is unknown.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct QuoteSnapshot {
    /// Current price
    #[serde(rename = "c", default)]
    pub current: Option<Decimal>,

    /// Day high
    #[serde(rename = "h", default)]
    pub high: Option<Decimal>,

    /// Day low
    #[serde(rename = "l", default)]
    pub low: Option<Decimal>,

    /// Previous close
    #[serde(rename = "pc", default)]
    pub previous_close: Option<Decimal>,

    /// Absolute change
    #[serde(rename = "d", default)]
    pub change: Option<Decimal>,

    /// Percent change
    #[serde(rename = "dp", default)]
    pub percent_change: Option<Decimal>,
}

/// Quote for one ticker
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketQuote {
    pub symbol: String,

    #[serde(with = "rust_decimal::serde::float")]
    pub current_price: Decimal,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub high: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub low: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub previous_close: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub change: Option<Decimal>,

    #[serde(with = "rust_decimal::serde::float_option")]
    pub percent_change: Option<Decimal>,
}

impl MarketQuote {
    /// Build a quote from a snapshot; `None` when the current price is missing
    pub fn from_snapshot(symbol: impl Into<String>, snapshot: QuoteSnapshot) -> Option<Self> {
        Some(Self {
            symbol: symbol.into(),
            current_price: snapshot.current?,
            high: snapshot.high,
            low: snapshot.low,
            previous_close: snapshot.previous_close,
            change: snapshot.change,
            percent_change: snapshot.percent_change,
        })
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        let mut line = format!("{}: ${:.2}", self.symbol, self.current_price);
        if let (Some(change), Some(percent)) = (self.change, self.percent_change) {
            line.push_str(&format!(" ({change:+.2}, {percent:+.2}%)"));
        }
        if let (Some(high), Some(low)) = (self.high, self.low) {
            line.push_str(&format!(" - day range ${low:.2}-${high:.2}"));
        }
        if let Some(previous) = self.previous_close {
            line.push_str(&format!(", previous close ${previous:.2}"));
        }
        line
    }
}

/// Market data tool outcome: a quote or an error marker
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MarketDataResult {
    Quote(MarketQuote),
    Error { error: String },
}

impl MarketDataResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: message.into(),
        }
    }

    pub fn no_data(symbol: &str) -> Self {
        Self::error(format!("No data found for {symbol}"))
    }

    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Knobs sent with every search request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOptions {
    pub search_depth: SearchDepth,
    pub include_answer: bool,
    pub max_results: u8,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            search_depth: SearchDepth::Advanced,
            include_answer: true,
            max_results: 3,
        }
    }
}

/// Search tier; only the advanced one is requested
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Advanced,
}

/// One news hit. Fields the provider may leave out or send as `null` are
/// optional; anything else it sends is carried through untouched.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsSnippet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// News search outcome: the provider's response as sent, or an error
///
/// Only the fields the tool reads are typed. The rest (`images`,
/// `follow_up_questions`, `response_time`, ...) stay in `extra` so the model
/// sees the full response.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewsResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<NewsSnippet>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl NewsResult {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }

    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Short human summary
    pub fn summary(&self) -> String {
        if let Some(error) = &self.error {
            return format!("Search failed: {error}");
        }

        let mut output = String::new();
        if let Some(answer) = &self.answer {
            output.push_str(answer);
            output.push('\n');
        }
        for snippet in &self.results {
            let title = snippet.title.as_deref().unwrap_or("(untitled)");
            match snippet.url.as_deref() {
                Some(url) => output.push_str(&format!("- {title} ({url})\n")),
                None => output.push_str(&format!("- {title}\n")),
            }
        }
        if output.is_empty() {
            output.push_str("No news found");
        }
        output.trim_end().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_snapshot_maps_one_to_one() {
        let snapshot: QuoteSnapshot = serde_json::from_value(json!({
            "c": 150.0, "h": 152, "l": 148, "pc": 149, "d": 1, "dp": 0.67, "t": 1_700_000_000
        }))
        .unwrap();

        let quote = MarketQuote::from_snapshot("AAPL", snapshot).unwrap();
        assert_eq!(quote.current_price, dec!(150.0));
        assert_eq!(quote.high, Some(dec!(152)));
        assert_eq!(quote.low, Some(dec!(148)));
        assert_eq!(quote.previous_close, Some(dec!(149)));
        assert_eq!(quote.change, Some(dec!(1)));
        assert_eq!(quote.percent_change, Some(dec!(0.67)));
    }

    #[test]
    fn test_snapshot_without_price_has_no_quote() {
        let empty: QuoteSnapshot = serde_json::from_value(json!({})).unwrap();
        assert!(MarketQuote::from_snapshot("AAPL", empty).is_none());

        let null_price: QuoteSnapshot = serde_json::from_value(json!({"c": null, "h": 1})).unwrap();
        assert!(MarketQuote::from_snapshot("AAPL", null_price).is_none());
    }

    #[test]
    fn test_error_marker_shape() {
        let value = serde_json::to_value(MarketDataResult::no_data("AAPL")).unwrap();
        assert_eq!(value, json!({"error": "No data found for AAPL"}));

        let news = serde_json::to_value(NewsResult::error("timed out")).unwrap();
        assert_eq!(news, json!({"error": "timed out"}));
    }

    #[test]
    fn test_quote_serializes_numbers() {
        let quote = MarketQuote {
            symbol: "AAPL".into(),
            current_price: dec!(150),
            high: Some(dec!(152)),
            low: None,
            previous_close: None,
            change: None,
            percent_change: None,
        };
        let value = serde_json::to_value(MarketDataResult::Quote(quote)).unwrap();
        assert_eq!(value["current_price"], json!(150.0));
        assert_eq!(value["high"], json!(152.0));
        assert!(value["low"].is_null());
    }

    #[test]
    fn test_news_keeps_unknown_fields_and_tolerates_nulls() {
        let raw = json!({
            "query": "TSLA",
            "answer": "Deliveries beat estimates",
            "follow_up_questions": ["What about margins?"],
            "images": ["https://example.com/chart.png"],
            "response_time": 1.4,
            "results": [
                {"title": "Tesla deliveries", "url": "https://example.com/t", "content": null, "raw_content": null},
                {"url": "https://example.com/u"}
            ]
        });

        let news: NewsResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(news.results.len(), 2);
        assert!(news.results[0].content.is_none());
        assert_eq!(news.extra["follow_up_questions"], json!(["What about margins?"]));
        assert_eq!(
            news.summary(),
            "Deliveries beat estimates\n- Tesla deliveries (https://example.com/t)\n- (untitled) (https://example.com/u)"
        );

        let echoed = serde_json::to_value(&news).unwrap();
        assert_eq!(echoed["images"], raw["images"]);
        assert_eq!(echoed["response_time"], json!(1.4));
        assert!(echoed["results"][0].as_object().unwrap().contains_key("raw_content"));
    }

    #[test]
    fn test_search_options_defaults() {
        let value = serde_json::to_value(SearchOptions::default()).unwrap();
        assert_eq!(
            value,
            json!({"search_depth": "advanced", "include_answer": true, "max_results": 3})
        );
    }
}
