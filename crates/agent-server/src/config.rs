//! Process Configuration
//!
//! Read once at startup; every credential is mandatory.

use std::fmt;
use std::net::{Ipv4Addr, SocketAddr};

use agent_runtime::GeminiConfig;
use market_intel::source::{FinnhubConfig, TavilyConfig};
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8000;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable is required")]
    MissingVar(&'static str),

    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Immutable process configuration
#[derive(Clone)]
pub struct AppConfig {
    pub google_api_key: String,
    pub tavily_api_key: String,
    pub finnhub_api_key: String,
    pub port: u16,
    pub model: String,
    pub gemini_base_url: String,
    pub finnhub_base_url: String,
    pub tavily_base_url: String,
}

impl AppConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let required = |name: &'static str| optional(name).ok_or(ConfigError::MissingVar(name));

        let google_api_key = required("GOOGLE_API_KEY")?;
        let tavily_api_key = required("TAVILY_API_KEY")?;
        let finnhub_api_key = required("FINNHUB_API_KEY")?;

        let port = match optional("PORT") {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                name: "PORT",
                reason: format!("'{raw}' is not a port number ({e})"),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            google_api_key,
            tavily_api_key,
            finnhub_api_key,
            port,
            model: optional("GEMINI_MODEL")
                .unwrap_or_else(|| agent_core::provider::DEFAULT_MODEL.into()),
            gemini_base_url: optional("GEMINI_BASE_URL")
                .unwrap_or_else(|| GeminiConfig::DEFAULT_BASE_URL.into()),
            finnhub_base_url: optional("FINNHUB_BASE_URL")
                .unwrap_or_else(|| FinnhubConfig::DEFAULT_BASE_URL.into()),
            tavily_base_url: optional("TAVILY_BASE_URL")
                .unwrap_or_else(|| TavilyConfig::DEFAULT_BASE_URL.into()),
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.port))
    }

    pub fn gemini(&self) -> GeminiConfig {
        GeminiConfig::new(self.google_api_key.as_str())
            .with_base_url(self.gemini_base_url.as_str())
    }

    pub fn finnhub(&self) -> FinnhubConfig {
        FinnhubConfig::new(self.finnhub_api_key.as_str())
            .with_base_url(self.finnhub_base_url.as_str())
    }

    pub fn tavily(&self) -> TavilyConfig {
        TavilyConfig::new(self.tavily_api_key.as_str())
            .with_base_url(self.tavily_base_url.as_str())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("google_api_key", &"<redacted>")
            .field("tavily_api_key", &"<redacted>")
            .field("finnhub_api_key", &"<redacted>")
            .field("port", &self.port)
            .field("model", &self.model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("finnhub_base_url", &self.finnhub_base_url)
            .field("tavily_base_url", &self.tavily_base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    const KEYS: [(&str, &str); 3] = [
        ("GOOGLE_API_KEY", "g"),
        ("TAVILY_API_KEY", "t"),
        ("FINNHUB_API_KEY", "f"),
    ];

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&KEYS)).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.bind_addr().to_string(), "0.0.0.0:8000");
        assert_eq!(config.finnhub().base_url, "https://finnhub.io/api/v1");
    }

    #[test]
    fn test_missing_quote_credential_is_fatal() {
        let err = AppConfig::from_lookup(lookup(&KEYS[..2])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("FINNHUB_API_KEY"));
        assert_eq!(err.to_string(), "FINNHUB_API_KEY environment variable is required");
    }

    #[test]
    fn test_blank_credential_counts_as_missing() {
        let vars = [KEYS[0], ("TAVILY_API_KEY", "   "), KEYS[2]];
        let err = AppConfig::from_lookup(lookup(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar("TAVILY_API_KEY"));
    }

    #[test]
    fn test_port_override_and_validation() {
        let mut vars = KEYS.to_vec();
        vars.push(("PORT", "9090"));
        assert_eq!(AppConfig::from_lookup(lookup(&vars)).unwrap().port, 9090);

        vars.pop();
        vars.push(("PORT", "eighty"));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&vars)),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config = AppConfig::from_lookup(lookup(&KEYS)).unwrap();
        let debug = format!("{config:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("\"g\""));
    }
}
