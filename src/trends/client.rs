//! SerpAPI Google Trends client
//!
//! Requires the `trends` feature to be enabled:
//! ```toml
//! seoaudit = { version = "0.4", features = ["trends"] }
//! ```

use super::{TrendsConfig, TrendsReport};
use crate::error::{AuditError, Result};

const ENDPOINT: &str = "https://serpapi.com/search";

/// Blocking client for the SerpAPI `google_trends` engine
#[allow(dead_code)]
pub struct TrendsClient {
    api_key: Option<String>,
    endpoint: String,
    timeout_secs: u64,
}

impl TrendsClient {
    /// Create a client using SERPAPI_KEY from environment
    pub fn from_env() -> Self {
        let api_key = std::env::var("SERPAPI_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            log::debug!("SERPAPI_KEY not set, trend lookups will fail");
        }
        Self {
            api_key,
            endpoint: ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }

    pub fn with_key(api_key: String) -> Self {
        Self {
            api_key: Some(api_key),
            ..Self::from_env()
        }
    }

    /// Point the client at another endpoint
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Fetch Google Trends data for one keyword
    #[cfg(feature = "trends")]
    pub fn fetch(&self, keyword: &str, settings: &TrendsConfig) -> Result<TrendsReport> {
        use std::time::Duration;

        let api_key = self.api_key.as_deref().ok_or_else(|| {
            AuditError::Trends("SERPAPI_KEY environment variable not set".to_string())
        })?;
        let query = [
            ("engine", "google_trends"),
            ("q", keyword),
            ("geo", settings.region.as_str()),
            ("date", settings.timeframe.as_str()),
            ("api_key", api_key),
        ];

        log::debug!("requesting Google Trends for '{}' ({})", keyword, settings.region);
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        let response = client.get(&self.endpoint).query(&query).send()?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AuditError::Trends(
                "rate limited - SerpAPI search quota exhausted".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AuditError::Trends(format!("{}: {}", status, body)));
        }

        let json: serde_json::Value = response.json()?;
        if let Some(message) = json.get("error").and_then(|e| e.as_str()) {
            return Err(AuditError::Trends(message.to_string()));
        }
        Ok(TrendsReport::from_response(&json, keyword, settings))
    }

    /// Stub implementation when the trends feature is disabled
    #[cfg(not(feature = "trends"))]
    pub fn fetch(&self, _keyword: &str, _settings: &TrendsConfig) -> Result<TrendsReport> {
        Err(AuditError::Trends(
            "trends feature not enabled. Rebuild with: cargo build --features trends".to_string(),
        ))
    }
}

/// Check if Google Trends fetching is compiled in
pub fn is_trends_available() -> bool {
    cfg!(feature = "trends")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_is_kept() {
        let client = TrendsClient::with_key("abc".to_string());
        assert!(client.has_key());
    }

    #[cfg(not(feature = "trends"))]
    #[test]
    fn fetch_without_feature_errors() {
        let client = TrendsClient::with_key("abc".to_string());
        let err = client.fetch("kiln", &TrendsConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--features trends"));
        assert!(!is_trends_available());
    }

    #[cfg(feature = "trends")]
    #[test]
    fn fetch_without_key_errors_before_any_request() {
        let client = TrendsClient {
            api_key: None,
            endpoint: "http://127.0.0.1:9/search".to_string(),
            timeout_secs: 1,
        };
        let err = client.fetch("kiln", &TrendsConfig::default()).unwrap_err();
        assert!(err.to_string().contains("SERPAPI_KEY"));
    }
}
