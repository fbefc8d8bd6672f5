//! PageSpeed Insights API client
//!
//! Requires the `pagespeed` feature to be enabled:
//! ```toml
//! seoaudit = { version = "0.4", features = ["pagespeed"] }
//! ```

use super::{PerformanceReport, Strategy};
use crate::error::{AuditError, Result};

const ENDPOINT: &str = "https://www.googleapis.com/pagespeedonline/v5/runPagespeed";
#[allow(dead_code)]
const CATEGORIES: [&str; 4] = ["performance", "seo", "accessibility", "best-practices"];

/// Blocking client for the PageSpeed Insights v5 API
#[allow(dead_code)]
pub struct PageSpeedClient {
    api_key: Option<String>,
    endpoint: String,
    timeout_secs: u64,
}

impl PageSpeedClient {
    /// Create a client using PAGESPEED_API_KEY from environment when set.
    /// The API accepts keyless requests at a lower quota.
    pub fn from_env() -> Self {
        let api_key = std::env::var("PAGESPEED_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            log::debug!("PAGESPEED_API_KEY not set, using anonymous quota");
        }
        Self {
            api_key,
            endpoint: ENDPOINT.to_string(),
            timeout_secs: 60,
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

    /// Run PageSpeed Insights for a URL
    #[cfg(feature = "pagespeed")]
    pub fn analyze(&self, url: &str, strategy: Strategy) -> Result<PerformanceReport> {
        use std::time::Duration;

        let mut query: Vec<(&str, &str)> = vec![("url", url), ("strategy", strategy.as_str())];
        query.extend(CATEGORIES.iter().map(|c| ("category", *c)));
        if let Some(key) = self.api_key.as_deref() {
            query.push(("key", key));
        }

        log::debug!("requesting PageSpeed Insights for {} ({})", url, strategy.as_str());
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;
        let response = client.get(&self.endpoint).query(&query).send()?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AuditError::PageSpeed(
                "rate limited - set PAGESPEED_API_KEY or try again later".to_string(),
            ));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AuditError::PageSpeed(format!("{}: {}", status, body)));
        }

        let json: serde_json::Value = response.json()?;
        if json.get("lighthouseResult").is_none() {
            return Err(AuditError::PageSpeed(
                "response has no lighthouseResult".to_string(),
            ));
        }
        Ok(PerformanceReport::from_response(&json, strategy))
    }

    /// Stub implementation when the pagespeed feature is disabled
    #[cfg(not(feature = "pagespeed"))]
    pub fn analyze(&self, _url: &str, _strategy: Strategy) -> Result<PerformanceReport> {
        Err(AuditError::PageSpeed(
            "pagespeed feature not enabled. Rebuild with: cargo build --features pagespeed"
                .to_string(),
        ))
    }
}

/// Check if PageSpeed fetching is compiled in
pub fn is_pagespeed_available() -> bool {
    cfg!(feature = "pagespeed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_key_is_kept() {
        let client = PageSpeedClient::with_key("abc".to_string());
        assert!(client.has_key());
    }

    #[cfg(not(feature = "pagespeed"))]
    #[test]
    fn analyze_without_feature_errors() {
        let client = PageSpeedClient::with_key("abc".to_string());
        let err = client
            .analyze("https://example.com/", Strategy::Mobile)
            .unwrap_err();
        assert!(err.to_string().contains("--features pagespeed"));
        assert!(!is_pagespeed_available());
    }
}
