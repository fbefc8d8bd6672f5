//! Config schema and deserialization

use crate::{Factor, ScoringWeights, Severity};
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default lifetime of cached audit entries
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 7200;

/// Issue severity override (critical, warning, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Critical,
    Warning,
    /// Drop the issue entirely
    Off,
}

impl RuleSeverity {
    /// Convert to crate::Severity if not Off
    pub fn to_severity(self) -> Option<Severity> {
        match self {
            RuleSeverity::Critical => Some(Severity::Critical),
            RuleSeverity::Warning => Some(Severity::Warning),
            RuleSeverity::Off => None,
        }
    }
}

/// Device profile used for PageSpeed Insights requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Mobile,
    Desktop,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Mobile => "mobile",
            Strategy::Desktop => "desktop",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheConfig {
    /// Seconds before a cached audit is recomputed
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,
}

fn default_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECONDS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSpeedConfig {
    #[serde(default)]
    pub strategy: Strategy,
}

/// Google Trends lookup settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsConfig {
    /// Two-letter region code (`geo`)
    #[serde(default = "default_region")]
    pub region: String,
    /// Trends date range, e.g. `today 12-m` or `today 3-m`
    #[serde(default = "default_timeframe")]
    pub timeframe: String,
}

fn default_region() -> String {
    crate::trends::DEFAULT_REGION.to_string()
}

fn default_timeframe() -> String {
    crate::trends::DEFAULT_TIMEFRAME.to_string()
}

impl Default for TrendsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            timeframe: default_timeframe(),
        }
    }
}

/// Per-URL override configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns matched against the page URL path
    pub urls: Vec<String>,

    /// Optional threshold override for matched pages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    /// Optional issue overrides for matched pages
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleSeverity>,
}

/// Root config structure for .seoauditrc.json
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Minimum score (exit 1 if below). Default: none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,

    /// Factor weight overrides keyed by factor name; 0 removes the factor
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub weights: BTreeMap<String, f64>,

    /// Per-issue severity overrides. Key is the issue id in kebab-case.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleSeverity>,

    /// Glob patterns for URL paths to exclude from the audit
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,

    /// Per-URL configuration overrides (sections of a site, legacy pages, etc.)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<ConfigOverride>,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub pagespeed: PageSpeedConfig,

    #[serde(default)]
    pub trends: TrendsConfig,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_threshold: Option<f64>) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        self
    }

    /// Get the configured severity for an issue id
    pub fn rule_severity(&self, rule_id: &str) -> Option<RuleSeverity> {
        self.rules.get(rule_id).copied()
    }

    /// Standard weights with the configured per-factor overrides applied.
    /// Unknown factor names are ignored with a warning.
    pub fn scoring_weights(&self) -> ScoringWeights {
        let mut weights = ScoringWeights::standard();
        for (key, weight) in &self.weights {
            match Factor::from_key(key) {
                Some(factor) => weights = weights.with(factor, *weight),
                None => log::warn!("ignoring weight for unknown factor '{}'", key),
            }
        }
        weights
    }

    /// Get effective config for a specific page URL, applying overrides
    pub fn effective_for_url(&self, url: &str) -> EffectiveConfig {
        let mut effective = EffectiveConfig {
            threshold: self.threshold,
            rules: self.rules.clone(),
        };

        let path = url_path(url);
        for override_cfg in &self.overrides {
            if matches_any(path, url, &override_cfg.urls) {
                if let Some(threshold) = override_cfg.threshold {
                    effective.threshold = Some(threshold);
                }
                for (rule, severity) in &override_cfg.rules {
                    effective.rules.insert(rule.clone(), *severity);
                }
            }
        }

        effective
    }

    /// Compile the ignore patterns, skipping (and logging) invalid ones
    pub fn ignore_matcher(&self) -> UrlMatcher {
        UrlMatcher::lenient(&self.ignore)
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        if self.threshold.is_none() {
            self.threshold = base.threshold;
        }
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        for (factor, weight) in base.weights {
            self.weights.entry(factor).or_insert(weight);
        }
        for (rule, severity) in base.rules {
            self.rules.entry(rule).or_insert(severity);
        }

        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.cache == CacheConfig::default() {
            self.cache = base.cache;
        }
        if self.trends == TrendsConfig::default() {
            self.trends = base.trends;
        }
        if self.pagespeed == PageSpeedConfig::default() {
            self.pagespeed = base.pagespeed;
        }

        // Base overrides apply first, so this config's overrides win
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }
}

/// Effective configuration for a specific page (after applying overrides)
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveConfig {
    pub threshold: Option<f64>,
    pub rules: BTreeMap<String, RuleSeverity>,
}

/// Compiled URL glob patterns
#[derive(Debug, Clone)]
pub struct UrlMatcher {
    set: GlobSet,
}

impl UrlMatcher {
    /// Build a matcher, failing on the first invalid pattern
    pub fn new(patterns: &[String]) -> Result<Self, globset::Error> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self {
            set: builder.build()?,
        })
    }

    fn lenient(patterns: &[String]) -> Self {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(e) => log::warn!("skipping invalid URL pattern '{}': {}", pattern, e),
            }
        }
        let set = builder.build().unwrap_or_else(|_| GlobSet::empty());
        Self { set }
    }

    /// Match against the URL path, or the whole key for pages without a URL
    pub fn is_match(&self, url: &str) -> bool {
        self.set.is_match(url_path(url)) || self.set.is_match(url)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

fn matches_any(path: &str, url: &str, patterns: &[String]) -> bool {
    patterns.iter().any(|pattern| match Glob::new(pattern) {
        Ok(glob) => {
            let matcher = glob.compile_matcher();
            matcher.is_match(path) || matcher.is_match(url)
        }
        Err(_) => false,
    })
}

/// Path component of an absolute URL (`/` for a bare host). Query and
/// fragment are dropped. Strings without a scheme are returned unchanged.
pub fn url_path(url: &str) -> &str {
    let url = url.trim();
    let Some(scheme_end) = url.find("://") else {
        return url;
    };
    let rest = &url[scheme_end + 3..];
    let path = match rest.find('/') {
        Some(start) => &rest[start..],
        None => return "/",
    };
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}
