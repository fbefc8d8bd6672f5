//! Audit engine - scores pages and applies configuration

use crate::cache::AuditCache;
use crate::config::{Config, EffectiveConfig, RuleSeverity};
use crate::metrics::LoadedPage;
use crate::pagespeed::{performance_recommendations, PageSpeedClient};
use crate::trends::{trend_recommendations, TrendsClient, TrendsReport, MAX_KEYWORDS_PER_PAGE};
use crate::{AuditResult, Grade, Issue, PageMetrics, PageStats, Score, Status};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;

use super::ScoreCalculator;

/// Main audit engine: scoring, rule overrides, recommendations
pub struct AuditEngine {
    /// Score pages on the rayon pool
    parallel: bool,
    /// Fetch PageSpeed Insights data for pages with a URL
    pagespeed: Option<PageSpeedClient>,
    /// Look up Google Trends for each page's top keywords
    trends: Option<TrendsClient>,
}

impl AuditEngine {
    pub fn new() -> Self {
        Self {
            parallel: true,
            pagespeed: None,
            trends: None,
        }
    }

    /// Score pages one after another
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Enrich results with PageSpeed Insights
    pub fn with_pagespeed(mut self, client: PageSpeedClient) -> Self {
        self.pagespeed = Some(client);
        self
    }

    /// Enrich results with Google Trends for page keywords
    pub fn with_trends(mut self, client: TrendsClient) -> Self {
        self.trends = Some(client);
        self
    }

    /// Trend reports for the page's top keywords; failed lookups are skipped
    fn keyword_trends(&self, metrics: &PageMetrics, config: &Config) -> Vec<TrendsReport> {
        let Some(client) = &self.trends else {
            return Vec::new();
        };
        metrics
            .top_keywords(MAX_KEYWORDS_PER_PAGE)
            .into_iter()
            .filter_map(|keyword| match client.fetch(keyword, &config.trends) {
                Ok(report) => Some(report),
                Err(e) => {
                    log::warn!("Google Trends lookup failed for '{}': {}", keyword, e);
                    None
                }
            })
            .collect()
    }

    /// Change severities or drop issues per config, then restore
    /// critical-first order (stable, so detection order survives)
    fn apply_config_to_issues(issues: Vec<Issue>, effective: &EffectiveConfig) -> Vec<Issue> {
        let mut out: Vec<Issue> = issues
            .into_iter()
            .filter_map(|mut issue| match effective.rules.get(&issue.kind.to_string()) {
                Some(RuleSeverity::Off) => None,
                Some(rs) => {
                    if let Some(sev) = rs.to_severity() {
                        issue.severity = sev;
                    }
                    Some(issue)
                }
                None => Some(issue),
            })
            .collect();
        out.sort_by_key(|i| i.severity);
        out
    }

    /// Text that changes whenever the result for `key` would change under
    /// the same metrics
    fn settings_fingerprint(&self, key: &str, config: &Config) -> String {
        let effective = config.effective_for_url(key);
        let rules = effective
            .rules
            .iter()
            .map(|(id, sev)| format!("{}={:?}", id, sev))
            .collect::<Vec<_>>()
            .join(",");
        let trends = match self.trends {
            Some(_) => format!("{}/{}", config.trends.region, config.trends.timeframe),
            None => "off".to_string(),
        };
        format!(
            "weights[{}] rules[{}] pagespeed[{}] trends[{}]",
            config.scoring_weights().fingerprint(),
            rules,
            if self.pagespeed.is_some() {
                config.pagespeed.strategy.as_str()
            } else {
                "off"
            },
            trends
        )
    }

    /// Audit one page's metrics under `key` (its URL or synthetic key)
    pub fn audit_metrics(&self, key: &str, metrics: &PageMetrics, config: &Config) -> AuditResult {
        let facts = metrics.facts();
        let weights = config.scoring_weights();
        let scored = ScoreCalculator::score_facts(&facts, &weights);
        let effective = config.effective_for_url(key);
        let issues = Self::apply_config_to_issues(scored.issues, &effective);

        let mut recommendations = ScoreCalculator::recommendations(&facts);
        let performance = match (&self.pagespeed, metrics.key()) {
            (Some(client), Some(url)) if url.starts_with("http") => {
                match client.analyze(url, config.pagespeed.strategy) {
                    Ok(report) => {
                        recommendations.extend(performance_recommendations(&report));
                        Some(report)
                    }
                    Err(e) => {
                        log::warn!("PageSpeed Insights failed for {}: {}", url, e);
                        None
                    }
                }
            }
            _ => None,
        };

        let trends = self.keyword_trends(metrics, config);
        for report in &trends {
            recommendations.extend(trend_recommendations(report));
        }

        let score = Score::new(scored.overall_score);
        AuditResult {
            url: key.to_string(),
            source: None,
            score,
            status: Status::from_score(score.value),
            factors: scored.factors,
            issues,
            recommendations,
            stats: PageStats::from(&facts),
            performance,
            trends,
        }
    }

    /// Audit a loaded page
    pub fn audit_page(&self, page: &LoadedPage, config: &Config) -> AuditResult {
        let mut result = self.audit_metrics(&page.key, &page.metrics, config);
        result.source = page.source.clone();
        result
    }

    fn included<'a>(pages: &'a [LoadedPage], config: &Config) -> Vec<&'a LoadedPage> {
        let ignore = config.ignore_matcher();
        pages
            .iter()
            .filter(|page| {
                let skip = !ignore.is_empty() && ignore.is_match(&page.key);
                if skip {
                    log::debug!("ignoring {}", page.key);
                }
                !skip
            })
            .collect()
    }

    /// Audit every page not excluded by `ignore`; results keep input order
    pub fn audit_pages(&self, pages: &[LoadedPage], config: &Config) -> Vec<AuditResult> {
        let pages = Self::included(pages, config);
        if self.parallel {
            pages
                .par_iter()
                .map(|page| self.audit_page(page, config))
                .collect()
        } else {
            pages
                .iter()
                .map(|page| self.audit_page(page, config))
                .collect()
        }
    }

    /// Like [`audit_pages`](Self::audit_pages), reusing valid cache entries
    /// and storing fresh results
    pub fn audit_pages_cached(
        &self,
        pages: &[LoadedPage],
        config: &Config,
        cache: &mut AuditCache,
    ) -> Vec<AuditResult> {
        let pages = Self::included(pages, config);

        let lookups: Vec<(&LoadedPage, String, Option<AuditResult>)> = pages
            .into_iter()
            .map(|page| {
                let settings = self.settings_fingerprint(&page.key, config);
                let cached = cache.get(&page.key, &page.fingerprint, &settings);
                (page, settings, cached)
            })
            .collect();

        let audit = |(page, settings, cached): &(&LoadedPage, String, Option<AuditResult>)| {
            match cached {
                Some(result) => (result.clone(), None),
                None => (self.audit_page(page, config), Some(settings.clone())),
            }
        };
        let audited: Vec<(AuditResult, Option<String>)> = if self.parallel {
            lookups.par_iter().map(audit).collect()
        } else {
            lookups.iter().map(audit).collect()
        };

        audited
            .into_iter()
            .zip(lookups.iter())
            .map(|((result, fresh), (page, _, _))| {
                if let Some(settings) = fresh {
                    cache.set(&page.key, &page.fingerprint, &settings, result.clone());
                }
                result
            })
            .collect()
    }

    /// Calculate aggregate statistics for multiple results
    pub fn aggregate_stats(results: &[AuditResult]) -> AggregateStats {
        if results.is_empty() {
            return AggregateStats::default();
        }

        let total: f64 = results.iter().map(|r| r.score.value).sum();
        let mut grade_distribution = BTreeMap::new();
        for r in results {
            *grade_distribution.entry(r.score.grade).or_insert(0) += 1;
        }

        AggregateStats {
            pages_audited: results.len(),
            average_score: Score::new(total / results.len() as f64),
            total_issues: results.iter().map(|r| r.issues.len()).sum(),
            critical_issues: results.iter().map(|r| r.critical_count()).sum(),
            warning_issues: results.iter().map(|r| r.warning_count()).sum(),
            grade_distribution,
        }
    }
}

impl Default for AuditEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregate statistics across multiple pages
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub pages_audited: usize,
    /// Mean of page scores, one decimal
    pub average_score: Score,
    pub total_issues: usize,
    pub critical_issues: usize,
    pub warning_issues: usize,
    /// Pages per grade
    pub grade_distribution: BTreeMap<Grade, usize>,
}
