//! PageSpeed Insights enrichment
//!
//! Parses Lighthouse results returned by the PageSpeed Insights v5 API and
//! turns them into performance recommendations. Fetching lives in
//! [`client`] and needs the `pagespeed` feature.

pub mod client;

pub use crate::config::Strategy;
pub use client::{is_pagespeed_available, PageSpeedClient};

use crate::{Priority, Recommendation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lighthouse category scores, 0-100
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub performance: Option<u8>,
    pub seo: Option<u8>,
    pub accessibility: Option<u8>,
    pub best_practices: Option<u8>,
}

/// Lab metrics; times in milliseconds, CLS unitless
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreWebVitals {
    pub largest_contentful_paint: Option<f64>,
    pub first_contentful_paint: Option<f64>,
    pub cumulative_layout_shift: Option<f64>,
    pub total_blocking_time: Option<f64>,
    pub speed_index: Option<f64>,
    pub time_to_interactive: Option<f64>,
}

/// A Lighthouse audit with estimated savings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Opportunity {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,
    pub savings_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceReport {
    pub strategy: Strategy,
    pub scores: CategoryScores,
    pub vitals: CoreWebVitals,
    /// Sorted by savings, largest first
    pub opportunities: Vec<Opportunity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lighthouse_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_time: Option<String>,
}

const LCP_LIMIT_MS: f64 = 2500.0;
const CLS_LIMIT: f64 = 0.1;
const TBT_LIMIT_MS: f64 = 300.0;
const SIGNIFICANT_SAVINGS_MS: f64 = 500.0;
const MAX_OPPORTUNITY_RECOMMENDATIONS: usize = 5;

fn category_score(categories: &Value, name: &str) -> Option<u8> {
    let score = categories.get(name)?.get("score")?.as_f64()?;
    Some((score * 100.0).round().clamp(0.0, 100.0) as u8)
}

fn numeric_audit(audits: &Value, id: &str) -> Option<f64> {
    audits.get(id)?.get("numericValue")?.as_f64()
}

fn text(value: &Value, key: &str) -> Option<String> {
    value.get(key)?.as_str().map(str::to_string)
}

impl PerformanceReport {
    /// Build a report from a raw `runPagespeed` response. Missing sections
    /// leave the corresponding fields empty.
    pub fn from_response(response: &Value, strategy: Strategy) -> Self {
        let lighthouse = &response["lighthouseResult"];
        let categories = &lighthouse["categories"];
        let audits = &lighthouse["audits"];

        let scores = CategoryScores {
            performance: category_score(categories, "performance"),
            seo: category_score(categories, "seo"),
            accessibility: category_score(categories, "accessibility"),
            best_practices: category_score(categories, "best-practices"),
        };

        let vitals = CoreWebVitals {
            largest_contentful_paint: numeric_audit(audits, "largest-contentful-paint"),
            first_contentful_paint: numeric_audit(audits, "first-contentful-paint"),
            cumulative_layout_shift: numeric_audit(audits, "cumulative-layout-shift"),
            total_blocking_time: numeric_audit(audits, "total-blocking-time"),
            speed_index: numeric_audit(audits, "speed-index"),
            time_to_interactive: numeric_audit(audits, "interactive"),
        };

        let mut opportunities: Vec<Opportunity> = audits
            .as_object()
            .map(|map| {
                map.iter()
                    .filter(|(_, audit)| audit["details"]["type"].as_str() == Some("opportunity"))
                    .map(|(id, audit)| Opportunity {
                        id: id.clone(),
                        title: text(audit, "title").unwrap_or_else(|| id.clone()),
                        description: text(audit, "description").unwrap_or_default(),
                        display_value: text(audit, "displayValue"),
                        savings_ms: audit["details"]["overallSavingsMs"].as_f64().unwrap_or(0.0),
                    })
                    .collect()
            })
            .unwrap_or_default();
        opportunities.sort_by(|a, b| b.savings_ms.total_cmp(&a.savings_ms));

        Self {
            strategy,
            scores,
            vitals,
            opportunities,
            lighthouse_version: text(lighthouse, "lighthouseVersion"),
            fetch_time: text(lighthouse, "fetchTime"),
        }
    }

    /// LCP and CLS within their thresholds (unknown values pass)
    pub fn core_web_vitals_pass(&self) -> bool {
        self.vitals
            .largest_contentful_paint
            .map_or(true, |v| v <= LCP_LIMIT_MS)
            && self
                .vitals
                .cumulative_layout_shift
                .map_or(true, |v| v <= CLS_LIMIT)
    }
}

fn rec(category: &str, priority: Priority, issue: String, recommendation: String) -> Recommendation {
    Recommendation {
        category: category.to_string(),
        priority,
        issue,
        recommendation,
    }
}

/// Recommendations for a performance report, most urgent first
pub fn performance_recommendations(report: &PerformanceReport) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if let Some(perf) = report.scores.performance.filter(|s| *s < 90) {
        let priority = if perf < 50 {
            Priority::High
        } else {
            Priority::Medium
        };
        recs.push(rec(
            "Performance",
            priority,
            format!("Performance score is {}/100", perf),
            "Optimize Core Web Vitals and defer non-critical resources to reach 90+".to_string(),
        ));
    }

    if let Some(lcp) = report.vitals.largest_contentful_paint.filter(|v| *v > LCP_LIMIT_MS) {
        recs.push(rec(
            "Core Web Vitals",
            Priority::High,
            format!("LCP is {:.1}s (target under 2.5s)", lcp / 1000.0),
            "Optimize hero images, improve server response time and preload key resources"
                .to_string(),
        ));
    }

    if let Some(cls) = report.vitals.cumulative_layout_shift.filter(|v| *v > CLS_LIMIT) {
        recs.push(rec(
            "Core Web Vitals",
            Priority::High,
            format!("CLS is {:.3} (target under 0.1)", cls),
            "Set explicit image dimensions and reserve space for late-loading content".to_string(),
        ));
    }

    if let Some(tbt) = report.vitals.total_blocking_time.filter(|v| *v > TBT_LIMIT_MS) {
        recs.push(rec(
            "Core Web Vitals",
            Priority::High,
            format!("Total blocking time is {:.0}ms (target under 300ms)", tbt),
            "Split long JavaScript tasks and defer non-critical scripts".to_string(),
        ));
    }

    for opp in report
        .opportunities
        .iter()
        .take(MAX_OPPORTUNITY_RECOMMENDATIONS)
        .filter(|o| o.savings_ms > SIGNIFICANT_SAVINGS_MS)
    {
        recs.push(rec(
            "Performance Opportunity",
            Priority::Medium,
            opp.title.clone(),
            format!("Implement this optimization to save ~{:.0}ms", opp.savings_ms),
        ));
    }

    if let Some(seo) = report.scores.seo.filter(|s| *s < 90) {
        recs.push(rec(
            "SEO",
            Priority::Medium,
            format!("Lighthouse SEO score is {}/100", seo),
            "Review the technical SEO audits reported by Lighthouse".to_string(),
        ));
    }

    if let Some(a11y) = report.scores.accessibility.filter(|s| *s < 90) {
        recs.push(rec(
            "Accessibility",
            Priority::Medium,
            format!("Accessibility score is {}/100", a11y),
            "Fix accessibility issues to improve user experience and search visibility"
                .to_string(),
        ));
    }

    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_response() -> Value {
        json!({
            "lighthouseResult": {
                "lighthouseVersion": "12.0.0",
                "fetchTime": "2026-01-10T12:00:00.000Z",
                "categories": {
                    "performance": { "score": 0.42 },
                    "seo": { "score": 0.92 },
                    "accessibility": { "score": 0.81 },
                    "best-practices": { "score": 1.0 }
                },
                "audits": {
                    "largest-contentful-paint": { "numericValue": 4100.5 },
                    "first-contentful-paint": { "numericValue": 1800.0 },
                    "cumulative-layout-shift": { "numericValue": 0.05 },
                    "total-blocking-time": { "numericValue": 650.0 },
                    "speed-index": { "numericValue": 3900.0 },
                    "interactive": { "numericValue": 7000.0 },
                    "render-blocking-resources": {
                        "title": "Eliminate render-blocking resources",
                        "description": "Resources are blocking the first paint.",
                        "displayValue": "Potential savings of 750 ms",
                        "details": { "type": "opportunity", "overallSavingsMs": 750.0 }
                    },
                    "uses-webp-images": {
                        "title": "Serve images in modern formats",
                        "details": { "type": "opportunity", "overallSavingsMs": 1200.0 }
                    },
                    "unused-css-rules": {
                        "title": "Reduce unused CSS",
                        "details": { "type": "opportunity", "overallSavingsMs": 150.0 }
                    },
                    "dom-size": {
                        "title": "Avoid an excessive DOM size",
                        "scoreDisplayMode": "informative",
                        "details": { "type": "table" }
                    }
                }
            }
        })
    }

    #[test]
    fn parses_scores_and_vitals() {
        let report = PerformanceReport::from_response(&sample_response(), Strategy::Mobile);
        assert_eq!(report.scores.performance, Some(42));
        assert_eq!(report.scores.best_practices, Some(100));
        assert_eq!(report.vitals.largest_contentful_paint, Some(4100.5));
        assert_eq!(report.vitals.time_to_interactive, Some(7000.0));
        assert_eq!(report.lighthouse_version.as_deref(), Some("12.0.0"));
    }

    #[test]
    fn opportunities_sorted_by_savings() {
        let report = PerformanceReport::from_response(&sample_response(), Strategy::Desktop);
        let ids: Vec<_> = report.opportunities.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["uses-webp-images", "render-blocking-resources", "unused-css-rules"]
        );
        assert_eq!(report.opportunities[0].description, "");
    }

    #[test]
    fn empty_response_yields_empty_report() {
        let report = PerformanceReport::from_response(&json!({}), Strategy::Mobile);
        assert_eq!(report.scores, CategoryScores::default());
        assert!(report.opportunities.is_empty());
        assert!(report.core_web_vitals_pass());
        assert!(performance_recommendations(&report).is_empty());
    }

    #[test]
    fn recommendations_follow_thresholds() {
        let report = PerformanceReport::from_response(&sample_response(), Strategy::Mobile);
        let recs = performance_recommendations(&report);
        let issues: Vec<_> = recs.iter().map(|r| r.issue.as_str()).collect();
        assert_eq!(
            issues,
            vec![
                "Performance score is 42/100",
                "LCP is 4.1s (target under 2.5s)",
                "Total blocking time is 650ms (target under 300ms)",
                "Serve images in modern formats",
                "Eliminate render-blocking resources",
                "Accessibility score is 81/100",
            ]
        );
        assert_eq!(recs[0].priority, Priority::High);
        assert!(!report.core_web_vitals_pass());
    }
}
