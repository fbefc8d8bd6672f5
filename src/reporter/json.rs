//! JSON reporter for machine-readable output

use crate::analyzer::engine::AggregateStats;
use crate::AuditResult;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    fn render<T: Serialize + ?Sized>(&self, value: &T, fallback: &str) -> String {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        rendered.unwrap_or_else(|_| fallback.to_string())
    }

    /// Report a single audit result as JSON
    pub fn report(&self, result: &AuditResult) -> String {
        self.render(result, "{}")
    }

    /// Report multiple results as JSON array
    pub fn report_many(&self, results: &[AuditResult]) -> String {
        self.render(results, "[]")
    }

    /// Report with summary
    pub fn report_with_summary(&self, results: &[AuditResult], stats: &AggregateStats) -> String {
        let output = JsonOutput {
            results,
            summary: JsonSummary {
                pages_audited: stats.pages_audited,
                average_score: stats.average_score.value,
                average_grade: stats.average_score.grade.to_string(),
                total_issues: stats.total_issues,
                critical_issues: stats.critical_issues,
                warning_issues: stats.warning_issues,
                grade_distribution: stats
                    .grade_distribution
                    .iter()
                    .map(|(g, n)| (g.to_string(), *n))
                    .collect(),
            },
        };
        self.render(&output, "{}")
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    results: &'a [AuditResult],
    summary: JsonSummary,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSummary {
    pages_audited: usize,
    average_score: f64,
    average_grade: String,
    total_issues: usize,
    critical_issues: usize,
    warning_issues: usize,
    grade_distribution: BTreeMap<String, usize>,
}
