//! HTML reporter: generates a self-contained static HTML report
//!
//! No scripts; every user-supplied string is escaped.

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::pagespeed::PerformanceReport;
use crate::trends::TrendsReport;
use crate::{AuditResult, Grade, Severity};
use std::fmt::Write;

/// Escape text for HTML element content and attribute values
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn grade_class(grade: Grade) -> &'static str {
    match grade {
        Grade::APlus | Grade::A => "g-a",
        Grade::BPlus | Grade::B => "g-b",
        Grade::C => "g-c",
        Grade::D => "g-d",
        Grade::F => "g-f",
    }
}

/// Reporter that generates a self-contained HTML page
pub struct HtmlReporter {
    title: String,
}

impl HtmlReporter {
    pub fn new() -> Self {
        Self {
            title: "SEO Audit Report".to_string(),
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Generate the full HTML report
    pub fn report(&self, results: &[AuditResult], stats: &AggregateStats) -> String {
        let mut html = String::with_capacity(16_384);
        let title = escape_html(&self.title);

        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
        html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
        let _ = writeln!(html, "<title>{}</title>", title);
        html.push_str(STYLE);
        html.push_str("</head>\n<body>\n");
        let _ = writeln!(
            html,
            "<header><h1>{}</h1><span class=\"meta\">Generated {}</span></header>",
            title,
            chrono::Utc::now().format("%Y-%m-%d %H:%M UTC")
        );

        self.push_summary(&mut html, stats);
        html.push_str("<main>\n");
        for result in results {
            self.push_page(&mut html, result);
        }
        html.push_str("</main>\n</body>\n</html>\n");
        html
    }

    fn push_summary(&self, html: &mut String, stats: &AggregateStats) {
        let grade = stats.average_score.grade;
        html.push_str("<section class=\"stats\">\n");
        let _ = writeln!(
            html,
            "<div class=\"stat\"><span class=\"val\">{}</span><span class=\"lbl\">Pages</span></div>",
            stats.pages_audited
        );
        let _ = writeln!(
            html,
            "<div class=\"stat\"><span class=\"val {}\">{:.1} ({})</span><span class=\"lbl\">Average score</span></div>",
            grade_class(grade),
            stats.average_score.value,
            escape_html(&grade.to_string())
        );
        let _ = writeln!(
            html,
            "<div class=\"stat\"><span class=\"val\">{}</span><span class=\"lbl\">Critical</span></div>",
            stats.critical_issues
        );
        let _ = writeln!(
            html,
            "<div class=\"stat\"><span class=\"val\">{}</span><span class=\"lbl\">Warnings</span></div>",
            stats.warning_issues
        );
        html.push_str("</section>\n");
    }

    fn push_page(&self, html: &mut String, r: &AuditResult) {
        let grade = r.score.grade;
        html.push_str("<article class=\"page\">\n");
        let _ = writeln!(
            html,
            "<h2><span class=\"badge {}\">{}</span> {}</h2>",
            grade_class(grade),
            escape_html(&grade.to_string()),
            escape_html(&r.url)
        );
        let _ = writeln!(
            html,
            "<p class=\"score\">{:.1}/100 &middot; {} &middot; {}</p>",
            r.score.value,
            escape_html(&r.status.to_string()),
            escape_html(ScoreCalculator::grade_description(grade))
        );
        let _ = writeln!(
            html,
            "<p class=\"summary\">{}</p>",
            escape_html(&ScoreCalculator::executive_summary(r))
        );

        html.push_str("<table class=\"factors\"><thead><tr><th>Factor</th><th>Score</th><th>Weight</th></tr></thead><tbody>\n");
        for f in &r.factors {
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td><div class=\"bar\"><span style=\"width:{}%\"></span></div>{}</td><td>{:.0}%</td></tr>",
                f.factor,
                f.raw_score,
                f.raw_score,
                f.weight * 100.0
            );
        }
        html.push_str("</tbody></table>\n");

        if !r.issues.is_empty() {
            html.push_str("<h3>Issues</h3>\n<ul class=\"issues\">\n");
            for issue in &r.issues {
                let class = match issue.severity {
                    Severity::Critical => "critical",
                    Severity::Warning => "warning",
                };
                let _ = writeln!(
                    html,
                    "<li class=\"{}\"><strong>{}</strong> <code>{}</code><br>{}</li>",
                    class,
                    escape_html(&issue.title),
                    issue.kind,
                    escape_html(&issue.message)
                );
            }
            html.push_str("</ul>\n");
        }

        if !r.recommendations.is_empty() {
            html.push_str("<h3>Recommendations</h3>\n<ol class=\"recs\">\n");
            for rec in &r.recommendations {
                let _ = writeln!(
                    html,
                    "<li><span class=\"prio {}\">{}</span> <em>{}</em> {}: {}</li>",
                    rec.priority.to_string().to_lowercase(),
                    rec.priority,
                    escape_html(&rec.category),
                    escape_html(&rec.issue),
                    escape_html(&rec.recommendation)
                );
            }
            html.push_str("</ol>\n");
        }

        if let Some(ref perf) = r.performance {
            self.push_performance(html, perf);
        }
        if !r.trends.is_empty() {
            self.push_trends(html, &r.trends);
        }
        html.push_str("</article>\n");
    }

    fn push_trends(&self, html: &mut String, trends: &[TrendsReport]) {
        html.push_str("<h3>Keyword trends</h3>\n<table class=\"trends\"><thead><tr>");
        html.push_str("<th>Keyword</th><th>Trend</th><th>Interest</th><th>Potential</th><th>Rising queries</th>");
        html.push_str("</tr></thead><tbody>\n");
        for t in trends {
            let rising = t
                .rising_queries
                .iter()
                .map(|q| escape_html(&q.query))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                html,
                "<tr><td>{}</td><td>{}</td><td>{:.0}/100</td><td>{:.2}</td><td>{}</td></tr>",
                escape_html(&t.keyword),
                t.direction,
                t.average_interest,
                t.content_potential(),
                rising
            );
        }
        html.push_str("</tbody></table>\n");
    }

    fn push_performance(&self, html: &mut String, perf: &PerformanceReport) {
        let _ = writeln!(
            html,
            "<h3>PageSpeed ({})</h3>\n<table class=\"perf\"><tbody>",
            perf.strategy.as_str()
        );
        let scores = [
            ("Performance", perf.scores.performance),
            ("SEO", perf.scores.seo),
            ("Accessibility", perf.scores.accessibility),
            ("Best practices", perf.scores.best_practices),
        ];
        for (label, score) in scores {
            if let Some(score) = score {
                let _ = writeln!(html, "<tr><td>{}</td><td>{}/100</td></tr>", label, score);
            }
        }
        let vitals = [
            ("LCP", perf.vitals.largest_contentful_paint, "ms"),
            ("FCP", perf.vitals.first_contentful_paint, "ms"),
            ("TBT", perf.vitals.total_blocking_time, "ms"),
            ("Speed index", perf.vitals.speed_index, "ms"),
        ];
        for (label, value, unit) in vitals {
            if let Some(value) = value {
                let _ = writeln!(html, "<tr><td>{}</td><td>{:.0} {}</td></tr>", label, value, unit);
            }
        }
        if let Some(cls) = perf.vitals.cumulative_layout_shift {
            let _ = writeln!(html, "<tr><td>CLS</td><td>{:.3}</td></tr>", cls);
        }
        html.push_str("</tbody></table>\n");
    }
}

impl Default for HtmlReporter {
    fn default() -> Self {
        Self::new()
    }
}

const STYLE: &str = r#"<style>
:root{--bg:#0d0d11;--surface:#16161b;--border:#2a2a32;--text:#e4e4e7;--muted:#71717a;--green:#22c55e;--lime:#84cc16;--yellow:#eab308;--orange:#f97316;--red:#ef4444;--radius:8px}
*{box-sizing:border-box;margin:0;padding:0}
body{font-family:-apple-system,BlinkMacSystemFont,'Segoe UI',Roboto,sans-serif;background:var(--bg);color:var(--text);line-height:1.5}
header{padding:1.25rem 1.5rem;border-bottom:1px solid var(--border);display:flex;gap:1.5rem;align-items:baseline}
header h1{font-size:1.125rem}
.meta,.lbl,.summary{color:var(--muted);font-size:.8125rem}
.stats{display:flex;background:var(--surface);border-bottom:1px solid var(--border)}
.stat{flex:1;padding:.875rem;text-align:center;border-right:1px solid var(--border)}
.stat:last-child{border-right:none}
.val{display:block;font-size:1.5rem;font-weight:700}
main{padding:1rem 1.5rem;display:grid;gap:1rem}
.page{background:var(--surface);border:1px solid var(--border);border-radius:var(--radius);padding:1rem 1.25rem}
.page h2{font-size:1rem;word-break:break-all}
.page h3{font-size:.8125rem;text-transform:uppercase;color:var(--muted);margin:.75rem 0 .375rem}
.badge{display:inline-block;min-width:2.25rem;text-align:center;border-radius:6px;padding:0 .375rem;background:var(--border)}
.g-a{color:var(--green)}.g-b{color:var(--lime)}.g-c{color:var(--yellow)}.g-d{color:var(--orange)}.g-f{color:var(--red)}
table{border-collapse:collapse;width:100%;font-size:.8125rem;margin-top:.5rem}
td,th{padding:.25rem .5rem;text-align:left;border-bottom:1px solid var(--border)}
.bar{display:inline-block;width:80px;height:6px;background:var(--border);border-radius:3px;margin-right:.5rem}
.bar span{display:block;height:100%;background:var(--green);border-radius:3px}
ul.issues,ol.recs{padding-left:1.25rem;font-size:.8125rem}
li.critical strong{color:var(--red)}
li.warning strong{color:var(--yellow)}
.prio{font-size:.6875rem;font-weight:700;text-transform:uppercase}
.prio.high{color:var(--red)}.prio.medium{color:var(--yellow)}.prio.low{color:var(--muted)}
code{color:var(--muted)}
</style>
"#;
