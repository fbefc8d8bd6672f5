//! Console reporter with colored output

use crate::analyzer::engine::AggregateStats;
use crate::analyzer::scoring::ScoreCalculator;
use crate::history::format_delta;
use crate::trends::{TrendDirection, TrendsReport};
use crate::{AuditResult, FactorScore, Grade, Issue, Priority, Severity};
use colored::Colorize;
use std::collections::HashMap;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
    /// Scores from the previous run, by page key
    previous: HashMap<String, f64>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
            previous: HashMap::new(),
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Show score deltas against a previous run
    pub fn with_previous_scores(mut self, previous: HashMap<String, f64>) -> Self {
        self.previous = previous;
        self
    }

    fn delta(&self, result: &AuditResult) -> String {
        format_delta(self.previous.get(&result.url).copied(), result.score.value)
    }

    /// Report a single audit result
    pub fn report(&self, result: &AuditResult) {
        self.print_header(result);
        self.print_score(result);
        self.print_factors(&result.factors);

        if !result.issues.is_empty() {
            self.print_issues(result);
        }

        self.print_recommendations(result);
        if !result.trends.is_empty() {
            self.print_trends(&result.trends);
        }
        if self.verbose {
            println!("   {}", ScoreCalculator::executive_summary(result).dimmed());
        }
        println!();
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[AuditResult], stats: &AggregateStats) {
        for result in results {
            self.report(result);
            println!("{}", "─".repeat(60));
        }

        self.print_summary(stats);
    }

    /// Report in quiet mode (just score)
    pub fn report_quiet(&self, result: &AuditResult) {
        println!("{}", self.quiet_line(result));
    }

    pub fn quiet_line(&self, result: &AuditResult) -> String {
        format!(
            "{}: {:.1} ({}){}",
            result.url,
            result.score.value,
            self.colorize_grade(&result.score.grade),
            self.delta(result)
        )
    }

    fn print_header(&self, result: &AuditResult) {
        println!();
        println!("{}", format!("🔎 SEO Audit: {}", result.url).bold());
        println!(
            "   Words: {} | Images: {} | H1: {}",
            result.stats.word_count, result.stats.image_count, result.stats.h1_count
        );
        if let Some(ref source) = result.source {
            println!("   Source: {}", source.display());
        }
        println!();
    }

    fn print_score(&self, result: &AuditResult) {
        let grade_str = self.colorize_grade(&result.score.grade);
        let score_bar = self.create_score_bar(result.score.value);

        println!(
            "   Score: {} {} {}{}",
            score_bar,
            grade_str.bold(),
            result.status.to_string().dimmed(),
            self.delta(result)
        );
        println!(
            "   {}",
            ScoreCalculator::grade_description(result.score.grade).dimmed()
        );
        println!();
    }

    fn print_factors(&self, factors: &[FactorScore]) {
        println!("   {}", "Factor Breakdown:".bold());
        for f in factors {
            let bar = self.create_mini_bar(f.raw_score);
            let score_str = format!("{:>3}/100", f.raw_score);
            let colored_score = if f.raw_score >= 80 {
                score_str.green()
            } else if f.raw_score >= 60 {
                score_str.yellow()
            } else {
                score_str.red()
            };
            let weight = if f.weight > 0.0 {
                format!("weight {:.0}%", f.weight * 100.0)
            } else {
                "not scored".to_string()
            };
            println!(
                "   {} {} {:<12} {}",
                bar,
                colored_score,
                f.factor.to_string(),
                weight.dimmed()
            );
        }
        println!();
    }

    fn print_issues(&self, result: &AuditResult) {
        println!("   {}", "Issues Found:".bold());
        for issue in &result.issues {
            self.print_issue(issue);
        }
        println!();
    }

    fn print_issue(&self, issue: &Issue) {
        let icon = match issue.severity {
            Severity::Critical => "✗".red(),
            Severity::Warning => "⚠".yellow(),
        };
        println!(
            "   {} [{}] {}",
            icon,
            issue.kind.to_string().dimmed(),
            issue.title
        );
        println!("       {} {}", "→".dimmed(), issue.message.italic());
    }

    fn print_recommendations(&self, result: &AuditResult) {
        if result.recommendations.is_empty() {
            return;
        }
        println!("   {}", "Recommendations:".bold());
        let shown = if self.verbose {
            result.recommendations.len()
        } else {
            5
        };
        for rec in result.recommendations.iter().take(shown) {
            let priority = match rec.priority {
                Priority::High => rec.priority.to_string().red(),
                Priority::Medium => rec.priority.to_string().yellow(),
                Priority::Low => rec.priority.to_string().dimmed(),
            };
            println!(
                "   {} [{}] {}: {}",
                "→".cyan(),
                priority,
                rec.issue,
                rec.recommendation
            );
        }
        let hidden = result.recommendations.len().saturating_sub(shown);
        if hidden > 0 {
            println!(
                "   {} {} more (use --verbose to show)",
                "ℹ".blue(),
                hidden
            );
        }
    }

    fn print_trends(&self, trends: &[TrendsReport]) {
        println!("   {}", "Keyword trends:".bold());
        for report in trends {
            println!("   {} {}", "→".cyan(), self.trend_line(report));
        }
    }

    /// One line per keyword: direction, interest and content potential
    pub fn trend_line(&self, report: &TrendsReport) -> String {
        let direction = match report.direction {
            TrendDirection::Rising => report.direction.to_string().green(),
            TrendDirection::Stable => report.direction.to_string().normal(),
            TrendDirection::Falling => report.direction.to_string().red(),
        };
        format!(
            "{} ({}): {}, interest {:.0}/100, potential {:.2}, {} peak(s)",
            report.keyword,
            report.region,
            direction,
            report.average_interest,
            report.content_potential(),
            report.peak_periods.len()
        )
    }

    fn print_summary(&self, stats: &AggregateStats) {
        println!();
        println!("{}", "═".repeat(60));
        println!("{}", "Site Summary".bold());
        println!("{}", "═".repeat(60));
        println!(
            "   Pages audited:  {}",
            stats.pages_audited.to_string().bold()
        );
        println!(
            "   Average score:  {} ({})",
            format!("{:.1}", stats.average_score.value).bold(),
            self.colorize_grade(&stats.average_score.grade)
        );
        println!(
            "   Issues:         {} ({} critical, {} warnings)",
            stats.total_issues, stats.critical_issues, stats.warning_issues
        );
        let distribution = Grade::ALL
            .iter()
            .filter_map(|g| {
                stats
                    .grade_distribution
                    .get(g)
                    .map(|n| format!("{} {}", self.colorize_grade(g), n))
            })
            .collect::<Vec<_>>()
            .join("  ");
        println!("   Grades:         {}", distribution);
        println!();
    }

    fn colorize_grade(&self, grade: &Grade) -> colored::ColoredString {
        let s = grade.to_string();
        if !self.use_colors {
            return s.normal();
        }
        match grade {
            Grade::APlus | Grade::A => s.green().bold(),
            Grade::BPlus | Grade::B => s.green(),
            Grade::C => s.yellow(),
            Grade::D => s.red(),
            Grade::F => s.red().bold(),
        }
    }

    fn create_score_bar(&self, score: f64) -> String {
        let filled = ((score / 5.0).floor() as usize).min(20);
        let empty = 20 - filled;

        let bar = format!(
            "[{}{}] {:>5.1}",
            "█".repeat(filled),
            "░".repeat(empty),
            score
        );

        if self.use_colors {
            if score >= 80.0 {
                bar.green().to_string()
            } else if score >= 60.0 {
                bar.yellow().to_string()
            } else {
                bar.red().to_string()
            }
        } else {
            bar
        }
    }

    fn create_mini_bar(&self, score: u8) -> String {
        let filled = (score as usize * 10) / 100;
        let empty = 10 - filled;
        format!("[{}{}]", "▓".repeat(filled), "░".repeat(empty))
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PageStats, Score, Status};

    fn make_result(url: &str, score: f64) -> AuditResult {
        AuditResult {
            url: url.to_string(),
            source: None,
            score: Score::new(score),
            status: Status::from_score(score),
            factors: vec![],
            issues: vec![],
            recommendations: vec![],
            stats: PageStats::default(),
            performance: None,
            trends: Vec::new(),
        }
    }

    #[test]
    fn score_bar_bounds() {
        let reporter = ConsoleReporter::new().without_colors();
        assert!(reporter.create_score_bar(100.0).starts_with(&format!("[{}]", "█".repeat(20))));
        assert!(reporter.create_score_bar(0.0).starts_with(&format!("[{}]", "░".repeat(20))));
        assert!(reporter.create_score_bar(49.5).ends_with(" 49.5"));
    }

    #[test]
    fn mini_bar_has_ten_cells() {
        let reporter = ConsoleReporter::new();
        assert_eq!(reporter.create_mini_bar(70), format!("[{}{}]", "▓".repeat(7), "░".repeat(3)));
    }

    #[test]
    fn quiet_line_includes_delta() {
        colored::control::set_override(false);
        let previous = [("https://a.test/".to_string(), 80.0)].into_iter().collect();
        let reporter = ConsoleReporter::new().with_previous_scores(previous);
        assert_eq!(
            reporter.quiet_line(&make_result("https://a.test/", 83.5)),
            "https://a.test/: 83.5 (A) [was 80.0, up 3.5]"
        );
        assert_eq!(
            reporter.quiet_line(&make_result("https://b.test/", 40.0)),
            "https://b.test/: 40.0 (D)"
        );
    }

    #[test]
    fn trend_line_summarizes_keyword() {
        colored::control::set_override(false);
        let response = serde_json::json!({
            "interest_over_time": { "timeline_data": [
                { "date": "Jan", "value": 40 },
                { "date": "Feb", "value": 60 }
            ] }
        });
        let report = TrendsReport::from_response(&response, "kiln", &Default::default());
        assert_eq!(
            ConsoleReporter::new().trend_line(&report),
            "kiln (US): rising, interest 50/100, potential 0.70, 1 peak(s)"
        );
    }
}
