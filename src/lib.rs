//! seoaudit: weighted SEO scoring for crawled pages
//!
//! This library scores already-extracted page metrics against heuristic
//! rules, producing a 0-100 score, a letter grade and a prioritized list of
//! issues, plus the reporting, caching and configuration needed to audit a
//! whole crawl from the command line.

pub mod analyzer;
pub mod cache;
pub mod config;
pub mod error;
pub mod history;
pub mod metrics;
pub mod pagespeed;
pub mod reporter;
pub mod trends;

pub use error::AuditError;
pub use metrics::{PageFacts, PageMetrics};

use pagespeed::PerformanceReport;
use trends::TrendsReport;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Score returned when no factor carries any weight
pub const FALLBACK_SCORE: f64 = 75.0;

/// The audit of a single page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditResult {
    /// Page URL, or a synthetic `<file>#<index>` key when the crawl had none
    pub url: String,
    /// File the page metrics were loaded from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Overall weighted score (0-100, one decimal)
    pub score: Score,
    /// Coarse status label derived from the score
    pub status: Status,
    /// Per-factor raw scores and the weights they were combined with
    pub factors: Vec<FactorScore>,
    /// Issues, critical first
    pub issues: Vec<Issue>,
    /// Actionable recommendations
    pub recommendations: Vec<Recommendation>,
    /// Facts the score was computed from
    pub stats: PageStats,
    /// PageSpeed Insights data, when requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceReport>,
    /// Google Trends data for the page's top keywords, when requested
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub trends: Vec<TrendsReport>,
}

impl AuditResult {
    pub fn critical_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }
}

/// Output of the scoring engine for one page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoScoreResult {
    /// Weighted average of contributing factors, rounded to one decimal
    pub overall_score: f64,
    pub grade: Grade,
    pub factors: Vec<FactorScore>,
    pub issues: Vec<Issue>,
}

/// Numeric score with grade
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Numeric score (0.0-100.0)
    pub value: f64,
    /// Letter grade (A+ to F)
    pub grade: Grade,
}

impl Score {
    pub fn new(value: f64) -> Self {
        let value = round1(value.clamp(0.0, 100.0));
        let grade = Grade::from_score(value);
        Self { value, grade }
    }
}

impl Default for Score {
    fn default() -> Self {
        Score::new(0.0)
    }
}

/// Round to one decimal place, halves away from zero
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Letter grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    D,
    F,
}

impl Grade {
    /// Map a score to a grade; lower bounds are inclusive
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Grade::APlus
        } else if score >= 80.0 {
            Grade::A
        } else if score >= 70.0 {
            Grade::BPlus
        } else if score >= 60.0 {
            Grade::B
        } else if score >= 50.0 {
            Grade::C
        } else if score >= 40.0 {
            Grade::D
        } else {
            Grade::F
        }
    }

    pub const ALL: [Grade; 7] = [
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::F,
    ];
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Grade::APlus => write!(f, "A+"),
            Grade::A => write!(f, "A"),
            Grade::BPlus => write!(f, "B+"),
            Grade::B => write!(f, "B"),
            Grade::C => write!(f, "C"),
            Grade::D => write!(f, "D"),
            Grade::F => write!(f, "F"),
        }
    }
}

/// Status label shown next to the grade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Excellent,
    Great,
    Good,
    Fair,
    NeedsImprovement,
    Poor,
    Critical,
}

impl Status {
    pub fn from_score(score: f64) -> Self {
        match Grade::from_score(score) {
            Grade::APlus => Status::Excellent,
            Grade::A => Status::Great,
            Grade::BPlus => Status::Good,
            Grade::B => Status::Fair,
            Grade::C => Status::NeedsImprovement,
            Grade::D => Status::Poor,
            Grade::F => Status::Critical,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Excellent => write!(f, "excellent"),
            Status::Great => write!(f, "great"),
            Status::Good => write!(f, "good"),
            Status::Fair => write!(f, "fair"),
            Status::NeedsImprovement => write!(f, "needs improvement"),
            Status::Poor => write!(f, "poor"),
            Status::Critical => write!(f, "critical"),
        }
    }
}

/// A scoring dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Title,
    Description,
    Headings,
    Images,
    Content,
    Warnings,
}

impl Factor {
    pub const ALL: [Factor; 6] = [
        Factor::Title,
        Factor::Description,
        Factor::Headings,
        Factor::Images,
        Factor::Content,
        Factor::Warnings,
    ];

    /// Config key for this factor
    pub fn key(&self) -> &'static str {
        match self {
            Factor::Title => "title",
            Factor::Description => "description",
            Factor::Headings => "headings",
            Factor::Images => "images",
            Factor::Content => "content",
            Factor::Warnings => "warnings",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Factor::ALL.into_iter().find(|f| f.key() == key)
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Factor::Title => write!(f, "Title"),
            Factor::Description => write!(f, "Description"),
            Factor::Headings => write!(f, "Headings"),
            Factor::Images => write!(f, "Images"),
            Factor::Content => write!(f, "Content"),
            Factor::Warnings => write!(f, "Warnings"),
        }
    }
}

/// One factor's contribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorScore {
    pub factor: Factor,
    /// Raw score for this factor (0-100)
    pub raw_score: u8,
    /// Weight this factor was combined with
    pub weight: f64,
}

/// Factor weights. A factor with no entry, or a weight of zero, does not
/// contribute to the weighted average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    weights: BTreeMap<Factor, f64>,
}

impl ScoringWeights {
    /// The canonical weight table
    pub fn standard() -> Self {
        let weights = [
            (Factor::Title, 0.20),
            (Factor::Description, 0.15),
            (Factor::Headings, 0.15),
            (Factor::Images, 0.10),
            (Factor::Content, 0.25),
            (Factor::Warnings, 0.15),
        ]
        .into_iter()
        .collect();
        Self { weights }
    }

    /// A table with no weights at all
    pub fn empty() -> Self {
        Self {
            weights: BTreeMap::new(),
        }
    }

    /// Set the weight of one factor, clamped to [0, 1]. Non-finite values count as zero.
    pub fn with(mut self, factor: Factor, weight: f64) -> Self {
        let weight = if weight.is_finite() {
            weight.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.weights.insert(factor, weight);
        self
    }

    /// Remove a factor from the table
    pub fn without(mut self, factor: Factor) -> Self {
        self.weights.remove(&factor);
        self
    }

    pub fn get(&self, factor: Factor) -> Option<f64> {
        self.weights.get(&factor).copied()
    }

    /// Sum of all weights
    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    /// Stable textual fingerprint, used to invalidate cached scores
    pub fn fingerprint(&self) -> String {
        self.weights
            .iter()
            .map(|(f, w)| format!("{}={}", f.key(), w))
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self::standard()
    }
}

/// A finding about a page, independent of the numeric score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// Which check produced this issue
    pub kind: IssueKind,
    pub severity: Severity,
    /// Short headline
    pub title: String,
    /// Human-readable explanation
    pub message: String,
}

/// Issue severity; critical sorts before warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Issue checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    MissingDescription,
    ShortDescription,
    MissingAltText,
    MissingH1,
    TitleLength,
    CanonicalMismatch,
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IssueKind::MissingDescription => write!(f, "missing-description"),
            IssueKind::ShortDescription => write!(f, "short-description"),
            IssueKind::MissingAltText => write!(f, "missing-alt-text"),
            IssueKind::MissingH1 => write!(f, "missing-h1"),
            IssueKind::TitleLength => write!(f, "title-length"),
            IssueKind::CanonicalMismatch => write!(f, "canonical-mismatch"),
        }
    }
}

/// A remediation suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub category: String,
    pub priority: Priority,
    pub issue: String,
    pub recommendation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

/// Facts about a page as reported alongside its score
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageStats {
    pub title_length: usize,
    pub description_length: usize,
    pub h1_count: usize,
    pub image_count: usize,
    pub missing_alt_count: usize,
    pub word_count: u64,
    pub warning_count: usize,
}

impl From<&PageFacts> for PageStats {
    fn from(facts: &PageFacts) -> Self {
        Self {
            title_length: facts.title_length,
            description_length: facts.description_length,
            h1_count: facts.h1_count,
            image_count: facts.image_count,
            missing_alt_count: facts.missing_alt_count,
            word_count: facts.word_count,
            warning_count: facts.warning_count,
        }
    }
}

/// Score a page with the standard weights
pub fn score(metrics: &PageMetrics) -> SeoScoreResult {
    analyzer::ScoreCalculator::score(metrics, &ScoringWeights::standard())
}

/// Public API: audit every page in a metrics file or directory.
///
/// * `path` - JSON file or directory of JSON files produced by a crawler
/// * `work_dir` - directory used for config lookup
/// * `config_path` - optional path to .seoauditrc.json; if None, searches from work_dir
pub fn audit_path(
    path: &std::path::Path,
    work_dir: &std::path::Path,
    config_path: Option<&std::path::Path>,
) -> anyhow::Result<Vec<AuditResult>> {
    let config = crate::config::load_config(work_dir, config_path)?;
    let pages = crate::metrics::load_pages(path)?;
    let engine = crate::analyzer::AuditEngine::new();
    Ok(engine.audit_pages(&pages, &config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_boundaries_inclusive() {
        assert_eq!(Grade::from_score(100.0), Grade::APlus);
        assert_eq!(Grade::from_score(90.0), Grade::APlus);
        assert_eq!(Grade::from_score(89.9), Grade::A);
        assert_eq!(Grade::from_score(80.0), Grade::A);
        assert_eq!(Grade::from_score(79.9), Grade::BPlus);
        assert_eq!(Grade::from_score(70.0), Grade::BPlus);
        assert_eq!(Grade::from_score(60.0), Grade::B);
        assert_eq!(Grade::from_score(50.0), Grade::C);
        assert_eq!(Grade::from_score(40.0), Grade::D);
        assert_eq!(Grade::from_score(39.9), Grade::F);
        assert_eq!(Grade::from_score(0.0), Grade::F);
    }

    #[test]
    fn grade_display_and_serde() {
        assert_eq!(Grade::APlus.to_string(), "A+");
        assert_eq!(Grade::BPlus.to_string(), "B+");
        assert_eq!(serde_json::to_string(&Grade::APlus).unwrap(), "\"A+\"");
        let g: Grade = serde_json::from_str("\"B+\"").unwrap();
        assert_eq!(g, Grade::BPlus);
    }

    #[test]
    fn score_new_rounds_and_clamps() {
        assert_eq!(Score::new(49.54).value, 49.5);
        assert_eq!(Score::new(49.56).value, 49.6);
        assert_eq!(Score::new(120.0).value, 100.0);
        assert_eq!(Score::new(-3.0).value, 0.0);
    }

    #[test]
    fn status_follows_grade_bands() {
        assert_eq!(Status::from_score(95.0), Status::Excellent);
        assert_eq!(Status::from_score(85.0), Status::Great);
        assert_eq!(Status::from_score(55.0), Status::NeedsImprovement);
        assert_eq!(Status::from_score(10.0), Status::Critical);
    }

    #[test]
    fn standard_weights_sum_to_one() {
        let w = ScoringWeights::standard();
        assert!((w.total() - 1.0).abs() < 1e-9);
        assert_eq!(w.get(Factor::Content), Some(0.25));
    }

    #[test]
    fn weights_builder() {
        let w = ScoringWeights::standard()
            .without(Factor::Warnings)
            .with(Factor::Title, -1.0);
        assert_eq!(w.get(Factor::Warnings), None);
        assert_eq!(w.get(Factor::Title), Some(0.0));
    }

    #[test]
    fn weights_are_clamped_and_non_finite_dropped() {
        let w = ScoringWeights::standard()
            .with(Factor::Title, f64::INFINITY)
            .with(Factor::Content, 1e308)
            .with(Factor::Images, f64::NAN);
        assert_eq!(w.get(Factor::Title), Some(0.0));
        assert_eq!(w.get(Factor::Content), Some(1.0));
        assert_eq!(w.get(Factor::Images), Some(0.0));
        assert!(w.total().is_finite());
    }

    #[test]
    fn infinite_weight_keeps_score_in_bounds() {
        let weights = ScoringWeights::standard().with(Factor::Title, f64::INFINITY);
        let result = analyzer::ScoreCalculator::score(&PageMetrics::default(), &weights);
        assert!((0.0..=100.0).contains(&result.overall_score));
        assert_eq!(result.grade, Grade::from_score(result.overall_score));
    }

    #[test]
    fn fingerprint_changes_with_weights() {
        let a = ScoringWeights::standard();
        let b = ScoringWeights::standard().with(Factor::Title, 0.5);
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint(), ScoringWeights::standard().fingerprint());
    }

    #[test]
    fn factor_keys_round_trip() {
        for f in Factor::ALL {
            assert_eq!(Factor::from_key(f.key()), Some(f));
        }
        assert_eq!(Factor::from_key("links"), None);
    }

    #[test]
    fn issue_kind_ids() {
        assert_eq!(IssueKind::MissingH1.to_string(), "missing-h1");
        assert_eq!(
            serde_json::to_string(&IssueKind::CanonicalMismatch).unwrap(),
            "\"canonical-mismatch\""
        );
    }

    #[test]
    fn severity_orders_critical_first() {
        assert!(Severity::Critical < Severity::Warning);
    }
}
