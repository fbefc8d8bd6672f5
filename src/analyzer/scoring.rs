//! Weighted multi-factor SEO score

use crate::{
    AuditResult, Factor, FactorScore, Grade, PageFacts, PageMetrics, Priority, Recommendation,
    Score, ScoringWeights, SeoScoreResult, FALLBACK_SCORE,
};

use super::rules::detect_issues;

/// Calculator for page SEO scores
pub struct ScoreCalculator;

impl ScoreCalculator {
    /// Score a page: per-factor raw scores, weighted average, grade and issues
    pub fn score(metrics: &PageMetrics, weights: &ScoringWeights) -> SeoScoreResult {
        Self::score_facts(&metrics.facts(), weights)
    }

    /// Score already-resolved facts
    pub fn score_facts(facts: &PageFacts, weights: &ScoringWeights) -> SeoScoreResult {
        let factors = Self::factor_scores(facts, weights);
        let overall = Self::weighted_average(&factors);

        SeoScoreResult {
            overall_score: overall.value,
            grade: overall.grade,
            factors,
            issues: detect_issues(facts),
        }
    }

    /// Raw score of every factor paired with its weight. Factors absent from
    /// the weight table are reported with weight 0.
    pub fn factor_scores(facts: &PageFacts, weights: &ScoringWeights) -> Vec<FactorScore> {
        Factor::ALL
            .into_iter()
            .map(|factor| FactorScore {
                factor,
                raw_score: Self::raw_score(factor, facts),
                weight: weights.get(factor).unwrap_or(0.0),
            })
            .collect()
    }

    /// Weight-normalized average over factors with a positive, finite weight.
    /// Falls back to [`FALLBACK_SCORE`] when nothing contributes or the
    /// average overflows.
    pub fn weighted_average(factors: &[FactorScore]) -> Score {
        let (sum, total_weight) = factors
            .iter()
            .filter(|f| f.weight.is_finite() && f.weight > 0.0)
            .fold((0.0, 0.0), |(sum, total), f| {
                (sum + f64::from(f.raw_score) * f.weight, total + f.weight)
            });

        let average = sum / total_weight;
        if total_weight <= 0.0 || !average.is_finite() {
            return Score::new(FALLBACK_SCORE);
        }
        Score::new(average)
    }

    pub fn raw_score(factor: Factor, facts: &PageFacts) -> u8 {
        match factor {
            Factor::Title => Self::title_score(facts),
            Factor::Description => Self::description_score(facts),
            Factor::Headings => Self::headings_score(facts.h1_count),
            Factor::Images => Self::images_score(facts.missing_alt_count),
            Factor::Content => Self::content_score(facts.word_count),
            Factor::Warnings => Self::warnings_score(facts.warning_count),
        }
    }

    fn title_score(facts: &PageFacts) -> u8 {
        if !facts.has_title {
            return 40;
        }
        match facts.title_length {
            50..=60 => 100,
            30..=70 => 80,
            _ => 40,
        }
    }

    fn description_score(facts: &PageFacts) -> u8 {
        if !facts.has_description {
            return 40;
        }
        match facts.description_length {
            140..=160 => 100,
            120..=180 => 80,
            _ => 40,
        }
    }

    fn headings_score(h1_count: usize) -> u8 {
        match h1_count {
            1 => 100,
            0 => 20,
            _ => 60,
        }
    }

    fn images_score(missing_alt: usize) -> u8 {
        match missing_alt {
            0 => 100,
            1..=2 => 70,
            _ => 30,
        }
    }

    fn content_score(word_count: u64) -> u8 {
        match word_count {
            300.. => 100,
            150..=299 => 80,
            50..=149 => 60,
            _ => 30,
        }
    }

    fn warnings_score(warning_count: usize) -> u8 {
        match warning_count {
            0 => 100,
            1..=3 => 70,
            _ => 40,
        }
    }

    /// Get a description of the grade
    pub fn grade_description(grade: Grade) -> &'static str {
        match grade {
            Grade::APlus => "Excellent - Page follows SEO best practices",
            Grade::A => "Great - Page is well optimized with minor gaps",
            Grade::BPlus => "Good - Page is solid but has room for improvement",
            Grade::B => "Fair - Page covers the basics but needs attention",
            Grade::C => "Needs improvement - Several SEO fundamentals are missing",
            Grade::D => "Poor - Page has significant SEO problems",
            Grade::F => "Critical - Page needs major SEO work",
        }
    }

    /// Actionable recommendations derived from page facts
    pub fn recommendations(facts: &PageFacts) -> Vec<Recommendation> {
        let mut recs = Vec::new();
        let mut push = |category: &str, priority, issue: String, recommendation: &str| {
            recs.push(Recommendation {
                category: category.to_string(),
                priority,
                issue,
                recommendation: recommendation.to_string(),
            })
        };

        if facts.title_length < 30 {
            push(
                "Title",
                Priority::High,
                "Title tag is too short".to_string(),
                "Expand the title to 50-60 characters with your primary keyword near the start",
            );
        } else if facts.title_length > 60 {
            push(
                "Title",
                Priority::High,
                "Title tag is too long".to_string(),
                "Shorten the title to 50-60 characters so it is not truncated in search results",
            );
        }

        if facts.description_length < 120 {
            push(
                "Meta Description",
                Priority::Medium,
                "Meta description is too short".to_string(),
                "Write a 120-160 character description that summarizes the page and invites the click",
            );
        } else if facts.description_length > 160 {
            push(
                "Meta Description",
                Priority::Medium,
                "Meta description is too long".to_string(),
                "Trim the description to 160 characters or fewer",
            );
        }

        if facts.missing_alt_count > 0 {
            push(
                "Images",
                Priority::Medium,
                format!("{} images missing alt attributes", facts.missing_alt_count),
                "Add descriptive alt text to every meaningful image",
            );
        }

        if facts.word_count < 150 {
            push(
                "Content",
                Priority::High,
                "Low word count".to_string(),
                "Expand the page to at least 300 words of useful, original content",
            );
        }

        if facts.h1_count == 0 {
            push(
                "Headings",
                Priority::High,
                "Missing H1 tag".to_string(),
                "Add a single H1 that states the page topic",
            );
        } else if facts.h1_count > 1 {
            push(
                "Headings",
                Priority::Medium,
                "Multiple H1 tags found".to_string(),
                "Keep one H1 and demote the others to H2",
            );
        }

        recs
    }

    /// One-paragraph summary of an audit
    pub fn executive_summary(result: &AuditResult) -> String {
        let critical = result.critical_count();
        let warnings = result.warning_count();
        let recs = result.recommendations.len();

        let mut summary = format!(
            "{} scored {:.1}/100 (grade {}, {}).",
            result.url, result.score.value, result.score.grade, result.status
        );

        if critical == 0 && warnings == 0 {
            summary.push_str(" No blocking SEO issues were found.");
        } else {
            summary.push_str(&format!(
                " Found {} critical {} and {} {}.",
                critical,
                plural(critical, "issue", "issues"),
                warnings,
                plural(warnings, "warning", "warnings"),
            ));
        }

        if recs > 0 {
            summary.push_str(&format!(
                " {} {} would improve the score.",
                recs,
                plural(recs, "recommendation", "recommendations")
            ));
        }

        summary
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}
