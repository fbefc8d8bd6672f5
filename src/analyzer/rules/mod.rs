//! Issue rules for page metrics

pub mod canonical;
pub mod description;
pub mod headings;
pub mod image_alt;
pub mod title_length;

pub use canonical::CanonicalRule;
pub use description::DescriptionRule;
pub use headings::MissingH1Rule;
pub use image_alt::ImageAltRule;
pub use title_length::TitleLengthRule;

use crate::{Issue, PageFacts};

/// Trait for issue rules
pub trait IssueRule: Send + Sync {
    /// Name of the rule
    fn name(&self) -> &'static str;

    /// Inspect a page and return the issues found
    fn check(&self, facts: &PageFacts) -> Vec<Issue>;
}

/// Every rule, in detection order: critical checks first, then warnings
pub fn default_rules() -> Vec<Box<dyn IssueRule>> {
    vec![
        Box::new(DescriptionRule),
        Box::new(ImageAltRule),
        Box::new(MissingH1Rule),
        Box::new(TitleLengthRule),
        Box::new(CanonicalRule),
    ]
}

/// Run every rule and order the findings critical first. The sort is stable,
/// so detection order survives within each severity.
pub fn detect_issues(facts: &PageFacts) -> Vec<Issue> {
    let mut issues: Vec<Issue> = default_rules()
        .iter()
        .flat_map(|rule| rule.check(facts))
        .collect();
    issues.sort_by_key(|i| i.severity);
    issues
}
