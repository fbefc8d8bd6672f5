//! Images without alt text

use super::IssueRule;
use crate::{Issue, IssueKind, PageFacts, Severity};

pub struct ImageAltRule;

impl IssueRule for ImageAltRule {
    fn name(&self) -> &'static str {
        "image-alt"
    }

    fn check(&self, facts: &PageFacts) -> Vec<Issue> {
        let missing = facts.missing_alt_count;
        if missing == 0 {
            return vec![];
        }

        let noun = if missing == 1 { "image" } else { "images" };
        vec![Issue {
            kind: IssueKind::MissingAltText,
            severity: Severity::Critical,
            title: "Images missing alt text".to_string(),
            message: format!(
                "{} {} missing alt attributes - add descriptive alt text for accessibility and image search",
                missing, noun
            ),
        }]
    }
}
