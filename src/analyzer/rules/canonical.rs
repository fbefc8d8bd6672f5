//! Canonical link pointing away from the page

use super::IssueRule;
use crate::{Issue, IssueKind, PageFacts, Severity};

pub struct CanonicalRule;

impl IssueRule for CanonicalRule {
    fn name(&self) -> &'static str {
        "canonical"
    }

    fn check(&self, facts: &PageFacts) -> Vec<Issue> {
        if !facts.canonical_mismatch {
            return vec![];
        }
        let target = facts.canonical.as_deref().unwrap_or("another URL");
        vec![Issue {
            kind: IssueKind::CanonicalMismatch,
            severity: Severity::Warning,
            title: "Canonical URL differs from page URL".to_string(),
            message: format!(
                "Canonical points to {} - search engines may index that URL instead of this page",
                target
            ),
        }]
    }
}
