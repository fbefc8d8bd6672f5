//! H1 presence

use super::IssueRule;
use crate::{Issue, IssueKind, PageFacts, Severity};

pub struct MissingH1Rule;

impl IssueRule for MissingH1Rule {
    fn name(&self) -> &'static str {
        "missing-h1"
    }

    fn check(&self, facts: &PageFacts) -> Vec<Issue> {
        if facts.h1_count > 0 {
            return vec![];
        }
        vec![Issue {
            kind: IssueKind::MissingH1,
            severity: Severity::Critical,
            title: "Missing H1 heading".to_string(),
            message: "No H1 heading found - add a single, keyword-rich main heading".to_string(),
        }]
    }
}
