//! Title tag length

use super::IssueRule;
use crate::{Issue, IssueKind, PageFacts, Severity};

pub const MIN_TITLE_LENGTH: usize = 30;
pub const MAX_TITLE_LENGTH: usize = 60;

pub struct TitleLengthRule;

impl IssueRule for TitleLengthRule {
    fn name(&self) -> &'static str {
        "title-length"
    }

    fn check(&self, facts: &PageFacts) -> Vec<Issue> {
        let len = facts.title_length;
        let (title, message) = if !facts.has_title {
            (
                "Missing title",
                "No title tag found - add a unique 50-60 character title".to_string(),
            )
        } else if len < MIN_TITLE_LENGTH {
            (
                "Title too short",
                format!("Title is {} characters - expand to 50-60 characters", len),
            )
        } else if len > MAX_TITLE_LENGTH {
            (
                "Title too long",
                format!(
                    "Title is {} characters - shorten to 50-60 characters to avoid truncation",
                    len
                ),
            )
        } else {
            return vec![];
        };

        vec![Issue {
            kind: IssueKind::TitleLength,
            severity: Severity::Warning,
            title: title.to_string(),
            message,
        }]
    }
}
