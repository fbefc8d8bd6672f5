//! Meta description presence and length

use super::IssueRule;
use crate::{Issue, IssueKind, PageFacts, Severity};

/// Descriptions shorter than this are truncated-looking in search results
pub const MIN_DESCRIPTION_LENGTH: usize = 120;

pub struct DescriptionRule;

impl IssueRule for DescriptionRule {
    fn name(&self) -> &'static str {
        "description"
    }

    fn check(&self, facts: &PageFacts) -> Vec<Issue> {
        if !facts.has_description {
            return vec![Issue {
                kind: IssueKind::MissingDescription,
                severity: Severity::Critical,
                title: "Missing meta description".to_string(),
                message: "No meta description found - add a compelling 120-160 character description"
                    .to_string(),
            }];
        }

        if facts.description_length < MIN_DESCRIPTION_LENGTH {
            return vec![Issue {
                kind: IssueKind::ShortDescription,
                severity: Severity::Critical,
                title: "Meta description too short".to_string(),
                message: format!(
                    "Description is {} characters - expand to 120-160 characters",
                    facts.description_length
                ),
            }];
        }

        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(description: Option<usize>) -> PageFacts {
        PageFacts {
            has_description: description.is_some(),
            description_length: description.unwrap_or(0),
            ..Default::default()
        }
    }

    #[test]
    fn missing_description_is_critical() {
        let issues = DescriptionRule.check(&facts(None));
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::MissingDescription);
        assert_eq!(issues[0].severity, Severity::Critical);
        assert!(issues[0].message.contains("meta description"));
    }

    #[test]
    fn short_description_reports_length() {
        let issues = DescriptionRule.check(&facts(Some(119)));
        assert_eq!(issues[0].kind, IssueKind::ShortDescription);
        assert!(issues[0].message.contains("119 characters"));
    }

    #[test]
    fn boundary_length_passes() {
        assert!(DescriptionRule.check(&facts(Some(120))).is_empty());
        assert!(DescriptionRule.check(&facts(Some(300))).is_empty());
    }
}
