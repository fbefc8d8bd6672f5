//! CSV reporter for spreadsheets
//!
//! One `page` row per audited page followed by one `issue` row per issue.
//! Fields are quoted per RFC 4180 when they contain commas, quotes or
//! line breaks.

use crate::AuditResult;

const HEADER: [&str; 12] = [
    "row",
    "url",
    "score",
    "grade",
    "status",
    "words",
    "images",
    "missing_alt",
    "h1",
    "issue",
    "severity",
    "message",
];

/// Reporter for CSV output
pub struct CsvReporter;

impl CsvReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, results: &[AuditResult]) -> String {
        let mut out = String::new();
        push_row(&mut out, HEADER.iter().map(|h| h.to_string()));

        for r in results {
            let page = [
                "page".to_string(),
                r.url.clone(),
                format!("{:.1}", r.score.value),
                r.score.grade.to_string(),
                r.status.to_string(),
                r.stats.word_count.to_string(),
                r.stats.image_count.to_string(),
                r.stats.missing_alt_count.to_string(),
                r.stats.h1_count.to_string(),
                String::new(),
                String::new(),
                String::new(),
            ];
            push_row(&mut out, page.into_iter());

            for issue in &r.issues {
                let mut row = vec!["issue".to_string(), r.url.clone()];
                row.extend(std::iter::repeat(String::new()).take(7));
                row.push(issue.kind.to_string());
                row.push(issue.severity.to_string());
                row.push(issue.message.clone());
                push_row(&mut out, row.into_iter());
            }
        }
        out
    }
}

impl Default for CsvReporter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_row(out: &mut String, fields: impl Iterator<Item = String>) {
    let line = fields.map(|f| escape(&f)).collect::<Vec<_>>().join(",");
    out.push_str(&line);
    out.push_str("\r\n");
}

/// Quote a field if needed, doubling embedded quotes
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
