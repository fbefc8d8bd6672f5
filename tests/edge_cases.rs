//! Edge case tests: degenerate inputs must not panic.

use seoaudit::analyzer::AuditEngine;
use seoaudit::config::Config;
use seoaudit::metrics::{load_file, load_pages, load_reader, parse_pages};
use seoaudit::{score, AuditError, Grade, PageMetrics, ScoringWeights, FALLBACK_SCORE};
use std::io::Write;
use tempfile::{NamedTempFile, TempDir};

fn json_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::with_suffix(".json").unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn empty_object_scores_worst_case_defaults() {
    let file = json_file("{}");
    let pages = load_file(file.path()).unwrap();
    assert_eq!(pages.len(), 1);
    assert!(pages[0].key.ends_with("#0"));

    let result = AuditEngine::new().audit_page(&pages[0], &Config::default());
    assert_eq!(result.score.value, 49.5);
    assert_eq!(result.score.grade, Grade::D);
    assert_eq!(result.source.as_deref(), Some(file.path()));
}

#[test]
fn empty_file_is_an_error_not_a_panic() {
    let file = json_file("");
    let err = load_file(file.path()).unwrap_err();
    assert!(matches!(err, AuditError::Json { .. }));
}

#[test]
fn scalar_json_is_rejected() {
    let err = parse_pages("42", "inline").unwrap_err();
    assert!(err.to_string().contains("a number"));
    let err = parse_pages("\"page\"", "inline").unwrap_err();
    assert!(matches!(err, AuditError::InvalidInput { .. }));
}

#[test]
fn empty_array_yields_no_pages() {
    assert!(parse_pages("[]", "inline").unwrap().is_empty());
    assert!(parse_pages(r#"{"pages": []}"#, "inline").unwrap().is_empty());
}

#[test]
fn wrong_field_types_are_reported() {
    let err = parse_pages(r#"{"word_count": "many"}"#, "inline").unwrap_err();
    assert!(matches!(err, AuditError::Json { .. }));
}

#[test]
fn unknown_fields_are_ignored() {
    let pages = parse_pages(r#"{"title": "x", "links": 12, "lang": "en"}"#, "inline").unwrap();
    assert_eq!(pages[0].title.as_deref(), Some("x"));
}

#[test]
fn blank_strings_count_as_missing() {
    let metrics: PageMetrics =
        serde_json::from_str(r#"{"title": "   ", "description": "", "url": " "}"#).unwrap();
    let facts = metrics.facts();
    assert!(!facts.has_title);
    assert!(!facts.has_description);
    assert_eq!(metrics.key(), None);
    assert_eq!(score(&metrics).overall_score, 49.5);

    // Length alone does not make padding a description
    let padded = PageMetrics {
        description: Some(" ".repeat(150)),
        ..Default::default()
    };
    let result = score(&padded);
    let description = result
        .factors
        .iter()
        .find(|f| f.factor == seoaudit::Factor::Description)
        .unwrap();
    assert_eq!(description.raw_score, 40);
    assert_eq!(result.issues[0].kind, seoaudit::IssueKind::MissingDescription);
}

#[test]
fn huge_word_count_and_many_warnings() {
    let metrics = PageMetrics {
        word_count: u64::MAX,
        warnings: vec!["w".to_string(); 500],
        ..Default::default()
    };
    let result = score(&metrics);
    assert!((0.0..=100.0).contains(&result.overall_score));
}

#[test]
fn unicode_title_counts_characters_not_bytes() {
    let title = "é".repeat(55);
    let metrics = PageMetrics {
        title: Some(title),
        ..Default::default()
    };
    assert_eq!(metrics.facts().title_length, 55);
}

#[test]
fn all_zero_weights_fall_back() {
    let weights = ScoringWeights::standard()
        .with(seoaudit::Factor::Title, 0.0)
        .with(seoaudit::Factor::Description, 0.0)
        .with(seoaudit::Factor::Headings, 0.0)
        .with(seoaudit::Factor::Images, 0.0)
        .with(seoaudit::Factor::Content, 0.0)
        .with(seoaudit::Factor::Warnings, 0.0);
    let result = seoaudit::analyzer::ScoreCalculator::score(&PageMetrics::default(), &weights);
    assert_eq!(result.overall_score, FALLBACK_SCORE);
    assert_eq!(result.grade, Grade::BPlus);
}

#[test]
fn overflowing_weights_keep_score_in_bounds() {
    // Deserialized directly, so load_config validation is bypassed
    let config: Config =
        serde_json::from_str(r#"{ "weights": { "title": 1e308, "content": 1e308 } }"#).unwrap();
    let result = AuditEngine::new().audit_metrics("https://a.test/", &PageMetrics::default(), &config);
    assert!((0.0..=100.0).contains(&result.score.value));
    assert_eq!(result.score.grade, Grade::from_score(result.score.value));

    let weights = ScoringWeights::standard().with(seoaudit::Factor::Title, f64::INFINITY);
    let result = seoaudit::analyzer::ScoreCalculator::score(&PageMetrics::default(), &weights);
    assert!((0.0..=100.0).contains(&result.overall_score));
}

#[test]
fn empty_weight_table_falls_back() {
    let result =
        seoaudit::analyzer::ScoreCalculator::score(&PageMetrics::default(), &ScoringWeights::empty());
    assert_eq!(result.overall_score, FALLBACK_SCORE);
    assert!(result.factors.iter().all(|f| f.weight == 0.0));
}

#[test]
fn directory_without_json_is_empty() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a crawl").unwrap();
    assert!(load_pages(dir.path()).unwrap().is_empty());
}

#[test]
fn tool_files_in_directory_are_skipped() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("page.json"), "{}").unwrap();
    std::fs::write(dir.path().join(".seoauditrc.json"), "{}").unwrap();
    std::fs::write(dir.path().join(".seoaudit-history.json"), "{\"runs\": []}").unwrap();
    assert_eq!(load_pages(dir.path()).unwrap().len(), 1);
}

#[test]
fn reader_input_gets_stdin_keys() {
    let pages = load_reader(r#"[{}, {"url": "https://a.test/"}]"#.as_bytes()).unwrap();
    assert_eq!(pages[0].key, "stdin#0");
    assert_eq!(pages[1].key, "https://a.test/");
    assert!(pages[0].source.is_none());
}

#[test]
fn aggregate_of_nothing_is_zero() {
    let stats = AuditEngine::aggregate_stats(&[]);
    assert_eq!(stats.pages_audited, 0);
    assert!(stats.grade_distribution.is_empty());
}
