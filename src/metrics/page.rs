//! Page metrics as produced by a crawler, and the facts resolved from them

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// Structural metrics of one crawled page. Every field is optional in the
/// input; absent data resolves to the worst-case default in [`PageFacts`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMetrics {
    pub url: Option<String>,
    pub title: Option<String>,
    #[serde(alias = "meta_description")]
    pub description: Option<String>,
    #[serde(alias = "heading_counts")]
    pub headings: HeadingCounts,
    pub images: Vec<ImageRef>,
    #[serde(alias = "wordcount")]
    pub word_count: u64,
    pub warnings: Vec<String>,
    #[serde(alias = "canonical_url")]
    pub canonical: Option<String>,
    /// Keywords the crawler extracted; used for trend lookups, not scored
    pub keywords: Vec<Keyword>,
}

/// A crawled keyword, either a bare word or `{"word": .., "count": ..}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keyword {
    Word(String),
    Counted { word: String, count: u64 },
}

impl Keyword {
    pub fn word(&self) -> &str {
        match self {
            Keyword::Word(word) | Keyword::Counted { word, .. } => word.trim(),
        }
    }

    /// Occurrences on the page; bare words count as zero
    pub fn count(&self) -> u64 {
        match self {
            Keyword::Word(_) => 0,
            Keyword::Counted { count, .. } => *count,
        }
    }
}

/// An `<img>` found on the page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_alt: Option<bool>,
}

impl ImageRef {
    pub fn with_alt(alt: &str) -> Self {
        Self {
            alt: Some(alt.to_string()),
            ..Self::default()
        }
    }

    pub fn without_alt() -> Self {
        Self::default()
    }

    /// Explicit flag wins; otherwise the alt text must be non-blank
    pub fn has_alt(&self) -> bool {
        self.has_alt.unwrap_or_else(|| {
            self.alt
                .as_deref()
                .map(|a| !a.trim().is_empty())
                .unwrap_or(false)
        })
    }
}

/// Heading counts by level (H1..H6).
///
/// Deserializes from a map of `"h1".."h6"` to either a count or the list of
/// heading texts; unknown keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, HeadingValue>", into = "BTreeMap<String, usize>")]
pub struct HeadingCounts {
    counts: [usize; 6],
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum HeadingValue {
    Count(usize),
    Texts(Vec<String>),
}

impl HeadingValue {
    fn count(&self) -> usize {
        match self {
            HeadingValue::Count(n) => *n,
            HeadingValue::Texts(t) => t.len(),
        }
    }
}

impl HeadingCounts {
    /// Count for a level (1-6); other levels are always zero
    pub fn count(&self, level: usize) -> usize {
        match level {
            1..=6 => self.counts[level - 1],
            _ => 0,
        }
    }

    pub fn with(mut self, level: usize, count: usize) -> Self {
        if (1..=6).contains(&level) {
            self.counts[level - 1] = count;
        }
        self
    }

    pub fn h1(count: usize) -> Self {
        Self::default().with(1, count)
    }
}

impl From<BTreeMap<String, HeadingValue>> for HeadingCounts {
    fn from(map: BTreeMap<String, HeadingValue>) -> Self {
        let mut counts = HeadingCounts::default();
        for (key, value) in map {
            let key = key.to_ascii_lowercase();
            let level = key
                .strip_prefix('h')
                .and_then(|n| n.parse::<usize>().ok())
                .unwrap_or(0);
            counts = counts.with(level, value.count());
        }
        counts
    }
}

impl From<HeadingCounts> for BTreeMap<String, usize> {
    fn from(counts: HeadingCounts) -> Self {
        (1..=6)
            .filter(|level| counts.count(*level) > 0)
            .map(|level| (format!("h{}", level), counts.count(level)))
            .collect()
    }
}

/// Defaults resolved once from [`PageMetrics`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageFacts {
    pub has_title: bool,
    pub title_length: usize,
    pub has_description: bool,
    pub description_length: usize,
    pub h1_count: usize,
    pub image_count: usize,
    pub missing_alt_count: usize,
    pub word_count: u64,
    pub warning_count: usize,
    /// Canonical URL set and pointing somewhere other than the page itself
    pub canonical_mismatch: bool,
    pub canonical: Option<String>,
}

fn missing_alt_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)missing\s+alt").expect("valid regex"))
}

/// Whether a free-text crawler warning reports an image without alt text
pub fn is_missing_alt_warning(warning: &str) -> bool {
    missing_alt_pattern().is_match(warning)
}

fn text_length(text: Option<&str>) -> usize {
    text.map(|t| t.chars().count()).unwrap_or(0)
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty())
}

fn normalize_url(url: &str) -> &str {
    let url = url.trim();
    url.strip_suffix('/').unwrap_or(url)
}

/// Canonical differs from the page URL. Unknown page URL never mismatches.
fn canonical_differs(url: Option<&str>, canonical: Option<&str>) -> bool {
    match (non_blank(url), non_blank(canonical)) {
        (Some(url), Some(canonical)) => normalize_url(url) != normalize_url(canonical),
        _ => false,
    }
}

impl PageMetrics {
    /// Up to `limit` distinct keywords, most frequent first. Ties keep input
    /// order; duplicates are compared case-insensitively.
    pub fn top_keywords(&self, limit: usize) -> Vec<&str> {
        let mut ranked: Vec<&Keyword> = self
            .keywords
            .iter()
            .filter(|k| !k.word().is_empty())
            .collect();
        ranked.sort_by_key(|k| std::cmp::Reverse(k.count()));

        let mut seen = HashSet::new();
        ranked
            .into_iter()
            .map(Keyword::word)
            .filter(|word| seen.insert(word.to_lowercase()))
            .take(limit)
            .collect()
    }

    /// Resolve every optional field to its documented default
    pub fn facts(&self) -> PageFacts {
        let missing_alt_images = self.images.iter().filter(|i| !i.has_alt()).count();
        let missing_alt_warnings = self
            .warnings
            .iter()
            .filter(|w| is_missing_alt_warning(w))
            .count();

        PageFacts {
            has_title: non_blank(self.title.as_deref()).is_some(),
            title_length: text_length(self.title.as_deref()),
            has_description: non_blank(self.description.as_deref()).is_some(),
            description_length: text_length(self.description.as_deref()),
            h1_count: self.headings.count(1),
            image_count: self.images.len(),
            missing_alt_count: missing_alt_images.max(missing_alt_warnings),
            word_count: self.word_count,
            warning_count: self.warnings.len(),
            canonical_mismatch: canonical_differs(self.url.as_deref(), self.canonical.as_deref()),
            canonical: non_blank(self.canonical.as_deref()).map(str::to_string),
        }
    }

    /// Identity used for caching, history and reports
    pub fn key(&self) -> Option<&str> {
        non_blank(self.url.as_deref())
    }
}
