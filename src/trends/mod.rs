//! Google Trends enrichment
//!
//! Parses Google Trends results returned by SerpAPI for a page's top
//! keywords and turns them into content recommendations. Fetching lives in
//! [`client`] and needs the `trends` feature.

pub mod client;

pub use crate::config::TrendsConfig;
pub use client::{is_trends_available, TrendsClient};

use crate::{Priority, Recommendation};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Region used when the config names none
pub const DEFAULT_REGION: &str = "US";
/// Date range used when the config names none
pub const DEFAULT_TIMEFRAME: &str = "today 12-m";
/// Keywords looked up per page
pub const MAX_KEYWORDS_PER_PAGE: usize = 3;

/// Second-half mean above first-half mean times this is rising
const RISING_RATIO: f64 = 1.1;
/// Second-half mean below first-half mean times this is falling
const FALLING_RATIO: f64 = 0.9;
/// Points at or above this share of the maximum are peaks
const PEAK_RATIO: f64 = 0.8;
const MAX_RISING_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Rising,
    #[default]
    Stable,
    Falling,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendDirection::Rising => "rising",
            TrendDirection::Stable => "stable",
            TrendDirection::Falling => "falling",
        }
    }

    /// Compare the mean of the second half of the series with the first.
    /// Fewer than two values is stable.
    pub fn from_values(values: &[f64]) -> Self {
        if values.len() < 2 {
            return TrendDirection::Stable;
        }
        let (first, second) = values.split_at(values.len() / 2);
        let first_avg = mean(first);
        let second_avg = mean(second);
        if second_avg > first_avg * RISING_RATIO {
            TrendDirection::Rising
        } else if second_avg < first_avg * FALLING_RATIO {
            TrendDirection::Falling
        } else {
            TrendDirection::Stable
        }
    }
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One point of the interest-over-time series (0-100)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePoint {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedTopic {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A related search. `value` is the display text ("100", "+250%",
/// "Breakout"); `extracted_value` its number when one exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedQuery {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted_value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakPeriod {
    pub date: String,
    pub value: f64,
    /// Position in the interest-over-time series
    pub index: usize,
}

/// Google Trends data for one keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsReport {
    pub keyword: String,
    pub region: String,
    pub timeframe: String,
    pub interest_over_time: Vec<TimelinePoint>,
    /// Top topics followed by rising ones
    pub related_topics: Vec<RelatedTopic>,
    pub related_queries: Vec<RelatedQuery>,
    pub rising_queries: Vec<RelatedQuery>,
    pub average_interest: f64,
    pub direction: TrendDirection,
    pub peak_periods: Vec<PeakPeriod>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Number or numeric string; SerpAPI uses both
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Display text for a number or string value
fn display(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Interest value of a timeline entry: a plain `value`, or the first
/// query's `extracted_value` in the `values` list
fn point_value(item: &Value) -> Option<f64> {
    number(&item["value"]).or_else(|| {
        let first = &item["values"][0];
        number(&first["extracted_value"]).or_else(|| number(&first["value"]))
    })
}

fn items(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or_default()
}

fn related_query(item: &Value) -> Option<RelatedQuery> {
    let query = item["query"].as_str()?.to_string();
    Some(RelatedQuery {
        query,
        value: display(&item["value"]),
        extracted_value: number(&item["extracted_value"]),
    })
}

fn related_topic(item: &Value) -> Option<RelatedTopic> {
    let topic = &item["topic"];
    let title = topic["title"]
        .as_str()
        .or_else(|| item["title"].as_str())?
        .to_string();
    Some(RelatedTopic {
        title,
        kind: topic["type"].as_str().map(str::to_string),
        value: display(&item["value"]),
    })
}

impl TrendsReport {
    /// Build a report from a raw SerpAPI `google_trends` response. Missing
    /// sections leave the corresponding fields empty.
    pub fn from_response(response: &Value, keyword: &str, settings: &TrendsConfig) -> Self {
        let timeline = &response["interest_over_time"]["timeline_data"];
        let interest_over_time: Vec<TimelinePoint> = items(timeline)
            .iter()
            .map(|item| TimelinePoint {
                date: item["date"].as_str().unwrap_or_default().to_string(),
                value: point_value(item),
            })
            .collect();

        let topics = &response["related_topics"];
        let related_topics = items(&topics["top"])
            .iter()
            .chain(items(&topics["rising"]))
            .filter_map(related_topic)
            .collect();

        let queries = &response["related_queries"];
        let related_queries = items(&queries["top"])
            .iter()
            .filter_map(related_query)
            .collect();
        let rising_queries = items(&queries["rising"])
            .iter()
            .filter_map(related_query)
            .collect();

        let values: Vec<f64> = interest_over_time.iter().filter_map(|p| p.value).collect();
        let peak_periods = peaks(&interest_over_time, &values);

        Self {
            keyword: keyword.to_string(),
            region: settings.region.clone(),
            timeframe: settings.timeframe.clone(),
            average_interest: mean(&values),
            direction: TrendDirection::from_values(&values),
            peak_periods,
            interest_over_time,
            related_topics,
            related_queries,
            rising_queries,
        }
    }

    /// How promising fresh content for this keyword is, 0.0-1.0
    pub fn content_potential(&self) -> f64 {
        let mut potential = 0.0;
        if self.average_interest > 0.0 {
            potential += (self.average_interest / 100.0).min(0.4);
        }
        potential += match self.direction {
            TrendDirection::Rising => 0.3,
            TrendDirection::Stable => 0.1,
            TrendDirection::Falling => 0.0,
        };
        potential += (self.related_queries.len() as f64 / 20.0).min(0.2);
        potential += (self.rising_queries.len() as f64 / 10.0).min(0.1);
        potential.min(1.0)
    }

    /// Advice on timing content around the interest peaks
    pub fn seasonal_advice(&self) -> &'static str {
        match self.peak_periods.len() {
            0 => "Consistent interest throughout the period. Suitable for evergreen content.",
            1 | 2 => "Some seasonal variation detected. Consider timing content for peak periods.",
            _ => "Strong seasonal pattern detected. Plan content calendar around peak periods.",
        }
    }

    /// Suggested next step for this keyword and its priority
    pub fn recommended_action(&self) -> (Priority, String) {
        let potential = self.content_potential();
        let keyword = &self.keyword;
        match self.direction {
            TrendDirection::Rising if potential > 0.7 => (
                Priority::High,
                format!("Create comprehensive content for '{}' to capture rising interest", keyword),
            ),
            TrendDirection::Rising if potential > 0.4 => (
                Priority::Medium,
                format!("Optimize existing content for '{}' or create targeted pieces", keyword),
            ),
            TrendDirection::Stable if potential > 0.6 => (
                Priority::Medium,
                format!("Develop authoritative evergreen content for '{}'", keyword),
            ),
            TrendDirection::Falling => (
                Priority::Low,
                format!("Monitor '{}' for a comeback or pivot to related terms", keyword),
            ),
            _ => (
                Priority::Low,
                format!("Investigate '{}' further before investing in content", keyword),
            ),
        }
    }
}

fn peaks(points: &[TimelinePoint], values: &[f64]) -> Vec<PeakPeriod> {
    let max = values.iter().copied().fold(0.0, f64::max);
    if max <= 0.0 {
        return Vec::new();
    }
    let threshold = max * PEAK_RATIO;
    points
        .iter()
        .enumerate()
        .filter_map(|(index, point)| {
            let value = point.value.filter(|v| *v >= threshold)?;
            Some(PeakPeriod {
                date: point.date.clone(),
                value,
                index,
            })
        })
        .collect()
}

fn rec(category: &str, priority: Priority, issue: String, recommendation: String) -> Recommendation {
    Recommendation {
        category: category.to_string(),
        priority,
        issue,
        recommendation,
    }
}

/// Recommendations for one keyword's trend report, most urgent first
pub fn trend_recommendations(report: &TrendsReport) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    let (priority, action) = report.recommended_action();
    recs.push(rec(
        "Keyword Trends",
        priority,
        format!(
            "Interest in '{}' is {} (average {:.0}/100, potential {:.2})",
            report.keyword,
            report.direction,
            report.average_interest,
            report.content_potential()
        ),
        action,
    ));

    for query in report.rising_queries.iter().take(MAX_RISING_SUGGESTIONS) {
        let growth = query
            .value
            .as_deref()
            .map(|v| format!(" ({})", v))
            .unwrap_or_default();
        recs.push(rec(
            "Content Opportunity",
            Priority::Medium,
            format!("Rising query related to '{}': {}{}", report.keyword, query.query, growth),
            format!("Consider a section or article targeting '{}'", query.query),
        ));
    }

    if !report.peak_periods.is_empty() {
        recs.push(rec(
            "Seasonality",
            Priority::Low,
            format!(
                "'{}' peaks in {} of {} periods",
                report.keyword,
                report.peak_periods.len(),
                report.interest_over_time.len()
            ),
            report.seasonal_advice().to_string(),
        ));
    }

    recs.sort_by_key(|r| r.priority);
    recs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn timeline(values: &[f64]) -> Value {
        let data: Vec<Value> = values
            .iter()
            .enumerate()
            .map(|(i, v)| json!({ "date": format!("week {}", i + 1), "value": v }))
            .collect();
        json!({ "interest_over_time": { "timeline_data": data } })
    }

    fn sample_response() -> Value {
        json!({
            "search_metadata": { "status": "Success" },
            "interest_over_time": {
                "timeline_data": [
                    { "date": "Jan 2026", "values": [{ "query": "raku firing", "value": "20", "extracted_value": 20 }] },
                    { "date": "Feb 2026", "values": [{ "query": "raku firing", "value": "30", "extracted_value": 30 }] },
                    { "date": "Mar 2026", "values": [{ "query": "raku firing", "value": "80", "extracted_value": 80 }] },
                    { "date": "Apr 2026", "values": [{ "query": "raku firing", "value": "100", "extracted_value": 100 }] }
                ]
            },
            "related_topics": {
                "top": [{ "topic": { "title": "Raku", "type": "Pottery technique" }, "value": "100" }],
                "rising": [{ "topic": { "title": "Pit firing", "type": "Topic" }, "value": "Breakout" }]
            },
            "related_queries": {
                "top": [
                    { "query": "raku kiln", "value": "100", "extracted_value": 100 },
                    { "query": "raku glaze", "value": "64", "extracted_value": 64 }
                ],
                "rising": [
                    { "query": "diy raku kiln", "value": "+250%", "extracted_value": 250 },
                    { "query": "raku horsehair", "value": "Breakout", "extracted_value": 5000 }
                ]
            }
        })
    }

    #[test]
    fn parses_timeline_topics_and_queries() {
        let report =
            TrendsReport::from_response(&sample_response(), "raku firing", &TrendsConfig::default());
        assert_eq!(report.keyword, "raku firing");
        assert_eq!(report.region, "US");
        assert_eq!(report.timeframe, "today 12-m");
        assert_eq!(report.interest_over_time.len(), 4);
        assert_eq!(report.interest_over_time[2].value, Some(80.0));
        assert_eq!(report.average_interest, 57.5);

        let topics: Vec<_> = report.related_topics.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(topics, vec!["Raku", "Pit firing"]);
        assert_eq!(report.related_topics[1].value.as_deref(), Some("Breakout"));

        assert_eq!(report.related_queries.len(), 2);
        assert_eq!(report.rising_queries[0].query, "diy raku kiln");
        assert_eq!(report.rising_queries[0].value.as_deref(), Some("+250%"));
        assert_eq!(report.rising_queries[1].extracted_value, Some(5000.0));
    }

    #[test]
    fn direction_peaks_and_potential() {
        let report =
            TrendsReport::from_response(&sample_response(), "raku firing", &TrendsConfig::default());
        // first half 25, second half 90
        assert_eq!(report.direction, TrendDirection::Rising);
        let peaks: Vec<_> = report.peak_periods.iter().map(|p| (p.index, p.value)).collect();
        assert_eq!(peaks, vec![(2, 80.0), (3, 100.0)]);
        // 0.4 + 0.3 + 2/20 + 2/10 capped at 0.1
        assert!((report.content_potential() - 0.9).abs() < 1e-9);
        assert_eq!(report.recommended_action().0, Priority::High);
    }

    #[test]
    fn direction_thresholds() {
        assert_eq!(TrendDirection::from_values(&[]), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_values(&[50.0]), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_values(&[50.0, 55.0]), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_values(&[50.0, 56.0]), TrendDirection::Rising);
        assert_eq!(TrendDirection::from_values(&[50.0, 44.0]), TrendDirection::Falling);
        assert_eq!(TrendDirection::from_values(&[0.0, 0.0]), TrendDirection::Stable);
        assert_eq!(TrendDirection::from_values(&[0.0, 1.0]), TrendDirection::Rising);
    }

    #[test]
    fn plain_values_and_gaps() {
        let mut response = timeline(&[10.0, 10.0, 10.0]);
        response["interest_over_time"]["timeline_data"][1] = json!({ "date": "week 2" });
        let report = TrendsReport::from_response(&response, "kiln", &TrendsConfig::default());
        assert_eq!(report.interest_over_time[1].value, None);
        assert_eq!(report.average_interest, 10.0);
        let indexes: Vec<_> = report.peak_periods.iter().map(|p| p.index).collect();
        assert_eq!(indexes, vec![0, 2]);
        assert!(report.seasonal_advice().starts_with("Some seasonal variation"));
    }

    #[test]
    fn empty_response_yields_empty_report() {
        let settings = TrendsConfig {
            region: "GB".to_string(),
            timeframe: "today 3-m".to_string(),
        };
        let report = TrendsReport::from_response(&json!({}), "kiln", &settings);
        assert_eq!(report.region, "GB");
        assert!(report.interest_over_time.is_empty());
        assert!(report.related_topics.is_empty());
        assert!(report.peak_periods.is_empty());
        assert_eq!(report.average_interest, 0.0);
        assert_eq!(report.direction, TrendDirection::Stable);
        assert!((report.content_potential() - 0.1).abs() < 1e-9);
        assert!(report.seasonal_advice().contains("evergreen"));

        let recs = trend_recommendations(&report);
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].priority, Priority::Low);
        assert!(recs[0].recommendation.contains("Investigate 'kiln'"));
    }

    #[test]
    fn zero_interest_has_no_peaks() {
        let response = timeline(&[0.0, 0.0, 0.0]);
        let report = TrendsReport::from_response(&response, "kiln", &TrendsConfig::default());
        assert!(report.peak_periods.is_empty());
    }

    #[test]
    fn falling_keyword_is_low_priority() {
        let response = timeline(&[90.0, 80.0, 30.0, 20.0]);
        let report = TrendsReport::from_response(&response, "kiln", &TrendsConfig::default());
        assert_eq!(report.direction, TrendDirection::Falling);
        let (priority, action) = report.recommended_action();
        assert_eq!(priority, Priority::Low);
        assert!(action.starts_with("Monitor 'kiln'"));
    }

    #[test]
    fn recommendations_list_rising_queries_and_seasonality() {
        let report =
            TrendsReport::from_response(&sample_response(), "raku firing", &TrendsConfig::default());
        let recs = trend_recommendations(&report);
        let categories: Vec<_> = recs.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(
            categories,
            vec!["Keyword Trends", "Content Opportunity", "Content Opportunity", "Seasonality"]
        );
        assert!(recs[1].issue.contains("diy raku kiln (+250%)"));
        assert!(recs[3].issue.contains("peaks in 2 of 4 periods"));
    }
}
