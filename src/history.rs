//! Trend tracking - persist page scores to .seoaudit-history.json

use crate::AuditResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub const HISTORY_FILENAME: &str = ".seoaudit-history.json";
const MAX_RUNS: usize = 50;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct HistoryFile {
    pub runs: Vec<HistoryRun>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryRun {
    pub timestamp: String,
    pub pages: HashMap<String, PageScore>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageScore {
    pub score: f64,
    pub issues: usize,
}

/// Load history from project root (or create empty)
pub fn load_history(project_root: &Path) -> HistoryFile {
    let path = project_root.join(HISTORY_FILENAME);
    let Ok(content) = fs::read_to_string(&path) else {
        return HistoryFile::default();
    };
    serde_json::from_str(&content).unwrap_or_else(|e| {
        log::warn!("ignoring unreadable history {}: {}", path.display(), e);
        HistoryFile::default()
    })
}

/// Save history to project root
pub fn save_history(project_root: &Path, history: &HistoryFile) -> anyhow::Result<()> {
    let path = project_root.join(HISTORY_FILENAME);
    let content = serde_json::to_string_pretty(history)?;
    fs::write(path, content)?;
    Ok(())
}

/// Previous score for a page from the latest run
pub fn previous_score(history: &HistoryFile, key: &str) -> Option<f64> {
    let run = history.runs.last()?;
    run.pages.get(key).map(|p| p.score)
}

/// Build a new run from audit results and append to history
pub fn append_run(history: &mut HistoryFile, results: &[AuditResult]) {
    let pages = results
        .iter()
        .map(|r| {
            (
                r.url.clone(),
                PageScore {
                    score: r.score.value,
                    issues: r.issues.len(),
                },
            )
        })
        .collect();
    history.runs.push(HistoryRun {
        timestamp: chrono::Utc::now().to_rfc3339(),
        pages,
    });
    if history.runs.len() > MAX_RUNS {
        history.runs.drain(0..history.runs.len() - MAX_RUNS);
    }
}

/// Format delta for console: "[was 82.0, down 4.5]", "[was 82.0, up 2.0]" or ""
pub fn format_delta(previous: Option<f64>, current: f64) -> String {
    let Some(prev) = previous else {
        return String::new();
    };
    let diff = crate::round1(current - prev);
    if diff == 0.0 {
        return format!(" [unchanged at {:.1}]", current);
    }
    if diff > 0.0 {
        format!(" [was {:.1}, up {:.1}]", prev, diff)
    } else {
        format!(" [was {:.1}, down {:.1}]", prev, -diff)
    }
}
