//! Loading crawler output from JSON files, directories and stdin

use super::PageMetrics;
use crate::error::{AuditError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A page together with where it came from
#[derive(Debug, Clone)]
pub struct LoadedPage {
    /// URL, or `<file>#<index>` when the crawl did not record one
    pub key: String,
    pub source: Option<PathBuf>,
    /// Raw JSON text of this page, used as the cache fingerprint
    pub fingerprint: String,
    pub metrics: PageMetrics,
}

#[derive(Deserialize)]
struct CrawlExport {
    pages: Vec<PageMetrics>,
}

/// Parse JSON holding one page, an array of pages, or `{"pages": [...]}`
pub fn parse_pages(content: &str, origin: &str) -> Result<Vec<PageMetrics>> {
    let value: Value = serde_json::from_str(content).map_err(|e| AuditError::json(origin, e))?;
    if value.is_array() {
        return serde_json::from_value::<Vec<PageMetrics>>(value)
            .map_err(|e| AuditError::json(origin, e));
    }

    let is_export = value
        .as_object()
        .is_some_and(|map| map.contains_key("pages"));
    if is_export {
        let export: CrawlExport =
            serde_json::from_value(value).map_err(|e| AuditError::json(origin, e))?;
        return Ok(export.pages);
    }

    if value.is_object() {
        let page: PageMetrics =
            serde_json::from_value(value).map_err(|e| AuditError::json(origin, e))?;
        return Ok(vec![page]);
    }

    Err(AuditError::invalid_input(
        origin,
        format!("expected an object or array, found {}", json_kind(&value)),
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn to_loaded(pages: Vec<PageMetrics>, origin: &str, source: Option<&Path>) -> Vec<LoadedPage> {
    pages
        .into_iter()
        .enumerate()
        .map(|(index, metrics)| {
            let key = metrics
                .key()
                .map(str::to_string)
                .unwrap_or_else(|| format!("{}#{}", origin, index));
            let fingerprint = serde_json::to_string(&metrics).unwrap_or_default();
            LoadedPage {
                key,
                source: source.map(Path::to_path_buf),
                fingerprint,
                metrics,
            }
        })
        .collect()
}

/// Load pages from a JSON file
pub fn load_file(path: &Path) -> Result<Vec<LoadedPage>> {
    let content = fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
    let origin = path.display().to_string();
    let pages = parse_pages(&content, &origin)?;
    log::debug!("Loaded {} page(s) from {}", pages.len(), origin);
    Ok(to_loaded(pages, &origin, Some(path)))
}

/// Load pages from a file, or every `*.json` file under a directory (sorted)
pub fn load_pages(path: &Path) -> Result<Vec<LoadedPage>> {
    if !path.is_dir() {
        return load_file(path);
    }

    let mut files: Vec<PathBuf> = WalkDir::new(path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .filter(|p| !is_tool_file(p))
        .collect();
    files.sort();

    let mut pages = Vec::new();
    for file in files {
        pages.extend(load_file(&file)?);
    }
    Ok(pages)
}

/// Our own config, cache and history files live next to crawl output
fn is_tool_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.starts_with(".seoaudit"))
}

/// Load pages from a reader (stdin)
pub fn load_reader(mut reader: impl Read) -> Result<Vec<LoadedPage>> {
    let mut content = String::new();
    reader
        .read_to_string(&mut content)
        .map_err(|e| AuditError::io("<stdin>", e))?;
    let pages = parse_pages(&content, "stdin")?;
    Ok(to_loaded(pages, "stdin", None))
}
