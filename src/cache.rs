//! Audit result caching
//!
//! Caches audit results keyed by page, invalidated when the page metrics or
//! the scoring settings change, or when the entry outlives its TTL.

use crate::config::DEFAULT_CACHE_TTL_SECONDS;
use crate::AuditResult;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const CACHE_VERSION: u32 = 1;
pub const CACHE_FILENAME: &str = ".seoaudit-cache.json";

/// Cache entry for a single page
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    /// SHA256 of the page metrics JSON
    content_hash: String,
    /// SHA256 of the weights and rule settings used
    settings_hash: String,
    result: AuditResult,
    /// Unix seconds when cached
    cached_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheData {
    version: u32,
    /// Page key to entry
    entries: HashMap<String, CacheEntry>,
}

impl Default for CacheData {
    fn default() -> Self {
        Self {
            version: CACHE_VERSION,
            entries: HashMap::new(),
        }
    }
}

/// Cache manager for audit results
pub struct AuditCache {
    cache_path: PathBuf,
    data: CacheData,
    ttl_seconds: u64,
    dirty: bool,
    enabled: bool,
}

impl AuditCache {
    /// Open the cache in the project root
    pub fn new(project_root: &Path) -> Self {
        let cache_path = project_root.join(CACHE_FILENAME);
        let data = Self::load_cache(&cache_path).unwrap_or_default();
        log::debug!(
            "cache {} holds {} entries",
            cache_path.display(),
            data.entries.len()
        );

        Self {
            cache_path,
            data,
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            dirty: false,
            enabled: true,
        }
    }

    /// Create a disabled cache (no-op)
    pub fn disabled() -> Self {
        Self {
            cache_path: PathBuf::new(),
            data: CacheData::default(),
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            dirty: false,
            enabled: false,
        }
    }

    pub fn with_ttl(mut self, ttl_seconds: u64) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    fn load_cache(path: &Path) -> Option<CacheData> {
        let content = fs::read_to_string(path).ok()?;
        let data: CacheData = serde_json::from_str(&content).ok()?;

        if data.version != CACHE_VERSION {
            log::debug!("discarding cache with version {}", data.version);
            return None;
        }

        Some(data)
    }

    /// Save cache to disk
    pub fn save(&self) -> Result<()> {
        if !self.enabled || !self.dirty {
            return Ok(());
        }

        let content =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize cache")?;
        fs::write(&self.cache_path, content)
            .with_context(|| format!("Failed to write cache to {}", self.cache_path.display()))?;

        Ok(())
    }

    pub fn hash_content(content: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Get cached result if still valid
    pub fn get(&self, key: &str, content: &str, settings: &str) -> Option<AuditResult> {
        self.get_at(key, content, settings, Self::now())
    }

    fn get_at(&self, key: &str, content: &str, settings: &str, now: u64) -> Option<AuditResult> {
        if !self.enabled {
            return None;
        }

        let Some(entry) = self.data.entries.get(key) else {
            log::debug!("cache miss for {}", key);
            return None;
        };

        if entry.content_hash != Self::hash_content(content)
            || entry.settings_hash != Self::hash_content(settings)
        {
            log::debug!("cache stale for {}: inputs changed", key);
            return None;
        }

        if now.saturating_sub(entry.cached_at) > self.ttl_seconds {
            log::debug!("cache expired for {}", key);
            return None;
        }

        log::debug!("cache hit for {}", key);
        Some(entry.result.clone())
    }

    /// Store audit result in cache
    pub fn set(&mut self, key: &str, content: &str, settings: &str, result: AuditResult) {
        self.set_at(key, content, settings, result, Self::now());
    }

    fn set_at(&mut self, key: &str, content: &str, settings: &str, result: AuditResult, now: u64) {
        if !self.enabled {
            return;
        }

        let entry = CacheEntry {
            content_hash: Self::hash_content(content),
            settings_hash: Self::hash_content(settings),
            result,
            cached_at: now,
        };

        self.data.entries.insert(key.to_string(), entry);
        self.dirty = true;
    }

    /// Drop entries older than the TTL
    pub fn prune_expired(&mut self) {
        if !self.enabled {
            return;
        }
        let now = Self::now();
        let ttl = self.ttl_seconds;
        let before = self.data.entries.len();
        self.data
            .entries
            .retain(|_, e| now.saturating_sub(e.cached_at) <= ttl);
        if self.data.entries.len() != before {
            self.dirty = true;
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.data.entries.len(),
            enabled: self.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Clear all cached entries
    pub fn clear(&mut self) {
        self.data.entries.clear();
        self.dirty = true;
    }
}

/// Cache statistics
#[derive(Debug)]
pub struct CacheStats {
    pub entries: usize,
    pub enabled: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PageStats, Score, Status};

    fn make_result(url: &str, score: f64) -> AuditResult {
        AuditResult {
            url: url.to_string(),
            source: None,
            score: Score::new(score),
            status: Status::from_score(score),
            factors: vec![],
            issues: vec![],
            recommendations: vec![],
            stats: PageStats {
                word_count: 420,
                ..Default::default()
            },
            performance: None,
            trends: Vec::new(),
        }
    }

    const URL: &str = "https://example.com/";
    const URL_B: &str = "https://example.com/b";

    #[test]
    fn disabled_cache_is_noop() {
        let mut cache = AuditCache::disabled();
        cache.set(URL, "{}", "w", make_result(URL, 80.0));
        assert!(cache.get(URL, "{}", "w").is_none());
        assert!(!cache.dirty);
        assert!(!cache.stats().enabled);
    }

    #[test]
    fn hit_for_same_inputs() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cache = AuditCache::new(dir.path());
        cache.set(URL, r#"{"title":"x"}"#, "weights", make_result(URL, 85.5));

        let cached = cache.get(URL, r#"{"title":"x"}"#, "weights").unwrap();
        assert_eq!(cached.score.value, 85.5);
        assert_eq!(cached.stats.word_count, 420);
    }

    #[test]
    fn miss_when_metrics_or_settings_change() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cache = AuditCache::new(dir.path());
        cache.set(URL, "a", "weights", make_result(URL, 85.0));

        assert!(cache.get(URL, "b", "weights").is_none());
        assert!(cache.get(URL, "a", "other weights").is_none());
        assert!(cache.get("https://example.com/other", "a", "weights").is_none());
    }

    #[test]
    fn expires_after_ttl() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cache = AuditCache::new(dir.path()).with_ttl(60);
        cache.set_at(URL, "a", "w", make_result(URL, 70.0), 1_000);

        assert!(cache.get_at(URL, "a", "w", 1_060).is_some());
        assert!(cache.get_at(URL, "a", "w", 1_061).is_none());
    }

    #[test]
    fn prune_removes_expired_entries() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cache = AuditCache::new(dir.path()).with_ttl(60);
        cache.set_at(URL, "a", "w", make_result(URL, 70.0), 0);
        cache.set(URL_B, "b", "w", make_result(URL_B, 70.0));
        cache.prune_expired();
        assert_eq!(cache.stats().entries, 1);
    }

    #[test]
    fn persists_across_save_and_load() {
        let dir = tempfile::TempDir::new().unwrap();
        {
            let mut cache = AuditCache::new(dir.path());
            cache.set(URL, "content", "w", make_result(URL, 91.0));
            cache.save().unwrap();
        }
        let cache = AuditCache::new(dir.path());
        assert_eq!(cache.get(URL, "content", "w").unwrap().score.value, 91.0);
    }

    #[test]
    fn corrupt_cache_file_is_ignored() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join(CACHE_FILENAME), "{not json").unwrap();
        let cache = AuditCache::new(dir.path());
        assert_eq!(cache.stats().entries, 0);
    }

    #[test]
    fn clear_empties_cache() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut cache = AuditCache::new(dir.path());
        cache.set(URL, "content", "w", make_result(URL, 91.0));
        cache.clear();
        assert_eq!(cache.stats().entries, 0);
        assert!(cache.get(URL, "content", "w").is_none());
    }
}
