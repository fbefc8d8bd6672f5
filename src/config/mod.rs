//! Configuration loading for seoaudit

mod schema;

pub use schema::{
    url_path, CacheConfig, Config, ConfigOverride, EffectiveConfig, PageSpeedConfig,
    RuleSeverity, Strategy, TrendsConfig, UrlMatcher, DEFAULT_CACHE_TTL_SECONDS,
};

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = ".seoauditrc.json";

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if path.exists() {
            Some(path)
        } else {
            anyhow::bail!("Config file not found: {}", path.display());
        }
    } else {
        find_config_in_parents(work_dir)
    };

    let config = match path {
        Some(path) => {
            log::debug!("loading config from {}", path.display());
            load_config_with_extends(&path, &mut HashSet::new())?
        }
        None => {
            log::debug!("no {} found, using defaults", CONFIG_FILENAME);
            Config::default()
        }
    };

    validate(&config)?;
    Ok(config)
}

/// Reject patterns and values that would otherwise be silently skipped
fn validate(config: &Config) -> Result<()> {
    UrlMatcher::new(&config.ignore).context("Invalid ignore pattern in config")?;
    for override_cfg in &config.overrides {
        UrlMatcher::new(&override_cfg.urls).context("Invalid override pattern in config")?;
    }
    if let Some(threshold) = config.threshold {
        if !(0.0..=100.0).contains(&threshold) {
            anyhow::bail!("Config threshold must be between 0 and 100, got {}", threshold);
        }
    }
    for (factor, weight) in &config.weights {
        if !weight.is_finite() || !(0.0..=1.0).contains(weight) {
            anyhow::bail!(
                "Config weight for '{}' must be between 0 and 1, got {}",
                factor,
                weight
            );
        }
    }
    Ok(())
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(config_path: &Path, visited: &mut HashSet<PathBuf>) -> Result<Config> {
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        anyhow::bail!(
            "Circular extends detected in config: {}",
            config_path.display()
        );
    }

    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
    let mut config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Invalid JSON in config: {}", config_path.display()))?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference relative to the config that names it
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));
    let extends_path = config_dir.join(extends);

    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        anyhow::bail!(
            "Extended config not found: {} (referenced from {})",
            extends_path.display(),
            config_path.display()
        );
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .seoauditrc.json in directory and its parents
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.exists())
}

/// Find the project root directory (containing .git or a config file)
pub fn find_project_root(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|dir| dir.join(".git").exists() || dir.join(CONFIG_FILENAME).exists())
        .map(Path::to_path_buf)
}

/// Starter config written by `seoaudit init`
pub fn starter_config(threshold: f64) -> Config {
    Config {
        threshold: Some(threshold),
        rules: [
            ("canonical-mismatch".to_string(), RuleSeverity::Warning),
            ("title-length".to_string(), RuleSeverity::Warning),
        ]
        .into_iter()
        .collect(),
        ignore: vec!["/admin/**".to_string(), "/cart/**".to_string()],
        overrides: vec![ConfigOverride {
            urls: vec!["/blog/archive/**".to_string()],
            threshold: Some((threshold - 20.0).max(0.0)),
            rules: Default::default(),
        }],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        let mut file = fs::File::create(path).unwrap();
        writeln!(file, "{}", content).unwrap();
    }

    #[test]
    fn missing_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();
        // A config above the temp dir would be found; only assert on a fresh tree
        if find_config_in_parents(&nested).is_none() {
            assert_eq!(load_config(&nested, None).unwrap(), Config::default());
        }
    }

    #[test]
    fn config_found_in_parent() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(CONFIG_FILENAME), r#"{ "threshold": 65 }"#);
        let nested = dir.path().join("site/pages");
        fs::create_dir_all(&nested).unwrap();

        let config = load_config(&nested, None).unwrap();
        assert_eq!(config.threshold, Some(65.0));
        assert_eq!(find_project_root(&nested).as_deref(), Some(dir.path()));
    }

    #[test]
    fn config_extends() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join("base.json"),
            r#"{
                "threshold": 70,
                "rules": { "title-length": "off" },
                "ignore": ["/admin/**"]
            }"#,
        );
        write(
            &dir.path().join(CONFIG_FILENAME),
            r#"{
                "extends": "./base",
                "threshold": 80,
                "rules": { "missing-h1": "warning" }
            }"#,
        );

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.threshold, Some(80.0));
        assert!(config.rules.contains_key("missing-h1"));
        assert!(config.rules.contains_key("title-length"));
        assert!(config.ignore.contains(&"/admin/**".to_string()));
    }

    #[test]
    fn circular_extends_rejected() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join("a.json"), r#"{ "extends": "./b.json" }"#);
        write(&dir.path().join("b.json"), r#"{ "extends": "./a.json" }"#);

        let err = load_config(dir.path(), Some(Path::new("a.json"))).unwrap_err();
        assert!(err.to_string().contains("Circular extends"));
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let err = load_config(dir.path(), Some(Path::new("nope.json"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn invalid_ignore_pattern_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(CONFIG_FILENAME), r#"{ "ignore": ["["] }"#);
        let err = load_config(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("Invalid ignore pattern"));
    }

    #[test]
    fn out_of_range_threshold_is_an_error() {
        let dir = TempDir::new().unwrap();
        write(&dir.path().join(CONFIG_FILENAME), r#"{ "threshold": 140 }"#);
        assert!(load_config(dir.path(), None).is_err());
    }

    #[test]
    fn out_of_range_weights_are_an_error() {
        let dir = TempDir::new().unwrap();
        write(
            &dir.path().join(CONFIG_FILENAME),
            r#"{ "weights": { "title": 1e308, "content": 1e308 } }"#,
        );
        let err = load_config(dir.path(), None).unwrap_err();
        assert!(err.to_string().contains("between 0 and 1"));

        write(&dir.path().join(CONFIG_FILENAME), r#"{ "weights": { "images": -0.5 } }"#);
        assert!(load_config(dir.path(), None).is_err());

        write(&dir.path().join(CONFIG_FILENAME), r#"{ "weights": { "images": 0.5 } }"#);
        assert!(load_config(dir.path(), None).is_ok());
    }

    #[test]
    fn starter_config_round_trips() {
        let config = starter_config(70.0);
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
        assert_eq!(parsed.overrides[0].threshold, Some(50.0));
    }
}
