//! seoaudit: SEO scoring CLI for crawled pages

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use seoaudit::analyzer::AuditEngine;
use seoaudit::cache::AuditCache;
use seoaudit::config::{find_project_root, load_config, starter_config, Config, CONFIG_FILENAME};
use seoaudit::history::{append_run, load_history, previous_score, save_history};
use seoaudit::metrics::{load_pages, load_reader, LoadedPage};
use seoaudit::pagespeed::{is_pagespeed_available, PageSpeedClient};
use seoaudit::reporter::{ConsoleReporter, CsvReporter, HtmlReporter, JsonReporter};
use seoaudit::trends::{is_trends_available, TrendsClient};
use seoaudit::AuditResult;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// seoaudit: weighted SEO scoring for crawled pages
#[derive(Parser, Debug)]
#[command(name = "seoaudit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Page metrics JSON file, directory of JSON files, or `-` for stdin
    #[arg(required = true)]
    path: Option<PathBuf>,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Write a static HTML report to FILE
    #[arg(long, value_name = "FILE")]
    html: Option<PathBuf>,

    /// Output as CSV
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Minimum score threshold (exit 1 if below)
    #[arg(long, short)]
    threshold: Option<f64>,

    /// Quiet mode (one line per page)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Path to config file (default: search .seoauditrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable caching (re-score every page)
    #[arg(long)]
    no_cache: bool,

    /// Clear the audit cache before running
    #[arg(long)]
    clear_cache: bool,

    /// Number of parallel threads (default: number of CPU cores)
    #[arg(long, value_name = "N")]
    jobs: Option<usize>,

    /// Fetch PageSpeed Insights data for pages with an http(s) URL
    #[arg(long)]
    pagespeed: bool,

    /// Look up Google Trends (SerpAPI, needs SERPAPI_KEY) for each page's top keywords
    #[arg(long)]
    trends: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .seoauditrc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<f64>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("SEOAUDIT_LOG", "warn"))
        .format_timestamp(None)
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if let Some(Commands::Init { threshold, dir }) = args.command {
        return run_init(threshold, dir.as_deref());
    }

    let path = args
        .path
        .clone()
        .context("a path is required when not using a subcommand")?;
    let from_stdin = path.as_os_str() == "-";
    if !from_stdin && !path.exists() {
        anyhow::bail!("Path not found: {}", path.display());
    }

    // Resolve work directory for config search
    let work_dir = if from_stdin {
        PathBuf::from(".")
    } else if path.is_file() {
        path.parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."))
            .to_path_buf()
    } else {
        path.clone()
    };

    // Load config (CLI flags override config file)
    let config = load_config(&work_dir, args.config.as_deref())?.merge_with_cli(args.threshold);
    if let Some(threshold) = config.threshold {
        if !(0.0..=100.0).contains(&threshold) {
            anyhow::bail!("threshold must be between 0 and 100, got {}", threshold);
        }
    }

    let pages: Vec<LoadedPage> = if from_stdin {
        load_reader(std::io::stdin().lock()).context("Failed to read pages from stdin")?
    } else {
        load_pages(&path)?
    };

    if pages.is_empty() {
        eprintln!("{}: No pages found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    // Set up cache
    let project_root = find_project_root(&work_dir).unwrap_or_else(|| work_dir.clone());
    let mut cache = if args.no_cache {
        AuditCache::disabled()
    } else {
        AuditCache::new(&project_root).with_ttl(config.cache.ttl_seconds)
    };

    if args.clear_cache {
        cache.clear();
        if !args.quiet {
            eprintln!("{}: Cache cleared", "Info".blue());
        }
    }
    cache.prune_expired();

    if let Some(jobs) = args.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let mut engine = AuditEngine::new();
    if args.pagespeed {
        if is_pagespeed_available() {
            engine = engine.with_pagespeed(PageSpeedClient::from_env());
        } else {
            eprintln!(
                "{}: --pagespeed needs a build with `--features pagespeed`; continuing without it",
                "Warning".yellow()
            );
        }
    }

    if args.trends {
        let client = TrendsClient::from_env();
        if !is_trends_available() {
            eprintln!(
                "{}: --trends needs a build with `--features trends`; continuing without it",
                "Warning".yellow()
            );
        } else if !client.has_key() {
            eprintln!(
                "{}: --trends needs SERPAPI_KEY; continuing without it",
                "Warning".yellow()
            );
        } else {
            engine = engine.with_trends(client);
        }
    }

    let results = engine.audit_pages_cached(&pages, &config, &mut cache);

    if args.verbose && cache.is_enabled() {
        let stats = cache.stats();
        eprintln!("{}: {} entries", "Cache".cyan(), stats.entries);
    }
    if let Err(e) = cache.save() {
        if !args.quiet {
            eprintln!("{}: Failed to save cache: {}", "Warning".yellow(), e);
        }
    }

    if results.is_empty() {
        eprintln!("{}: Every page matched an ignore pattern", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let stats = AuditEngine::aggregate_stats(&results);

    // Previous scores come from history before this run is appended
    let mut history = load_history(&project_root);
    let previous: HashMap<String, f64> = results
        .iter()
        .filter_map(|r| previous_score(&history, &r.url).map(|s| (r.url.clone(), s)))
        .collect();

    if let Some(ref html_path) = args.html {
        let html = HtmlReporter::new().report(&results, &stats);
        std::fs::write(html_path, html)
            .with_context(|| format!("Failed to write {}", html_path.display()))?;
        if !args.quiet {
            eprintln!("{}: HTML report written to {}", "Info".blue(), html_path.display());
        }
    }

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if results.len() == 1 {
            println!("{}", reporter.report(&results[0]));
        } else {
            println!("{}", reporter.report_with_summary(&results, &stats));
        }
    } else if args.csv {
        print!("{}", CsvReporter::new().report(&results));
    } else {
        let mut reporter = ConsoleReporter::new().with_previous_scores(previous);
        if args.verbose {
            reporter = reporter.verbose();
        }
        if args.quiet {
            for result in &results {
                reporter.report_quiet(result);
            }
        } else if results.len() == 1 {
            reporter.report(&results[0]);
        } else {
            reporter.report_many(&results, &stats);
        }
    }

    // Persist trend history
    append_run(&mut history, &results);
    if let Err(e) = save_history(&project_root, &history) {
        log::warn!("could not save history: {:#}", e);
    }

    Ok(threshold_exit_code(&results, stats.average_score.value, &config, args.quiet))
}

/// Single page: its own (possibly overridden) threshold; several: the site average
fn threshold_exit_code(
    results: &[AuditResult],
    average: f64,
    config: &Config,
    quiet: bool,
) -> ExitCode {
    let (score, threshold) = match results {
        [single] => (
            single.score.value,
            config.effective_for_url(&single.url).threshold,
        ),
        _ => (average, config.threshold),
    };

    match threshold {
        Some(threshold) if score < threshold => {
            if !quiet {
                eprintln!(
                    "\n{}: Score {:.1} is below threshold {}",
                    "Failed".red().bold(),
                    score,
                    threshold
                );
            }
            ExitCode::from(1)
        }
        _ => ExitCode::SUCCESS,
    }
}

fn run_init(threshold: Option<f64>, dir: Option<&Path>) -> Result<ExitCode> {
    let dir = dir.unwrap_or(Path::new("."));
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::from(2));
    }

    let threshold = threshold.unwrap_or(70.0);
    if !(0.0..=100.0).contains(&threshold) {
        anyhow::bail!("threshold must be between 0 and 100, got {}", threshold);
    }

    let config = starter_config(threshold);
    let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;
    std::fs::write(&config_path, format!("{}\n", json))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    eprintln!("{}: Created {}", "Info".blue(), config_path.display());
    Ok(ExitCode::SUCCESS)
}
