//! Page-Harvest main entry point
//!
//! This is the command-line interface for the Page-Harvest crawler.

use anyhow::{bail, Context};
use clap::Parser;
use page_harvest::config::{load_config_with_hash, Config};
use page_harvest::crawler::{Crawler, ExtractionMode};
use page_harvest::output::{crawl_report, print_statistics, summarize, to_rows, write_csv};
use page_harvest::url::ensure_scheme;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Page-Harvest: a breadth-first same-domain web crawler
///
/// Crawls pages reachable from URL on the same host, extracts the requested
/// data from each, and prints a JSON report.
#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(version)]
#[command(about = "A breadth-first same-domain web crawler", long_about = None)]
struct Cli {
    /// Start URL (https:// is assumed when no scheme is given)
    #[arg(value_name = "URL")]
    url: String,

    /// What to extract: links, images, text, metadata or analysis
    #[arg(short, long, default_value = "links")]
    mode: String,

    /// Maximum link hops from the start URL
    #[arg(short, long)]
    depth: Option<u32>,

    /// Maximum number of pages to visit
    #[arg(long)]
    max_pages: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Pause between pages in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Print summary statistics instead of the JSON report (analysis mode only)
    #[arg(long)]
    stats: bool,

    /// Write analysis rows as CSV to FILE (analysis mode only)
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,

    /// Scrape only URL, extracting PATTERN (CSS selector or regex)
    #[arg(long, value_name = "PATTERN", conflicts_with_all = ["stats", "csv"])]
    scrape: Option<String>,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long, conflicts_with = "scrape")]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    let mode: ExtractionMode = cli.mode.parse()?;
    let url = ensure_scheme(&cli.url);

    if (cli.stats || cli.csv.is_some()) && mode != ExtractionMode::Analysis {
        bail!("--stats and --csv require --mode analysis (got {})", mode);
    }

    if cli.dry_run {
        handle_dry_run(&config, &url, mode);
        return Ok(());
    }

    let crawler = Crawler::from_config(&config);

    if let Some(pattern) = &cli.scrape {
        let outcome = crawler.scrape(&url, Some(pattern)).await?;
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }

    handle_crawl(&crawler, &url, mode, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("page_harvest=info,warn"),
            1 => EnvFilter::new("page_harvest=debug,info"),
            2 => EnvFilter::new("page_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(depth) = cli.depth {
        config.crawler.depth_limit = depth;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_seconds = timeout;
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.crawler.politeness_delay_ms = delay_ms;
    }

    page_harvest::config::validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective settings
fn handle_dry_run(config: &Config, url: &str, mode: ExtractionMode) {
    println!("=== Page-Harvest Dry Run ===\n");

    println!("Start URL: {}", url);
    println!("Mode: {}", mode);

    println!("\nCrawler Configuration:");
    println!("  Depth limit: {}", config.crawler.depth_limit);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay_ms);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    crawler: &Crawler,
    url: &str,
    mode: ExtractionMode,
    cli: &Cli,
) -> anyhow::Result<()> {
    let report = crawl_report(crawler, url, mode).await.with_stats();

    let Some(results) = report.results() else {
        println!("{}", serde_json::to_string_pretty(&report)?);
        bail!("Crawl failed");
    };

    if cli.stats {
        print_statistics(&summarize(results.analyses()));
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if let Some(path) = &cli.csv {
        let rows = to_rows(results.analyses());
        let file = File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(&rows, file)?;
        tracing::info!("Wrote {} rows to {}", rows.len(), path.display());
    }

    Ok(())
}
