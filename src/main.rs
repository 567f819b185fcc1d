//! Sumi-Scrape main entry point
//!
//! This is the command-line interface for the Sumi-Scrape single-site scraper.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sumi_scrape::config::{compute_config_hash, parse_config, validate_config, Config};
use sumi_scrape::crawler::{run_crawl, CrawlReport};
use sumi_scrape::output::{format_summary, no_data_notice, write_output, OutputFormat};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Sumi-Scrape: a polite single-site scraper
///
/// Fetches a page, extracts records with CSS selectors, optionally follows a
/// "next page" link, and prints the records as text, JSON, or CSV. Command
/// line flags override values from the configuration file.
#[derive(Parser, Debug)]
#[command(name = "sumi-scrape")]
#[command(version = "1.0.0")]
#[command(about = "A polite single-site scraper", long_about = None)]
struct Cli {
    /// Page to start from (overrides [crawl] url)
    #[arg(value_name = "URL")]
    url: Option<String>,

    /// CSS selector for the elements to extract; whole pages when omitted
    #[arg(short, long)]
    selector: Option<String>,

    /// Comma-separated attributes to extract (text, html, href, src, or any attribute name)
    #[arg(short, long, value_delimiter = ',')]
    attributes: Option<Vec<String>>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the output to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// User-Agent header sent with every request
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Base delay between requests in seconds
    #[arg(short, long, value_name = "SECS")]
    delay: Option<f64>,

    /// Upper bound of the random extra delay in seconds
    #[arg(long, value_name = "SECS")]
    jitter: Option<f64>,

    /// Ignore robots.txt
    #[arg(long)]
    no_robots: bool,

    /// Maximum number of pages to fetch
    #[arg(short, long, value_name = "N")]
    pages: Option<u32>,

    /// CSS selector for the "next page" link
    #[arg(short, long, value_name = "SELECTOR")]
    next_page: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything but errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate the configuration and show it without fetching anything
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Layers the command-line flags over a configuration
    fn apply(&self, config: &mut Config) {
        let crawl = &mut config.crawl;
        if let Some(url) = &self.url {
            crawl.url = url.clone();
        }
        if let Some(selector) = &self.selector {
            crawl.selector = Some(selector.clone());
        }
        if let Some(attributes) = &self.attributes {
            crawl.attributes = attributes.iter().map(|a| a.trim().to_string()).collect();
        }
        if let Some(next_page) = &self.next_page {
            crawl.next_page = Some(next_page.clone());
        }
        if let Some(pages) = self.pages {
            crawl.max_pages = pages;
        }
        if let Some(timeout) = self.timeout {
            crawl.timeout_secs = timeout;
        }
        if let Some(delay) = self.delay {
            crawl.delay_secs = delay;
        }
        if let Some(jitter) = self.jitter {
            crawl.jitter_secs = jitter;
        }
        if let Some(user_agent) = &self.user_agent {
            crawl.user_agent = user_agent.clone();
        }
        if self.no_robots {
            crawl.respect_robots = false;
        }

        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
    }

    /// Builds the effective configuration: flags, then file, then defaults
    fn build_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                let config = parse_config(path)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                let hash = compute_config_hash(path)?;
                tracing::info!("Configuration loaded successfully (hash: {})", hash);
                config
            }
            None => {
                let url = self
                    .url
                    .clone()
                    .context("no URL given: pass one as an argument or set [crawl] url in --config")?;
                Config::for_url(url)
            }
        };

        self.apply(&mut config);
        validate_config(&config).context("invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let config = cli.build_config()?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(ExitCode::SUCCESS);
    }

    let report = handle_crawl(&config).await?;
    let output_ok = handle_output(&config, &report);

    if !cli.quiet {
        eprint!("{}", format_summary(&report));
    }

    if report.stop_reason.is_error() || !output_ok {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr; stdout is reserved for the scraped data.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_scrape=warn"),
            1 => EnvFilter::new("sumi_scrape=info"),
            2 => EnvFilter::new("sumi_scrape=debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    let crawl = &config.crawl;

    println!("=== Sumi-Scrape Dry Run ===\n");

    println!("Crawl:");
    println!("  URL: {}", crawl.url);
    println!(
        "  Selector: {}",
        crawl.content_selector().unwrap_or("(whole page)")
    );
    if crawl.attributes.is_empty() {
        println!("  Attributes: (content)");
    } else {
        println!("  Attributes: {}", crawl.attributes.join(", "));
    }
    println!(
        "  Next page: {}",
        crawl.next_page_selector().unwrap_or("(none)")
    );
    println!("  Max pages: {}", crawl.max_pages);

    println!("\nRequests:");
    println!("  User agent: {}", crawl.user_agent);
    println!("  Timeout: {}s", crawl.timeout_secs);
    println!("  Delay: {}s + up to {}s jitter", crawl.delay_secs, crawl.jitter_secs);
    println!("  Respect robots.txt: {}", crawl.respect_robots);

    println!("\nOutput:");
    println!("  Format: {}", config.output.format);
    match &config.output.path {
        Some(path) => println!("  Path: {}", path.display()),
        None => println!("  Path: (stdout)"),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation, stopping early on Ctrl-C
async fn handle_crawl(config: &Config) -> anyhow::Result<CrawlReport> {
    let (interrupt_tx, interrupt_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping after the current request");
            let _ = interrupt_tx.send(true);
        }
    });

    let report = run_crawl(&config.crawl, Some(interrupt_rx)).await?;
    Ok(report)
}

/// Writes the records; returns false if the configured destination failed
///
/// When the output file cannot be written the records are printed to stdout
/// instead so they are not lost.
fn handle_output(config: &Config, report: &CrawlReport) -> bool {
    let format = config.output.format;
    let path = config.output.path.as_deref();

    if let Some(notice) = no_data_notice(report) {
        tracing::warn!("{}", notice);
    }

    match write_output(report, format, path) {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            if path.is_some() {
                eprintln!("Printing results to stdout instead");
                if let Err(e) = write_output(report, format, None) {
                    tracing::error!("Fallback output failed: {}", e);
                }
            }
            false
        }
    }
}
