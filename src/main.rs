//! Sumi-Harvest main entry point
//!
//! This is the command-line interface for the Sumi-Harvest page harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_harvest::config::{load_config, Config, CrawlRequest};
use sumi_harvest::crawler::run_crawl;
use sumi_harvest::output::{content_hash, print_statistics};
use sumi_harvest::url::network_location;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Harvest: a bounded-depth, single-domain page harvester
///
/// Sumi-Harvest crawls one site from a seed URL, following same-site links up to
/// a depth limit, and writes the text and images of every page it visits to
/// one JSON file per page.
#[derive(Parser, Debug)]
#[command(name = "sumi-harvest")]
#[command(version)]
#[command(allow_negative_numbers = true)]
#[command(about = "A bounded-depth, single-domain page harvester", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to a TOML configuration file; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Base directory for output files [default: output]
    #[arg(long, value_name = "DIR")]
    output: Option<String>,

    /// Depth of the crawl; 1 fetches only the seed [default: 1]
    #[arg(long)]
    depth: Option<u32>,

    /// Delay before every request, in seconds [default: 1.0]
    #[arg(long, value_name = "SECS")]
    rate_limit: Option<f64>,

    /// User-Agent header to send
    #[arg(long)]
    user_agent: Option<String>,

    /// Maximum number of links to follow from each page [default: 10]
    #[arg(long)]
    max_links_per_page: Option<u32>,

    /// Comma-separated href prefixes that are never followed
    #[arg(long, value_delimiter = ',')]
    exclude_paths: Option<Vec<String>>,

    /// HTTP method to use for requests [default: GET]
    #[arg(long)]
    http_method: Option<String>,

    /// Request timeout in seconds [default: 30]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    let request = CrawlRequest::from_config(&cli.url, &config).context("Invalid crawl settings")?;

    if cli.dry_run {
        handle_dry_run(&request);
        return Ok(());
    }

    handle_crawl(request).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_harvest=info,warn"),
            1 => EnvFilter::new("sumi_harvest=debug,info"),
            2 => EnvFilter::new("sumi_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.directory = output.clone();
    }
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(rate_limit) = cli.rate_limit {
        config.crawler.rate_limit = rate_limit;
    }
    if let Some(user_agent) = &cli.user_agent {
        config.request.user_agent = user_agent.clone();
    }
    if let Some(max_links) = cli.max_links_per_page {
        config.crawler.max_links_per_page = max_links;
    }
    if let Some(exclude_paths) = &cli.exclude_paths {
        config.crawler.exclude_paths = exclude_paths.clone();
    }
    if let Some(method) = &cli.http_method {
        config.request.http_method = method.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.request.timeout_secs = timeout;
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows the resolved settings
fn handle_dry_run(request: &CrawlRequest) {
    println!("=== Sumi-Harvest Dry Run ===\n");

    println!("Seed: {}", request.seed);
    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", request.max_depth);
    println!("  Max links per page: {}", request.max_links_per_page);
    println!("  Delay between requests: {:?}", request.rate_limit);
    if request.exclude_paths.is_empty() {
        println!("  Excluded paths: none");
    } else {
        println!("  Excluded paths: {}", request.exclude_paths.join(", "));
    }

    println!("\nRequests:");
    println!("  Method: {}", request.http_method);
    println!("  User agent: {}", request.user_agent);
    println!("  Timeout: {:?}", request.timeout);

    println!("\nOutput:");
    match network_location(&request.seed) {
        Some(origin) => println!(
            "  Directory: {}",
            request
                .output_directory
                .join(content_hash(&origin.to_string()))
                .display()
        ),
        None => println!("  Directory: {}", request.output_directory.display()),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(request: CrawlRequest) -> anyhow::Result<()> {
    let cancel = CancellationToken::new();

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing the current page");
            on_interrupt.cancel();
        }
    });

    let outcome = run_crawl(request, cancel)
        .await
        .context("Failed to start crawl")?;

    print_statistics(&outcome.stats, outcome.cancelled);

    Ok(())
}
