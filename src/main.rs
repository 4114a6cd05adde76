//! Wiki-Harvest main entry point
//!
//! This is the command-line interface for the wiki character harvester.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use wiki_harvest::config::{read_config_with_hash, validate, Config};
use wiki_harvest::crawler::{crawl, listing_seeds};
use wiki_harvest::output::{print_summary, JsonOutput};
use wiki_harvest::url::site_name;

/// Wiki-Harvest: character records from wiki-style sites
///
/// Wiki-Harvest walks a wiki's category and listing pages, visits the
/// content pages they link to and extracts one record per page (name,
/// image, description, type and attributes). Records are written as JSON
/// together with a run report.
#[derive(Parser, Debug)]
#[command(name = "wiki-harvest")]
#[command(version)]
#[command(about = "Harvests character records from wiki-style sites", long_about = None)]
struct Cli {
    /// Root URL of the wiki, e.g. https://starwars.fandom.com
    #[arg(value_name = "SITE_URL")]
    site_url: Option<String>,

    /// Maximum number of content pages to fetch
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Directory for the record and report files
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Extra directory receiving a copy of the latest records
    #[arg(long, value_name = "DIR")]
    mirror_dir: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate settings and show what would be harvested without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = read_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    config.apply_overrides(
        cli.site_url.clone(),
        cli.max_pages,
        cli.output_dir.clone(),
        cli.mirror_dir.clone(),
    );

    if let Err(e) = validate(&config) {
        tracing::error!("Invalid configuration: {}", e);
        return Err(e.into());
    }

    if cli.dry_run {
        handle_dry_run(&config)
    } else {
        handle_crawl(config).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("wiki_harvest=info,warn"),
            1 => EnvFilter::new("wiki_harvest=debug,info"),
            2 => EnvFilter::new("wiki_harvest=trace,debug"),
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

/// Handles the --dry-run mode: shows the plan for a validated configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let root = config.root_url()?;
    let site = site_name(&root);
    let output = JsonOutput::from_config(&config.output);

    println!("=== Wiki-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Root URL: {}", root.as_str().trim_end_matches('/'));
    println!("  Name: {}", site);
    match config.site.max_pages {
        Some(n) => println!("  Page budget: {}", n),
        None => println!("  Page budget: unbounded"),
    }

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Timeout: {}s", config.fetcher.timeout_secs);
    println!(
        "  Max concurrent requests: {}",
        config.fetcher.max_concurrent_requests
    );

    let seeds = listing_seeds(&root);
    println!("\nListing Seeds ({}):", seeds.len());
    for seed in &seeds {
        println!("  - {}", seed);
    }

    println!("\nCandidate Queries:");
    for (field, queries) in config.queries.lists() {
        println!("  {}: {} candidates", field, queries.len());
    }

    println!("\nOutput:");
    println!("  Records: {}", output.timestamped_path(&site).display());
    println!("  Latest: {}", output.latest_path(&site).display());
    if let Some(mirror) = output.mirror_path(&site) {
        println!("  Mirror: {}", mirror.display());
    }
    println!("  Report: {}", output.report_path(&site).display());

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main harvest operation
async fn handle_crawl(config: Config) -> anyhow::Result<()> {
    match crawl(config).await {
        Ok(summary) => {
            tracing::info!("Harvest completed successfully");
            print_summary(&summary);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
