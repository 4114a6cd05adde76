//! Crawler module for page fetching and run orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching behind the `PageFetcher` capability
//! - The listing-first frontier and listing seeds
//! - Link discovery and pagination on listing pages
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod links;

pub use coordinator::{Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use frontier::{listing_seeds, Frontier, Request, RequestKind, LISTING_SEED_PATHS};
pub use links::{discover_content_links, next_page_link};

use crate::config::Config;
use crate::output::{HarvestSummary, JsonOutput, OutputHandler};
use crate::Result;
use std::sync::Arc;

/// Runs a complete harvest over HTTP and writes JSON output
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client from the fetcher settings
/// 2. Crawl listing and content pages
/// 3. Write the records and the run report to the data directory
///
/// # Returns
///
/// * `Ok(HarvestSummary)` - Run finished and its output was written
/// * `Err(HarvestError)` - Invalid configuration or a primary write failed
pub async fn crawl(config: Config) -> Result<HarvestSummary> {
    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);
    let output = JsonOutput::from_config(&config.output);
    run_crawl(config, fetcher, &output).await
}

/// Runs a harvest with the given fetcher and output back end
///
/// The report is written even when writing the records failed; the record
/// error is returned afterwards.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use wiki_harvest::config::load_config;
/// use wiki_harvest::crawler::{run_crawl, HttpFetcher};
/// use wiki_harvest::output::JsonOutput;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("harvest.toml"))?;
/// let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);
/// let output = JsonOutput::from_config(&config.output);
/// let summary = run_crawl(config, fetcher, &output).await?;
/// println!("{} records", summary.pipeline.accepted);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    fetcher: Arc<dyn PageFetcher>,
    output: &dyn OutputHandler,
) -> Result<HarvestSummary> {
    let coordinator = Coordinator::new(config, fetcher)?;
    let site_name = coordinator.state().site_name().to_string();

    let outcome = coordinator.run().await?;

    let records = output.write_records(&site_name, &outcome.records);
    let report_path = output.write_report(&site_name, &outcome.report)?;
    let records = records?;

    Ok(HarvestSummary {
        report: outcome.report,
        pipeline: outcome.stats,
        records,
        report_path,
    })
}
