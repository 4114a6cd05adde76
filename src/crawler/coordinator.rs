//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! one harvest run, including:
//! - Seeding the frontier with listing pages
//! - Dispatching fetches and enforcing the content budget
//! - Turning listing pages into content links and pagination
//! - Running the extractors and the record pipeline on content pages
//!
//! Fetches run as tasks on a `JoinSet`; everything else happens in the
//! completion loop, one page at a time. Parsed documents never cross an
//! await point.

use crate::config::Config;
use crate::crawler::fetcher::{FetchError, FetchedPage, PageFetcher};
use crate::crawler::frontier::{listing_seeds, Frontier, Request, RequestKind};
use crate::crawler::links::{discover_content_links, next_page_link};
use crate::extract::{CandidateQueries, Document, Extractor};
use crate::output::RunReport;
use crate::pipeline::{PipelineOutcome, PipelineStats, RecordPipeline};
use crate::record::Record;
use crate::state::{CrawlState, RunPhase};
use crate::url::PageClassifier;
use crate::Result;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Content pages between two progress log lines
const PROGRESS_INTERVAL: usize = 10;

type FetchTask = (Request, std::result::Result<FetchedPage, FetchError>);

/// What a finished run hands to persistence
#[derive(Debug)]
pub struct CrawlOutcome {
    /// Accepted records in completion order
    pub records: Vec<Record>,
    pub report: RunReport,
    pub stats: PipelineStats,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    fetcher: Arc<dyn PageFetcher>,
    state: CrawlState,
    frontier: Frontier,
    classifier: PageClassifier,
    queries: CandidateQueries,
    extractor: Extractor,
    pipeline: RecordPipeline,
    listings_in_flight: usize,
    content_completed: usize,
}

impl Coordinator {
    /// Creates a coordinator for the configured site
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(HarvestError)` - The root URL is missing or invalid
    pub fn new(config: Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        let root_url = config.root_url()?;
        let state = CrawlState::new(root_url, config.site.max_pages);
        let classifier = PageClassifier::new(config.classifier.excluded_patterns);
        let extractor = Extractor::new(
            config.queries.clone(),
            state.site_url(),
            state.site_name(),
        );

        Ok(Self {
            fetcher,
            state,
            frontier: Frontier::new(),
            classifier,
            queries: config.queries,
            extractor,
            pipeline: RecordPipeline::new(),
            listings_in_flight: 0,
            content_completed: 0,
        })
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Runs the crawl to completion
    ///
    /// Fetch and extraction failures are logged against their URL and never
    /// end the run. The only errors returned are internal ones.
    pub async fn run(mut self) -> Result<CrawlOutcome> {
        tracing::info!(
            "Starting harvest of {} ({}), budget: {}",
            self.state.site_name(),
            self.state.site_url(),
            self.state
                .budget()
                .map(|b| b.to_string())
                .unwrap_or_else(|| "unbounded".to_string())
        );

        self.state.advance(RunPhase::DiscoveringListings)?;

        for seed in listing_seeds(self.state.root_url()) {
            if self.state.mark_visited(&seed) {
                self.frontier.push_listing(seed);
            }
        }

        let mut tasks: JoinSet<FetchTask> = JoinSet::new();

        loop {
            self.dispatch(&mut tasks)?;

            if self.frontier.is_empty() && self.listings_in_flight == 0 {
                self.enter(RunPhase::Draining)?;
            }

            match tasks.join_next().await {
                Some(Ok((request, result))) => self.handle_completion(request, result),
                Some(Err(e)) => {
                    tracing::error!("Fetch task failed: {}", e);
                }
                None => break,
            }
        }

        self.enter(RunPhase::Draining)?;
        self.state.advance(RunPhase::Done)?;

        let report = RunReport::from_state(&self.state);
        let stats = self.pipeline.stats();

        tracing::info!(
            "Harvest completed: {} pages in {:.1}s, {} records ({} duplicates, {} dropped), {} errors",
            report.pages_scraped,
            report.duration_seconds,
            stats.accepted,
            stats.duplicates,
            stats.dropped,
            report.errors_count
        );

        Ok(CrawlOutcome {
            records: self.pipeline.into_records(),
            report,
            stats,
        })
    }

    /// Moves to `phase` unless the run is already there or beyond
    fn enter(&mut self, phase: RunPhase) -> Result<()> {
        if self.state.phase() < phase {
            self.state.advance(phase)?;
        }
        Ok(())
    }

    /// Spawns a fetch for every pending request
    ///
    /// Content requests are counted against the budget here, at issue time;
    /// once it is spent they are discarded.
    fn dispatch(&mut self, tasks: &mut JoinSet<FetchTask>) -> Result<()> {
        while let Some(request) = self.frontier.pop() {
            match request.kind {
                RequestKind::Listing => self.listings_in_flight += 1,
                RequestKind::Content => {
                    if !self.state.try_consume_budget() {
                        tracing::debug!("Page budget spent, not fetching {}", request.url);
                        continue;
                    }
                    self.enter(RunPhase::FetchingContent)?;
                }
            }

            tracing::debug!("Dispatching {:?} request for {}", request.kind, request.url);

            // The fetch runs in its own task so a panic still comes back
            // paired with its request
            let fetcher = Arc::clone(&self.fetcher);
            let url = request.url.clone();
            let fetch = tokio::spawn(async move { fetcher.fetch(&url).await });
            tasks.spawn(async move {
                let result = match fetch.await {
                    Ok(result) => result,
                    Err(e) => Err(FetchError::Task(e.to_string())),
                };
                (request, result)
            });
        }
        Ok(())
    }

    fn handle_completion(
        &mut self,
        request: Request,
        result: std::result::Result<FetchedPage, FetchError>,
    ) {
        if request.kind == RequestKind::Listing {
            self.listings_in_flight -= 1;
        }

        let page = match result {
            Ok(page) => page,
            Err(e) => {
                let message = format!("Request failed for {}: {}", request.url, e);
                tracing::error!("{}", message);
                self.state.record_error(&request.url, message);
                return;
            }
        };

        tracing::debug!("{} answered with HTTP {}", page.final_url, page.status);

        match request.kind {
            RequestKind::Listing => self.handle_listing(&request, page),
            RequestKind::Content => {
                self.handle_content(&request, page);
                self.content_completed += 1;
                if self.content_completed % PROGRESS_INTERVAL == 0 {
                    self.log_progress();
                }
            }
        }
    }

    /// Enqueues content links (within budget) and the next listing page
    fn handle_listing(&mut self, request: &Request, page: FetchedPage) {
        let document = Document::parse(&page.body, page.final_url);

        match discover_content_links(&document, &self.queries.listing_links, &self.classifier) {
            Ok(links) => {
                tracing::info!(
                    "Found {} potential character pages on {}",
                    links.len(),
                    request.url
                );

                let mut enqueued = 0;
                for link in links {
                    if let Some(remaining) = self.state.remaining_budget() {
                        if self.frontier.pending_content() >= remaining {
                            break;
                        }
                    }
                    if self.state.mark_visited(&link) {
                        self.frontier.push_content(link);
                        enqueued += 1;
                    }
                }
                tracing::debug!("Enqueued {} content pages from {}", enqueued, request.url);
            }
            Err(e) => {
                let message = format!("Error parsing {}: {}", request.url, e);
                tracing::error!("{}", message);
                self.state.record_error(&request.url, message);
            }
        }

        // Pagination is followed regardless of the content budget
        match next_page_link(&document, &self.queries.next_page) {
            Ok(Some(next)) => {
                if self.state.mark_visited(&next) {
                    tracing::debug!("Following pagination to {}", next);
                    self.frontier.push_listing(next);
                }
            }
            Ok(None) => {}
            Err(e) => {
                let message = format!("Error parsing {}: {}", request.url, e);
                tracing::error!("{}", message);
                self.state.record_error(&request.url, message);
            }
        }
    }

    /// Extracts a record and hands it to the pipeline
    fn handle_content(&mut self, request: &Request, page: FetchedPage) {
        let document = Document::parse(&page.body, page.final_url);

        match self.extractor.extract(&document) {
            Ok(Some(record)) => match self.pipeline.process(record) {
                PipelineOutcome::Accepted => {
                    tracing::debug!("Record accepted from {}", request.url)
                }
                PipelineOutcome::AcceptedDuplicate => {
                    tracing::debug!("Duplicate-named record kept from {}", request.url)
                }
                PipelineOutcome::Dropped(e) => {
                    tracing::debug!("Record from {} failed validation: {}", request.url, e)
                }
            },
            Ok(None) => {}
            Err(e) => {
                let message = format!("Error parsing {}: {}", request.url, e);
                tracing::error!("{}", message);
                self.state.record_error(&request.url, message);
            }
        }
    }

    fn log_progress(&self) {
        let elapsed = self.state.elapsed();
        let rate = self.content_completed as f64 / elapsed.as_secs_f64().max(f64::EPSILON);
        tracing::info!(
            "Progress: {} pages processed, {} records, {} in frontier, {:.2} pages/sec",
            self.content_completed,
            self.pipeline.records().len(),
            self.frontier.len(),
            rate
        );
    }
}
