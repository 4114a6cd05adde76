//! Run report and end-of-run summary
//!
//! The report is the machine-readable record of a run, written next to the
//! data files. The summary is the human-readable version printed by the CLI.

use crate::output::RecordPaths;
use crate::pipeline::PipelineStats;
use crate::state::CrawlState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Per-run statistics, serialized as `<site>_scraping_report.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    #[serde(rename = "fandom_name")]
    pub site_name: String,

    #[serde(rename = "fandom_url")]
    pub site_url: String,

    /// Content pages attempted, whatever their outcome
    pub pages_scraped: usize,

    pub duration_seconds: f64,

    pub errors_count: usize,

    /// Error messages in the order they occurred
    pub errors: Vec<String>,

    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Snapshots a finished run
    pub fn from_state(state: &CrawlState) -> Self {
        let errors: Vec<String> = state.errors().iter().map(|e| e.message.clone()).collect();

        Self {
            site_name: state.site_name().to_string(),
            site_url: state.site_url().to_string(),
            pages_scraped: state.pages_attempted(),
            duration_seconds: state.elapsed().as_secs_f64(),
            errors_count: errors.len(),
            errors,
            finished_at: Utc::now(),
        }
    }
}

/// Everything a finished run produced
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub report: RunReport,
    pub pipeline: PipelineStats,
    pub records: RecordPaths,
    pub report_path: PathBuf,
}

/// Prints the run summary to stdout
pub fn print_summary(summary: &HarvestSummary) {
    let report = &summary.report;
    let stats = &summary.pipeline;

    println!("=== Harvest Summary: {} ===\n", report.site_name);

    println!("Overview:");
    println!("  Site: {}", report.site_url);
    println!("  Content pages attempted: {}", report.pages_scraped);
    println!("  Duration: {:.1}s", report.duration_seconds);
    println!();

    println!("Records:");
    println!("  Accepted: {}", stats.accepted);
    println!("  Duplicate names (kept): {}", stats.duplicates);
    println!("  Dropped by validation: {}", stats.dropped);
    println!();

    if report.errors_count > 0 {
        println!("Errors ({}):", report.errors_count);
        for error in report.errors.iter().take(10) {
            println!("  - {}", error);
        }
        if report.errors_count > 10 {
            println!("  ... and {} more (see report)", report.errors_count - 10);
        }
        println!();
    }

    println!("Output:");
    println!("  {}", summary.records.timestamped.display());
    println!("  {}", summary.records.latest.display());
    if let Some(mirror) = &summary.records.mirror {
        println!("  {}", mirror.display());
    }
    println!("  {}", summary.report_path.display());
}
