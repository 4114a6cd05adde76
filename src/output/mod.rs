//! Output module for persisting harvested records and run reports
//!
//! This module handles:
//! - Writing records as timestamped and latest JSON files (plus an optional mirror)
//! - Building and writing the per-run report
//! - Printing the end-of-run summary

mod json;
mod report;
mod traits;

pub use json::JsonOutput;
pub use report::{print_summary, HarvestSummary, RunReport};
pub use traits::{OutputError, OutputHandler, OutputResult, RecordPaths};
