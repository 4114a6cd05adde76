//! Output handler traits and types
//!
//! This module defines the trait interface for persistence back ends and the
//! data structures describing what a run wrote.

use crate::output::RunReport;
use crate::record::Record;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while persisting a run
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Files written for the records of one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordPaths {
    /// `<site>_<YYYYmmdd_HHMMSS>.json`
    pub timestamped: PathBuf,

    /// `<site>_latest.json`, overwritten every run
    pub latest: PathBuf,

    /// Mirror copy of the latest file, when configured and written
    pub mirror: Option<PathBuf>,
}

/// Trait for persistence back ends
///
/// Records and report are written separately so that a run can still
/// produce its report after the record files failed.
pub trait OutputHandler {
    /// Writes the accepted records in the order given
    ///
    /// Failing to write a primary file is an error. A failing mirror write
    /// is logged and reported as `mirror: None`.
    fn write_records(&self, site_name: &str, records: &[Record]) -> OutputResult<RecordPaths>;

    /// Writes the run report, returning its path
    fn write_report(&self, site_name: &str, report: &RunReport) -> OutputResult<PathBuf>;
}
