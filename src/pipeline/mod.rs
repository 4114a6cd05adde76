//! Record pipeline
//!
//! Every extracted record passes three stages in order:
//!
//! 1. Validation: required fields (see [`validate_record`])
//! 2. Cleaning: whitespace and the category/type default
//! 3. Duplicate flagging: repeated names are logged and kept
//!
//! Accepted records are held in completion order until the run ends.

mod validation;

pub use validation::{
    clean_record, validate_record, ValidationError, MIN_NAME_CHARS, UNKNOWN_CHARACTER_TYPE,
};

use crate::record::Record;
use std::collections::HashSet;

/// Counters exposed in the run summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub accepted: usize,
    pub dropped: usize,
    /// Accepted records whose name had been seen before
    pub duplicates: usize,
}

/// What happened to one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    Accepted,
    AcceptedDuplicate,
    Dropped(ValidationError),
}

/// Accumulates the records of one run
#[derive(Debug, Default)]
pub struct RecordPipeline {
    seen_names: HashSet<String>,
    records: Vec<Record>,
    stats: PipelineStats,
}

impl RecordPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one record through validation, cleaning and duplicate flagging
    pub fn process(&mut self, record: Record) -> PipelineOutcome {
        if let Err(e) = validate_record(&record) {
            tracing::warn!("Dropping record from {}: {}", record.page_url, e);
            self.stats.dropped += 1;
            return PipelineOutcome::Dropped(e);
        }

        let record = clean_record(record);
        let key = record.name.to_lowercase();

        let outcome = if self.seen_names.insert(key) {
            PipelineOutcome::Accepted
        } else {
            tracing::warn!("Duplicate item found: {}", record.name);
            self.stats.duplicates += 1;
            PipelineOutcome::AcceptedDuplicate
        };

        self.stats.accepted += 1;
        self.records.push(record);
        outcome
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}
