//! State module for tracking one harvest run
//!
//! # Components
//!
//! - `CrawlState`: budget, visited set, error log and timing of the run
//! - `RunPhase`: the forward-only phase machine driving the coordinator

mod crawl_state;
mod run_phase;

pub use crawl_state::{CrawlError, CrawlState};
pub use run_phase::RunPhase;
