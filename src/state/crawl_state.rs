use crate::state::RunPhase;
use crate::url::{normalize_url, site_name};
use crate::{HarvestError, Result};
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

/// One logged failure: a fetch that failed or a page that could not be extracted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlError {
    pub url: String,

    /// Full message, already naming the URL
    pub message: String,
}

impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Mutable state of one harvest run
///
/// Owned by the coordinator and mutated only from its completion loop. The
/// report is built from it once the run is done.
#[derive(Debug)]
pub struct CrawlState {
    root_url: Url,
    site_url: String,
    site_name: String,

    /// Content pages allowed (`None` is unbounded)
    budget: Option<usize>,

    /// Content fetches issued so far, whatever their outcome
    pages_attempted: usize,

    /// Normalized keys of every URL enqueued so far
    visited: HashSet<String>,

    errors: Vec<CrawlError>,
    phase: RunPhase,
    started: Instant,
}

impl CrawlState {
    pub fn new(root_url: Url, budget: Option<usize>) -> Self {
        let site_url = root_url.as_str().trim_end_matches('/').to_string();
        let site_name = site_name(&root_url);

        Self {
            root_url,
            site_url,
            site_name,
            budget,
            pages_attempted: 0,
            visited: HashSet::new(),
            errors: Vec::new(),
            phase: RunPhase::Init,
            started: Instant::now(),
        }
    }

    pub fn root_url(&self) -> &Url {
        &self.root_url
    }

    /// Root URL without a trailing slash, as stored in records
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    pub fn budget(&self) -> Option<usize> {
        self.budget
    }

    pub fn pages_attempted(&self) -> usize {
        self.pages_attempted
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Moves the run to a later phase
    pub fn advance(&mut self, to: RunPhase) -> Result<()> {
        if !self.phase.can_transition_to(to) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to,
            });
        }

        tracing::debug!("Run phase {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }

    /// Marks a URL as enqueued
    ///
    /// Returns false if its normalized form was already present, in which
    /// case the caller must not fetch it again.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(visit_key(url))
    }

    /// Content fetches still allowed (`None` when unbounded)
    pub fn remaining_budget(&self) -> Option<usize> {
        self.budget
            .map(|budget| budget.saturating_sub(self.pages_attempted))
    }

    pub fn budget_exhausted(&self) -> bool {
        self.remaining_budget() == Some(0)
    }

    /// Counts one content fetch against the budget
    ///
    /// Returns false, without counting, once the budget is spent.
    pub fn try_consume_budget(&mut self) -> bool {
        if self.budget_exhausted() {
            return false;
        }
        self.pages_attempted += 1;
        true
    }

    pub fn record_error(&mut self, url: &Url, message: impl Into<String>) {
        self.errors.push(CrawlError {
            url: url.to_string(),
            message: message.into(),
        });
    }

    pub fn errors(&self) -> &[CrawlError] {
        &self.errors
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

fn visit_key(url: &Url) -> String {
    normalize_url(url.as_str())
        .map(|normalized| normalized.to_string())
        .unwrap_or_else(|_| url.to_string())
}
