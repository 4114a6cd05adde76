/// Phase definitions for one harvest run
///
/// Phases only move forward. A run may skip a phase (a site whose listing
/// pages yield no links goes straight from discovery to draining) but never
/// returns to an earlier one.
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RunPhase {
    /// Site name derived, listing seeds not yet issued
    Init,

    /// Listing pages are being fetched; no content fetch issued yet
    DiscoveringListings,

    /// At least one content fetch has been issued
    FetchingContent,

    /// Nothing left to issue; in-flight content fetches are finishing
    Draining,

    /// Statistics computed, ready for persistence
    Done,
}

impl RunPhase {
    /// Returns true if moving from `self` to `next` keeps the run monotonic
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        next > *self
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::DiscoveringListings => "discovering_listings",
            Self::FetchingContent => "fetching_content",
            Self::Draining => "draining",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
