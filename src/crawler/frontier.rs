//! Frontier of pending requests
//!
//! Two FIFO queues, one per request class. Listing pages are always handed
//! out first: they feed the content queue, and pagination must keep moving
//! even after the content budget is spent.

use std::collections::VecDeque;
use url::Url;

/// Listing pages tried for every site, in priority order
pub const LISTING_SEED_PATHS: &[&str] = &[
    "Special:AllPages",
    "Category:Characters",
    "Category:Character",
    "Category:People",
    "Category:Heroes",
    "Category:Villains",
    "Category:Champions",
    "Category:Pokemon",
    "Category:Jedi",
];

/// Builds the listing seed URLs under `<root>/wiki/`
///
/// Seeds that do not form a valid URL are skipped.
pub fn listing_seeds(root: &Url) -> Vec<Url> {
    let base = root.as_str().trim_end_matches('/');

    LISTING_SEED_PATHS
        .iter()
        .filter_map(|path| Url::parse(&format!("{}/wiki/{}", base, path)).ok())
        .collect()
}

/// The two request classes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// Category or index page: yields links and pagination
    Listing,

    /// Leaf page describing one entity
    Content,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub url: Url,
    pub kind: RequestKind,
}

#[derive(Debug, Default)]
pub struct Frontier {
    listings: VecDeque<Url>,
    content: VecDeque<Url>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_listing(&mut self, url: Url) {
        self.listings.push_back(url);
    }

    pub fn push_content(&mut self, url: Url) {
        self.content.push_back(url);
    }

    /// Next request, listing pages first
    pub fn pop(&mut self) -> Option<Request> {
        if let Some(url) = self.listings.pop_front() {
            return Some(Request {
                url,
                kind: RequestKind::Listing,
            });
        }

        self.content.pop_front().map(|url| Request {
            url,
            kind: RequestKind::Content,
        })
    }

    pub fn pending_content(&self) -> usize {
        self.content.len()
    }

    pub fn len(&self) -> usize {
        self.listings.len() + self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty() && self.content.is_empty()
    }
}
