/// Link substrings that mark system, utility or non-article pages
pub const DEFAULT_EXCLUDED_PATTERNS: &[&str] = &[
    "/wiki/Special:",
    "/wiki/Category:",
    "/wiki/Template:",
    "/wiki/File:",
    "/wiki/User:",
    "/wiki/Talk:",
    "/wiki/Help:",
    "/wiki/MediaWiki:",
    "action=edit",
    "redlink=1",
    "#",
];

/// Outcome of classifying one discovered link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClassification {
    /// Presumed to describe a single entity
    Content,
    /// Matched an exclusion pattern
    Excluded { pattern: String },
}

impl LinkClassification {
    pub fn is_content(&self) -> bool {
        matches!(self, Self::Content)
    }
}

/// Decides whether discovered links are plausible content pages
///
/// There is no allowlist: anything not excluded is a candidate. False
/// positives are tolerated because pages without a usable image never
/// produce a record.
#[derive(Debug, Clone)]
pub struct PageClassifier {
    patterns: Vec<String>,
}

impl Default for PageClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_EXCLUDED_PATTERNS.iter().map(|p| p.to_string()))
    }
}

impl PageClassifier {
    pub fn new(patterns: impl IntoIterator<Item = String>) -> Self {
        Self {
            patterns: patterns.into_iter().collect(),
        }
    }

    /// Classifies a raw link as found in the page (before resolution)
    ///
    /// Patterns are checked in list order; the first match is reported.
    pub fn classify(&self, link: &str) -> LinkClassification {
        if link.trim().is_empty() {
            return LinkClassification::Excluded {
                pattern: String::new(),
            };
        }

        match self.patterns.iter().find(|p| link.contains(p.as_str())) {
            Some(pattern) => LinkClassification::Excluded {
                pattern: pattern.clone(),
            },
            None => LinkClassification::Content,
        }
    }

    pub fn is_content_page(&self, link: &str) -> bool {
        self.classify(link).is_content()
    }
}

/// Checks a link against the default exclusion patterns
///
/// # Examples
///
/// ```
/// use wiki_harvest::url::is_content_page;
///
/// assert!(is_content_page("/wiki/Luke_Skywalker"));
/// assert!(!is_content_page("/wiki/Category:Jedi"));
/// assert!(!is_content_page("/wiki/Luke_Skywalker?action=edit"));
/// ```
pub fn is_content_page(link: &str) -> bool {
    PageClassifier::default().is_content_page(link)
}
