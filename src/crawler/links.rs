//! Link discovery on listing pages
//!
//! Candidate hrefs come from every listing-link query (unioned). Each raw
//! href goes through the page classifier before it is resolved, then the
//! survivors are deduplicated by normalized URL in first-seen order.

use crate::extract::{collect_all, resolve, Document, ExtractionError};
use crate::url::{normalize_url, LinkClassification, PageClassifier};
use std::collections::HashSet;
use url::Url;

/// Content page links found on one listing page
pub fn discover_content_links(
    document: &Document,
    queries: &[String],
    classifier: &PageClassifier,
) -> Result<Vec<Url>, ExtractionError> {
    let hrefs = collect_all(document, queries, |href| match classifier.classify(href) {
        LinkClassification::Content => true,
        LinkClassification::Excluded { pattern } => {
            tracing::trace!("Skipping {} (matches '{}')", href, pattern);
            false
        }
    })?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in hrefs {
        let url = match resolve_link(&href, document.url()) {
            Some(url) => url,
            None => continue,
        };

        let key = normalize_url(url.as_str())
            .map(|normalized| normalized.to_string())
            .unwrap_or_else(|_| url.to_string());

        if seen.insert(key) {
            links.push(url);
        }
    }

    Ok(links)
}

/// The first next-page link, resolved against the listing page
pub fn next_page_link(
    document: &Document,
    queries: &[String],
) -> Result<Option<Url>, ExtractionError> {
    let base = document.url();
    let href = resolve(document, queries, |href| resolve_link(href, base).is_some())?;
    Ok(href.and_then(|href| resolve_link(&href, base)))
}

/// Resolves an href to an absolute http(s) URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only links
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.scheme() == "http" || absolute.scheme() == "https" {
        Some(absolute)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::CandidateQueries;

    fn listing(html: &str) -> Document {
        Document::parse(
            html,
            Url::parse("https://wiki.example.com/wiki/Category:Characters").unwrap(),
        )
    }

    fn links(document: &Document) -> Vec<String> {
        discover_content_links(
            document,
            &CandidateQueries::default().listing_links,
            &PageClassifier::default(),
        )
        .unwrap()
        .into_iter()
        .map(|u| u.to_string())
        .collect()
    }

    #[test]
    fn test_excluded_links_filtered() {
        let d = listing(
            r#"<html><body><div class="category-page__members">
            <a href="/wiki/Category:X">X</a>
            <a href="/wiki/Alice">Alice</a>
            <a href="/wiki/Bob">Bob</a>
            <a href="/wiki/Bob#Powers">Bob powers</a>
            <a href="/wiki/Carol?action=edit">edit</a>
            </div></body></html>"#,
        );
        assert_eq!(
            links(&d),
            vec![
                "https://wiki.example.com/wiki/Alice",
                "https://wiki.example.com/wiki/Bob",
            ]
        );
    }

    #[test]
    fn test_union_dedups_across_queries() {
        let d = listing(
            r#"<html><body>
            <div class="category-page__members"><a href="/wiki/Alice">Alice</a></div>
            <div class="mw-category-group"><ul><li><a href="https://www.wiki.example.com/wiki/Alice/">Alice</a></li>
            <li><a href="/wiki/Dave">Dave</a></li></ul></div>
            </body></html>"#,
        );
        assert_eq!(
            links(&d),
            vec![
                "https://wiki.example.com/wiki/Alice",
                "https://wiki.example.com/wiki/Dave",
            ]
        );
    }

    #[test]
    fn test_special_schemes_skipped() {
        let d = listing(
            r#"<html><body><div class="category-page__members">
            <a href="javascript:void(0)">js</a>
            <a href="mailto:admin@example.com">mail</a>
            <a href="/wiki/Eve">Eve</a>
            </div></body></html>"#,
        );
        assert_eq!(links(&d), vec!["https://wiki.example.com/wiki/Eve"]);
    }

    #[test]
    fn test_next_page_first_match() {
        let d = listing(
            r#"<html><body>
            <a rel="next" href="/wiki/Category:Characters?from=M">rel next</a>
            <a class="category-page__pagination-next" href="/wiki/Category:Characters?from=F">next</a>
            </body></html>"#,
        );
        let next = next_page_link(&d, &CandidateQueries::default().next_page).unwrap();
        assert_eq!(
            next.unwrap().as_str(),
            "https://wiki.example.com/wiki/Category:Characters?from=F"
        );
    }

    #[test]
    fn test_no_next_page() {
        let d = listing("<html><body></body></html>");
        assert_eq!(
            next_page_link(&d, &CandidateQueries::default().next_page).unwrap(),
            None
        );
    }
}
