use crate::extract::query::{Document, Query};
use crate::extract::ExtractionError;

/// Returns the first candidate result that passes `validate`
///
/// Queries are tried in list order, so list position is the confidence
/// ranking. Within one query, results are tried in document order. Every
/// result is trimmed and empty strings are skipped before `validate` sees
/// them. Running out of candidates is `Ok(None)`, not an error.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wiki_harvest::extract::{resolve, Document};
///
/// let doc = Document::parse(
///     "<html><body><h1>  </h1><h2>Yoda</h2></body></html>",
///     Url::parse("https://wiki.example.com/wiki/Yoda").unwrap(),
/// );
/// let queries = vec!["h1".to_string(), "h2".to_string()];
/// assert_eq!(resolve(&doc, &queries, |_| true).unwrap(), Some("Yoda".to_string()));
/// ```
pub fn resolve<F>(
    document: &Document,
    queries: &[String],
    validate: F,
) -> Result<Option<String>, ExtractionError>
where
    F: Fn(&str) -> bool,
{
    for raw in queries {
        let query = Query::parse(raw)?;
        if let Some(found) = first_valid(document.select(&query), &validate) {
            tracing::trace!("Candidate '{}' matched on {}", raw, document.url());
            return Ok(Some(found));
        }
    }
    Ok(None)
}

/// Collects every trimmed, non-empty result of every query that passes `validate`
///
/// Used where all candidates are wanted rather than the best one (listing
/// links, gallery images, category tags). Order is query order, then
/// document order; duplicates are kept.
pub fn collect_all<F>(
    document: &Document,
    queries: &[String],
    validate: F,
) -> Result<Vec<String>, ExtractionError>
where
    F: Fn(&str) -> bool,
{
    let mut found = Vec::new();
    for raw in queries {
        let query = Query::parse(raw)?;
        found.extend(
            document
                .select(&query)
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty() && validate(s.as_str())),
        );
    }
    Ok(found)
}

/// First trimmed, non-empty item that passes `validate`
pub fn first_valid<I, F>(results: I, validate: F) -> Option<String>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> bool,
{
    results
        .into_iter()
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty() && validate(s.as_str()))
}
