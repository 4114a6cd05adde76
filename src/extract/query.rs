//! Parsed documents and the structural query language
//!
//! A query is a CSS selector (or a comma-separated group of them) with an
//! optional capture suffix per selector:
//!
//! | Suffix | Result per matched element |
//! |--------|----------------------------|
//! | none | full descendant text, whitespace collapsed |
//! | `::text` | each direct text node |
//! | `::attr(name)` | the attribute value, if present |
//!
//! A group behaves like a CSS selector group: matches come back once each,
//! in document order. When an element matches several selectors, the first
//! of them decides the capture.

use crate::extract::ExtractionError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// What to read from each matched element
#[derive(Debug, Clone, PartialEq, Eq)]
enum Capture {
    Text,
    OwnText,
    Attr(String),
}

impl Capture {
    fn collect(&self, element: ElementRef<'_>, out: &mut Vec<String>) {
        match self {
            Self::Text => {
                let text: String = element.text().collect();
                out.push(text.split_whitespace().collect::<Vec<_>>().join(" "));
            }
            Self::OwnText => {
                for child in element.children() {
                    if let Some(text) = child.value().as_text() {
                        let text: &str = text;
                        out.push(text.to_string());
                    }
                }
            }
            Self::Attr(name) => {
                if let Some(value) = element.value().attr(name) {
                    out.push(value.to_string());
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
struct QueryPart {
    selector: Selector,
    capture: Capture,
}

/// A compiled structural query
#[derive(Debug, Clone)]
pub struct Query {
    raw: String,
    parts: Vec<QueryPart>,
}

impl Query {
    /// Compiles a query string
    ///
    /// # Examples
    ///
    /// ```
    /// use wiki_harvest::extract::Query;
    ///
    /// assert!(Query::parse(".portable-infobox img::attr(src)").is_ok());
    /// assert!(Query::parse("th::text, .pi-data-label::text").is_ok());
    /// assert!(Query::parse("img::attr(").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ExtractionError> {
        let parts = split_groups(raw)
            .into_iter()
            .map(|part| parse_part(raw, part))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: raw.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Evaluates the query below `scope`
    pub fn select_in(&self, scope: ElementRef<'_>) -> Vec<String> {
        let mut out = Vec::new();
        for (element, part) in self.matches(scope) {
            part.capture.collect(element, &mut out);
        }
        out
    }

    /// Matched elements in document order, each paired with its first matching part
    fn matches<'a, 'q>(
        &'q self,
        scope: ElementRef<'a>,
    ) -> impl Iterator<Item = (ElementRef<'a>, &'q QueryPart)> + 'q
    where
        'a: 'q,
    {
        scope
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter_map(move |element| {
                self.parts
                    .iter()
                    .find(|part| part.selector.matches(&element))
                    .map(|part| (element, part))
            })
    }

    /// First result below `scope` that is non-empty once trimmed
    pub fn first_in(&self, scope: ElementRef<'_>) -> Option<String> {
        self.select_in(scope)
            .into_iter()
            .map(|s| s.trim().to_string())
            .find(|s| !s.is_empty())
    }

    /// Elements matched by the selectors, ignoring any capture suffix
    pub fn elements<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.matches(scope).map(|(element, _)| element).collect()
    }
}

fn invalid(raw: &str, message: impl Into<String>) -> ExtractionError {
    ExtractionError::InvalidQuery {
        query: raw.to_string(),
        message: message.into(),
    }
}

fn parse_part(raw: &str, part: &str) -> Result<QueryPart, ExtractionError> {
    let part = part.trim();
    if part.is_empty() {
        return Err(invalid(raw, "empty selector"));
    }

    let (css, capture) = if let Some(css) = part.strip_suffix("::text") {
        (css, Capture::OwnText)
    } else if let Some(idx) = part.find("::attr(") {
        let name = part[idx + "::attr(".len()..]
            .strip_suffix(')')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| invalid(raw, "malformed ::attr() suffix"))?;
        (&part[..idx], Capture::Attr(name.to_string()))
    } else {
        (part, Capture::Text)
    };

    let selector = Selector::parse(css.trim()).map_err(|e| invalid(raw, e.to_string()))?;

    Ok(QueryPart { selector, capture })
}

/// Splits a selector group on top-level commas
fn split_groups(raw: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in raw.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None => match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    parts.push(&raw[start..i]);
                    start = i + 1;
                }
                _ => {}
            },
        }
    }
    parts.push(&raw[start..]);
    parts
}

/// A fetched page parsed into a queryable tree
///
/// Holds the page's own URL so relative links and image sources can be
/// resolved against it.
pub struct Document {
    html: Html,
    url: Url,
}

impl Document {
    pub fn parse(body: &str, url: Url) -> Self {
        Self {
            html: Html::parse_document(body),
            url,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Evaluates a compiled query against the whole document
    pub fn select(&self, query: &Query) -> Vec<String> {
        query.select_in(self.html.root_element())
    }

    /// Compiles and evaluates a query string
    pub fn query(&self, raw: &str) -> Result<Vec<String>, ExtractionError> {
        Ok(self.select(&Query::parse(raw)?))
    }

    /// Reads `(label, value)` pairs from row-like elements
    ///
    /// Every element matched by one of `rows` is a row. Its label is the first
    /// non-empty result of `labels` evaluated inside the row, and likewise for
    /// its value. Rows missing either side are skipped.
    pub fn labeled_rows(
        &self,
        rows: &[String],
        labels: &[String],
        values: &[String],
    ) -> Result<Vec<(String, String)>, ExtractionError> {
        let labels = compile_all(labels)?;
        let values = compile_all(values)?;
        let mut pairs = Vec::new();

        for raw in rows {
            let rows = Query::parse(raw)?;
            for row in rows.elements(self.html.root_element()) {
                let label = labels.iter().find_map(|q| q.first_in(row));
                let value = values.iter().find_map(|q| q.first_in(row));
                if let (Some(label), Some(value)) = (label, value) {
                    pairs.push((label, value));
                }
            }
        }

        Ok(pairs)
    }
}

fn compile_all(raw: &[String]) -> Result<Vec<Query>, ExtractionError> {
    raw.iter().map(|q| Query::parse(q)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(html: &str) -> Document {
        Document::parse(html, Url::parse("https://wiki.example.com/wiki/Page").unwrap())
    }

    #[test]
    fn test_full_text_collapses_whitespace() {
        let d = doc("<html><body><p>  Luke   <b>Sky</b>walker\n is here </p></body></html>");
        assert_eq!(d.query("p").unwrap(), vec!["Luke Skywalker is here"]);
    }

    #[test]
    fn test_own_text_returns_direct_nodes() {
        let d = doc("<html><body><h1>Name <span>ignored</span> tail</h1></body></html>");
        assert_eq!(d.query("h1::text").unwrap(), vec!["Name ", " tail"]);
    }

    #[test]
    fn test_attr_capture() {
        let d = doc(r#"<html><body><img src="/a.png"><img alt="none"><img src="/b.png"></body></html>"#);
        assert_eq!(d.query("img::attr(src)").unwrap(), vec!["/a.png", "/b.png"]);
    }

    #[test]
    fn test_group_results_follow_document_order() {
        let d = doc(r#"<html><body><b>first</b><i>second</i></body></html>"#);
        assert_eq!(d.query("i, b").unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_group_matches_each_element_once() {
        let d = doc(
            r#"<html><body><div id="mw-content-text" class="mw-content-text">
            <img src="a.png"><img src="b.png">
            </div></body></html>"#,
        );
        assert_eq!(
            d.query(".mw-content-text img::attr(src), #mw-content-text img::attr(src)")
                .unwrap(),
            vec!["a.png", "b.png"]
        );
    }

    #[test]
    fn test_group_first_matching_part_picks_capture() {
        let d = doc(r#"<html><body><a class="x" href="/h">Text</a></body></html>"#);
        assert_eq!(d.query("a.x::attr(href), a::text").unwrap(), vec!["/h"]);
    }

    #[test]
    fn test_elements_deduplicated() {
        let d = doc(
            r#"<html><body><table class="infobox"><tr class="pi-item"><th>A</th><td>1</td></tr></table></body></html>"#,
        );
        let query = Query::parse(".infobox tr, .pi-item").unwrap();
        assert_eq!(query.elements(d.html.root_element()).len(), 1);
    }

    #[test]
    fn test_group_split_respects_brackets() {
        let d = doc(r#"<html><body><a title="a,b" href="/x">x</a></body></html>"#);
        assert_eq!(d.query(r#"a[title="a,b"]::attr(href)"#).unwrap(), vec!["/x"]);
    }

    #[test]
    fn test_no_match_is_empty() {
        let d = doc("<html><body></body></html>");
        assert!(d.query("h1.page-header__title::text").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_queries() {
        assert!(Query::parse("").is_err());
        assert!(Query::parse("p,").is_err());
        assert!(Query::parse("img::attr()").is_err());
        assert!(Query::parse("div[[").is_err());
    }

    #[test]
    fn test_first_of_type_supported() {
        let d = doc(
            r#"<html><body><div class="mw-content-text"><p>one</p><p>two</p></div></body></html>"#,
        );
        assert_eq!(
            d.query(".mw-content-text > p:first-of-type").unwrap(),
            vec!["one"]
        );
    }

    #[test]
    fn test_labeled_rows() {
        let d = doc(
            r#"<html><body>
            <table class="infobox">
              <tr><th colspan="2">Header only</th></tr>
              <tr><th> Power </th><td>Fire</td></tr>
              <tr><th>Affiliation</th><td><a href="/wiki/Jedi">Jedi</a> Order</td></tr>
            </table>
            <aside class="portable-infobox">
              <div class="pi-item"><h3 class="pi-data-label">Age</h3><div class="pi-data-value">19</div></div>
            </aside>
            </body></html>"#,
        );
        let rows = d
            .labeled_rows(
                &[".infobox tr".to_string(), ".portable-infobox .pi-item".to_string()],
                &["th, .pi-data-label".to_string()],
                &["td, .pi-data-value".to_string()],
            )
            .unwrap();

        assert_eq!(
            rows,
            vec![
                ("Power".to_string(), "Fire".to_string()),
                ("Affiliation".to_string(), "Jedi Order".to_string()),
                ("Age".to_string(), "19".to_string()),
            ]
        );
    }
}
