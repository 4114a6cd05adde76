use crate::UrlError;
use url::Url;

/// Tracking query parameters dropped from the dedup key
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "mc_eid", "ref", "source"];

/// Normalizes a URL into the key used by the visited set
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not http(s)
/// 2. Lowercase the host and drop a `www.` prefix
/// 3. Remove empty and dot path segments and any trailing slash
/// 4. Remove the fragment
/// 5. Drop tracking query parameters and sort the rest
///
/// The scheme is kept as-is. The result is only a comparison key; the
/// crawler always fetches the URL it resolved from the page.
///
/// # Examples
///
/// ```
/// use wiki_harvest::url::normalize_url;
///
/// let url = normalize_url("https://WWW.Example.com/wiki/Luke_Skywalker/#Biography").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/wiki/Luke_Skywalker");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    let host = url.host_str().ok_or(UrlError::MissingDomain)?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    let path = normalize_path(url.path());
    url.set_path(&path);

    url.set_fragment(None);

    if url.query().is_some() {
        let mut params: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| !is_tracking_param(key))
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        params.sort();

        if params.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(params);
        }
    }

    Ok(url)
}

/// Collapses empty and dot segments; drops the trailing slash except at root
fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop();
            }
            _ => segments.push(segment),
        }
    }

    format!("/{}", segments.join("/"))
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_scheme() {
        let result = normalize_url("http://example.com/wiki/Yoda").unwrap();
        assert_eq!(result.as_str(), "http://example.com/wiki/Yoda");
    }

    #[test]
    fn test_lowercase_host_and_strip_www() {
        let result = normalize_url("https://WWW.Example.COM/wiki/Yoda").unwrap();
        assert_eq!(result.as_str(), "https://example.com/wiki/Yoda");
    }

    #[test]
    fn test_path_case_preserved() {
        let a = normalize_url("https://example.com/wiki/Yoda").unwrap();
        let b = normalize_url("https://example.com/wiki/yoda").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_remove_trailing_slash_and_dots() {
        let result = normalize_url("https://example.com/wiki/./a/../Yoda/").unwrap();
        assert_eq!(result.as_str(), "https://example.com/wiki/Yoda");
    }

    #[test]
    fn test_root_path() {
        let result = normalize_url("https://example.com").unwrap();
        assert_eq!(result.as_str(), "https://example.com/");
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/wiki/Yoda#Powers").unwrap();
        assert_eq!(result.as_str(), "https://example.com/wiki/Yoda");
    }

    #[test]
    fn test_query_sorted_and_tracking_removed() {
        let result =
            normalize_url("https://example.com/wiki/Category:Jedi?utm_source=x&until=Z&from=B")
                .unwrap();
        assert_eq!(
            result.as_str(),
            "https://example.com/wiki/Category:Jedi?from=B&until=Z"
        );
    }

    #[test]
    fn test_only_tracking_params_removes_query() {
        let result = normalize_url("https://example.com/wiki/Yoda?fbclid=abc").unwrap();
        assert_eq!(result.query(), None);
    }

    #[test]
    fn test_pagination_urls_stay_distinct() {
        let first = normalize_url("https://example.com/wiki/Category:Jedi").unwrap();
        let second = normalize_url("https://example.com/wiki/Category:Jedi?from=K").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_rejects_other_schemes() {
        assert!(matches!(
            normalize_url("mailto:someone@example.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(normalize_url("not a url"), Err(UrlError::Parse(_))));
    }
}
