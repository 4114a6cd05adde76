use url::Url;

/// Extensions that mark a URL as an image (substring match)
pub const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp"];

/// Icons, logos, placeholders and undersized thumbnails
pub const EXCLUDED_IMAGE_PATTERNS: &[&str] = &[
    "edit-icon",
    "commons-logo",
    "wikia-logo",
    "fandom-logo",
    "blank.gif",
    "pixel.gif",
    "/thumb/",
];

/// Checks whether a raw image source looks like real content
///
/// The check is case-insensitive. Wiki CDNs often put the extension in the
/// middle of the URL (`.../Yoda.png/revision/latest?cb=1`), so the extension
/// only has to appear somewhere in it.
pub fn is_valid_image_url(url: &str) -> bool {
    if url.trim().is_empty() {
        return false;
    }

    let lower = url.to_lowercase();

    if EXCLUDED_IMAGE_PATTERNS.iter().any(|p| lower.contains(p)) {
        return false;
    }

    IMAGE_EXTENSIONS.iter().any(|ext| lower.contains(ext))
}

/// Strips the `/revision/...` suffix, query string and fragment
///
/// Those mark resized or versioned variants; the bare URL is the
/// canonical original.
pub fn clean_image_url(url: &Url) -> Url {
    let mut cleaned = url.clone();
    cleaned.set_query(None);
    cleaned.set_fragment(None);

    if let Some(idx) = cleaned.path().find("/revision/") {
        let path = cleaned.path()[..idx].to_string();
        cleaned.set_path(&path);
    }

    cleaned
}

/// Resolves a raw image source against the page URL and cleans it
///
/// Returns `None` unless the result is an absolute http(s) URL.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wiki_harvest::extract::resolve_image_url;
///
/// let page = Url::parse("https://starwars.fandom.com/wiki/Yoda").unwrap();
/// let resolved = resolve_image_url(
///     &page,
///     "//static.wikia.nocookie.net/starwars/images/Yoda.png/revision/latest?cb=2016",
/// );
/// assert_eq!(
///     resolved.as_deref(),
///     Some("https://static.wikia.nocookie.net/starwars/images/Yoda.png")
/// );
/// ```
pub fn resolve_image_url(base: &Url, raw: &str) -> Option<String> {
    let absolute = base.join(raw.trim()).ok()?;

    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    Some(clean_image_url(&absolute).to_string())
}
