use url::Url;

/// Derives the short site name from a wiki's root URL
///
/// The name is the first label of the hostname, lowercased, so
/// `https://starwars.fandom.com` becomes `starwars`. It scopes the output
/// file names and fills the `fandom_name` field of every record.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use wiki_harvest::url::site_name;
///
/// let url = Url::parse("https://StarWars.fandom.com/wiki/Main_Page").unwrap();
/// assert_eq!(site_name(&url), "starwars");
/// ```
pub fn site_name(url: &Url) -> String {
    url.host_str()
        .and_then(|host| host.split('.').next())
        .filter(|label| !label.is_empty())
        .map(|label| label.to_lowercase())
        .unwrap_or_else(|| "unknown".to_string())
}
