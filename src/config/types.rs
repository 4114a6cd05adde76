use crate::extract::CandidateQueries;
use crate::url::DEFAULT_EXCLUDED_PATTERNS;
use crate::{ConfigError, ConfigResult};
use serde::Deserialize;
use url::Url;

/// Main configuration structure for Wiki-Harvest
///
/// Every section is optional in the TOML file; the only value that must come
/// from somewhere (file or command line) is the site root URL.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub queries: CandidateQueries,
}

/// The wiki being harvested
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// Root URL of the wiki, e.g. `https://starwars.fandom.com`
    #[serde(rename = "root-url")]
    pub root_url: Option<String>,

    /// Maximum number of content pages to fetch (unbounded when absent)
    #[serde(rename = "max-pages")]
    pub max_pages: Option<usize>,
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Upper bound on requests in flight at once
    #[serde(
        rename = "max-concurrent-requests",
        default = "default_max_concurrent_requests"
    )]
    pub max_concurrent_requests: u32,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the timestamped, latest and report files
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,

    /// Optional second copy of the latest records (e.g. a front-end's public data folder)
    #[serde(rename = "mirror-dir")]
    pub mirror_dir: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            mirror_dir: None,
        }
    }
}

/// Link classifier configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierConfig {
    /// Substrings that mark a link as a system or utility page
    #[serde(rename = "excluded-patterns", default = "default_excluded_patterns")]
    pub excluded_patterns: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            excluded_patterns: default_excluded_patterns(),
        }
    }
}

fn default_user_agent() -> String {
    format!("wiki-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_max_concurrent_requests() -> u32 {
    8
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_excluded_patterns() -> Vec<String> {
    DEFAULT_EXCLUDED_PATTERNS
        .iter()
        .map(|p| p.to_string())
        .collect()
}

impl Config {
    /// Creates a default configuration targeting the given site
    pub fn for_site(root_url: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.site.root_url = Some(root_url.into());
        config
    }

    /// Applies command-line overrides on top of file values
    pub fn apply_overrides(
        &mut self,
        root_url: Option<String>,
        max_pages: Option<usize>,
        data_dir: Option<String>,
        mirror_dir: Option<String>,
    ) {
        if root_url.is_some() {
            self.site.root_url = root_url;
        }
        if max_pages.is_some() {
            self.site.max_pages = max_pages;
        }
        if let Some(dir) = data_dir {
            self.output.data_dir = dir;
        }
        if mirror_dir.is_some() {
            self.output.mirror_dir = mirror_dir;
        }
    }

    /// Parses the configured root URL, without a trailing slash in its path
    pub fn root_url(&self) -> ConfigResult<Url> {
        let raw = self
            .site
            .root_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingRootUrl)?;

        let url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid root URL '{}': {}", raw, e)))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidUrl(format!(
                "Root URL '{}' must use http or https",
                raw
            )));
        }

        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl(format!(
                "Root URL '{}' has no host",
                raw
            )));
        }

        Ok(url)
    }
}
