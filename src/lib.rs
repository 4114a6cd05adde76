//! Wiki-Harvest: a character record harvester for wiki-style sites
//!
//! This crate crawls a wiki's category and listing pages, follows links to
//! individual content pages, and extracts one structured record per page by
//! trying ranked lists of CSS queries against the parsed document. Accepted
//! records are validated, duplicate-flagged and written out as JSON together
//! with a per-run report.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Wiki-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Persistence error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid phase transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunPhase,
        to: state::RunPhase,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid query for {field}: '{query}' ({message})")]
    InvalidQuery {
        field: String,
        query: String,
        message: String,
    },

    #[error("No site root URL given (pass SITE_URL or set [site] root-url)")]
    MissingRootUrl,
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Wiki-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use record::Record;
pub use state::{CrawlState, RunPhase};
pub use url::{is_content_page, normalize_url, site_name};
