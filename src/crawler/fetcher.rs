//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the configured user agent and timeouts
//! - Bounding concurrent requests with a semaphore
//! - Classifying failures (timeouts, connection errors, HTTP status, non-HTML)
//!
//! The coordinator only sees the [`PageFetcher`] trait, so tests can swap in
//! an in-memory fetcher.

use crate::config::FetcherConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use url::Url;

/// Why a single URL could not be fetched
///
/// Always non-fatal: the coordinator logs it against the URL and moves on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("Expected HTML, got {0}")]
    ContentMismatch(String),

    #[error("{0}")]
    Network(String),

    /// The fetch task panicked or was cancelled
    #[error("Fetch task failed: {0}")]
    Task(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Network(e.to_string())
        }
    }
}

/// A successfully fetched HTML page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    pub status: u16,

    pub body: String,
}

/// Capability to fetch one page
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use wiki_harvest::config::FetcherConfig;
/// use wiki_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Accepts `text/html`, `application/xhtml+xml` and responses without a type
fn is_html(content_type: &str) -> bool {
    content_type.is_empty() || content_type.to_lowercase().contains("html")
}

/// [`PageFetcher`] over a shared `reqwest` client
pub struct HttpFetcher {
    client: Client,
    permits: Arc<Semaphore>,
}

impl HttpFetcher {
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, config.max_concurrent_requests as usize))
    }

    pub fn with_client(client: Client, max_concurrent_requests: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(max_concurrent_requests.max(1))),
        }
    }

    /// Permits currently free
    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        tracing::debug!("Fetching {}", url);
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return Err(FetchError::ContentMismatch(content_type));
        }

        let body = response.text().await?;

        tracing::debug!("Fetched {} ({} bytes)", final_url, body.len());

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            body,
        })
    }
}
