// src/fetch/mod.rs
// =============================================================================
// This module is the boundary between the crawler and the network.
//
// The crawl engine only knows the PageFetcher trait: "give me a URL and a
// timeout, I'll give you the raw hrefs on that page or tell you why not".
// That keeps the engine testable with an in-memory fetcher and leaves room
// for a browser-backed fetcher later.
//
// Submodules:
// - http: the production fetcher, built on reqwest
// - html: pulls raw anchor hrefs out of markup
// =============================================================================

mod html;
mod http;

pub use html::extract_anchors;
pub use http::HttpFetcher;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// What the engine gets back from a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageContent {
    url: Url,
    anchors: Vec<String>,
}

impl PageContent {
    pub fn new(url: Url, anchors: Vec<String>) -> Self {
        Self { url, anchors }
    }

    pub fn from_html(url: Url, html: &str) -> Self {
        Self::new(url, extract_anchors(html))
    }

    /// Where the page was actually served from, after redirects. Relative
    /// anchors resolve against this, not against the requested URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Raw, untrusted href values in document order.
    pub fn anchors(&self) -> &[String] {
        &self.anchors
    }
}

/// Why a single page couldn't be fetched. Never fatal to the crawl as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("request timed out")]
    Timeout,
    #[error("HTTP {0}")]
    HttpStatus(u16),
    #[error("fetch cancelled")]
    Cancelled,
}

impl FetchError {
    /// Short machine-readable label, used in reports and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::Network(_) => "network",
            FetchError::Timeout => "timeout",
            FetchError::HttpStatus(_) => "http_status",
            FetchError::Cancelled => "cancelled",
        }
    }
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<PageContent, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(FetchError::Network("refused".into()).kind(), "network");
        assert_eq!(FetchError::Timeout.kind(), "timeout");
        assert_eq!(FetchError::HttpStatus(503).kind(), "http_status");
        assert_eq!(FetchError::Cancelled.kind(), "cancelled");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::HttpStatus(404).to_string(), "HTTP 404");
        assert_eq!(
            FetchError::Network("connection failed".into()).to_string(),
            "network error: connection failed"
        );
    }

    #[test]
    fn test_page_content_from_html() {
        let url = Url::parse("https://x.com/docs/").unwrap();
        let page = PageContent::from_html(url.clone(), r#"<p><a href="/x">x</a></p>"#);
        assert_eq!(page.anchors().to_vec(), vec!["/x"]);
        assert_eq!(page.url(), &url);
    }
}
