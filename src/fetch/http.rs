// src/fetch/http.rs
// =============================================================================
// The production page fetcher: a plain HTTP GET with reqwest.
//
// Key functionality:
// - One shared Client for the whole crawl (connection pooling)
// - Follows up to 5 redirects
// - Per-request timeout supplied by the crawl engine
// - Reports the URL the page was finally served from
// - Only parses bodies that claim to be HTML
// - Maps every failure mode onto a FetchError the engine can record
//
// Rust concepts:
// - async_trait: lets us implement an async method on a trait object
// - map_err + ?: convert reqwest errors into our own error type
// =============================================================================

use async_trait::async_trait;
use reqwest::header::{HeaderMap, CONTENT_TYPE};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::{FetchError, PageContent, PageFetcher};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> reqwest::Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<PageContent, FetchError> {
        // mailto:, javascript:, ftp: and friends end up in the discovered list
        // but there's no page behind them to GET
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::Network(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }

        let response = self
            .client
            .get(url.as_str())
            .timeout(timeout)
            .send()
            .await
            .map_err(categorize_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        // After redirects this is the page we actually got
        let served_at = response.url().clone();

        // Images, PDFs and archives have no anchors; don't download them
        if !is_html(response.headers()) {
            debug!(url = %served_at, "not an HTML page, skipping body");
            return Ok(PageContent::new(served_at, Vec::new()));
        }

        let html = response.text().await.map_err(categorize_error)?;
        Ok(PageContent::from_html(served_at, &html))
    }
}

// A missing Content-Type gets the benefit of the doubt
fn is_html(headers: &HeaderMap) -> bool {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return true;
    };
    let Ok(value) = value.to_str() else {
        return false;
    };

    let mime = value.split(';').next().unwrap_or_default().trim();
    mime.eq_ignore_ascii_case("text/html") || mime.eq_ignore_ascii_case("application/xhtml+xml")
}

// Categorizes reqwest errors
//
// Timeouts get their own variant; everything else is a network error with a
// message that says what actually went wrong (DNS, TLS, redirect loop, ...).
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout;
    }

    let error_string = error.to_string();

    let message = if error.is_redirect() {
        "too many redirects".to_string()
    } else if error.is_connect() {
        if error_string.contains("dns") {
            "could not resolve hostname".to_string()
        } else {
            "connection failed".to_string()
        }
    } else if error_string.contains("certificate") || error_string.contains("ssl") {
        "ssl certificate error".to_string()
    } else {
        error_string
    };

    FetchError::Network(message)
}
