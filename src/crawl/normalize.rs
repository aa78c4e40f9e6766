// src/crawl/normalize.rs
// =============================================================================
// This module turns raw href strings into comparable absolute URLs.
//
// Rules:
// - Surrounding whitespace is trimmed before anything else
// - An empty href is rejected (Empty)
// - Anything the URL grammar can't parse is rejected (Malformed)
// - Absolute hrefs are kept, relative hrefs are resolved against the page
//   they were found on
//
// The `url` crate does the standard component normalization for us:
// lowercased scheme and host, default port removal ("https://x.com:443/" ->
// "https://x.com/"), dot-segment removal and consistent percent-encoding.
// Paths are NOT case-folded: "/A" and "/a" stay distinct URLs.
// =============================================================================

use thiserror::Error;
use url::Url;

/// Why a raw href could not become a URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// Nothing left after trimming whitespace
    #[error("empty link reference")]
    Empty,
    /// Not parseable as an absolute or base-relative URL reference
    #[error("malformed link reference: {0}")]
    Malformed(#[from] url::ParseError),
}

// Normalizes a raw href found on the page at `base`
//
// Url::join handles both cases in one call: an href with its own scheme
// ignores the base entirely, anything else is resolved relative to it.
//
// Examples (base = "https://x.com/a/b/"):
//   "../c"              -> "https://x.com/a/c"
//   "/a/b"              -> "https://x.com/a/b"
//   "https://y.com:443" -> "https://y.com/"
//   "   "               -> Err(Empty)
pub fn normalize(raw: &str, base: &Url) -> Result<Url, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::Empty);
    }

    Ok(base.join(trimmed)?)
}

// Parses the crawl seed
//
// There is no base to resolve against yet, so the seed has to be absolute
// and must carry a host (a "mailto:" seed is useless as a crawl base).
pub fn parse_seed(raw: &str) -> Result<Url, NormalizeError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NormalizeError::Empty);
    }

    let url = Url::parse(trimmed)?;
    if !url.has_host() {
        return Err(NormalizeError::Malformed(url::ParseError::EmptyHost));
    }

    Ok(url)
}

// Returns the URL as it goes on the wire: fragments never reach the server,
// so "page#a" and "page#b" are the same fetch.
pub fn without_fragment(url: &Url) -> Url {
    let mut stripped = url.clone();
    stripped.set_fragment(None);
    stripped
}
