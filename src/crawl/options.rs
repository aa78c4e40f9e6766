// src/crawl/options.rs
// =============================================================================
// Knobs that bound a crawl.
//
// The defaults reproduce the single-page behavior: fetch the seed, collect
// every link on it, follow none of them (max_depth = 0). Deeper traversal,
// parallel fetching and domain restriction are all explicit opt-ins.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_MAX_DEPTH: usize = 0;
pub const DEFAULT_MAX_PAGES: usize = 100;
pub const DEFAULT_CONCURRENCY: usize = 1;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLITENESS_DELAY_MS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Link hops to follow from the seed (0 = only the seed is fetched)
    pub max_depth: usize,
    /// Upper bound on fetch calls, failed ones included
    pub max_pages: usize,
    /// Fetches allowed in flight at once (1 = sequential, deterministic order)
    pub concurrency: usize,
    /// Handed to the page fetcher for every request
    pub fetch_timeout: Duration,
    /// Minimum gap between the starts of two fetches, across all workers
    pub politeness_delay: Duration,
    /// Only follow links whose host matches the seed's host
    pub same_domain: bool,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: DEFAULT_CONCURRENCY,
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            politeness_delay: Duration::from_millis(DEFAULT_POLITENESS_DELAY_MS),
            same_domain: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OptionsError {
    #[error("max pages must be greater than 0")]
    ZeroMaxPages,
    #[error("concurrency must be greater than 0")]
    ZeroConcurrency,
}

impl CrawlOptions {
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_pages == 0 {
            return Err(OptionsError::ZeroMaxPages);
        }
        if self.concurrency == 0 {
            return Err(OptionsError::ZeroConcurrency);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_single_page() {
        let options = CrawlOptions::default();
        assert_eq!(options.max_depth, 0);
        assert_eq!(options.concurrency, 1);
        assert!(!options.same_domain);
        assert_eq!(options.validate(), Ok(()));
    }

    #[test]
    fn test_zero_bounds_are_rejected() {
        let no_pages = CrawlOptions {
            max_pages: 0,
            ..CrawlOptions::default()
        };
        assert_eq!(no_pages.validate(), Err(OptionsError::ZeroMaxPages));

        let no_workers = CrawlOptions {
            concurrency: 0,
            ..CrawlOptions::default()
        };
        assert_eq!(no_workers.validate(), Err(OptionsError::ZeroConcurrency));
    }
}
