// src/crawl/mod.rs
// =============================================================================
// This module handles link crawling.
//
// Features:
// - URL normalization: raw hrefs -> absolute, comparable URLs
// - A frontier that deduplicates every discovered URL
// - Breadth-first crawling from a seed, bounded by depth and page count
// - Optional bounded worker pool and cooperative cancellation
//
// With default options only the seed page is fetched and every link on it
// is collected, which is the classic "list the links on this page" job.
// =============================================================================

mod engine;
mod frontier;
mod normalize;
mod options;

pub use engine::Crawler;
pub use frontier::Frontier;
pub use normalize::NormalizeError;
pub use options::{
    CrawlOptions, DEFAULT_CONCURRENCY, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_PAGES, DEFAULT_POLITENESS_DELAY_MS,
};
