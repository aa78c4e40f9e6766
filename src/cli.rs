// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option can come from the command line or from the environment, with
// the command line winning. The seed URL keeps its historical name:
// `TargetUrl` as an environment variable, `--target-url` (or `--targeturl`)
// as a flag.
//
// Rust concepts:
// - Derive macros: clap generates the parser from the struct definition
// - Doc comments (///) on fields become the --help text
// =============================================================================

use clap::Parser;
use std::time::Duration;

use crate::crawl::{
    CrawlOptions, DEFAULT_CONCURRENCY, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_PAGES, DEFAULT_POLITENESS_DELAY_MS,
};

pub const DEFAULT_TARGET_URL: &str = "https://forum.dotnetdev.kr/";

#[derive(Parser, Debug)]
#[command(
    name = "link-harvest",
    version,
    about = "List every link reachable from a web page",
    long_about = "link-harvest fetches a page, collects every link on it and prints them, \
                  normalized and deduplicated, one per line. Raise --max-depth to follow \
                  links breadth-first."
)]
pub struct Cli {
    /// Page to start from
    #[arg(
        long = "target-url",
        visible_alias = "targeturl",
        env = "TargetUrl",
        default_value = DEFAULT_TARGET_URL
    )]
    pub target_url: String,

    /// How many link hops to follow from the start page
    ///
    /// 0 = fetch only the start page and list its links
    /// 1 = also fetch every page it links to
    /// etc.
    #[arg(long, env = "MAX_DEPTH", default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,

    /// Maximum number of pages to fetch
    #[arg(long, env = "MAX_PAGES", default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: usize,

    /// Number of pages fetched at the same time
    ///
    /// Above 1 the output order depends on which pages answer first.
    #[arg(long, env = "CONCURRENCY", default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,

    /// Per-page timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Milliseconds to wait before each request after the first
    #[arg(long, env = "POLITENESS_DELAY_MS", default_value_t = DEFAULT_POLITENESS_DELAY_MS)]
    pub delay_ms: u64,

    /// Only follow links that stay on the start page's host
    #[arg(long, env = "SAME_DOMAIN")]
    pub same_domain: bool,

    /// Print a JSON crawl report instead of the plain URL list
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    /// Converts the parsed CLI into `CrawlOptions`.
    pub fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            max_depth: self.max_depth,
            max_pages: self.max_pages,
            concurrency: self.concurrency,
            fetch_timeout: Duration::from_secs(self.timeout_secs),
            politeness_delay: Duration::from_millis(self.delay_ms),
            same_domain: self.same_domain,
        }
    }
}
