// src/crawl/engine.rs
// =============================================================================
// This module implements the crawl itself: breadth-first, deduplicated,
// bounded and cancellable.
//
// How it works:
// 1. Put the seed in the frontier and in a FIFO work queue (depth 0)
// 2. Hand queued pages to the fetcher, up to `concurrency` at a time
// 3. For every page that comes back, normalize each anchor against that
//    page's URL and record it in the frontier
// 4. Newly discovered links below max_depth go to the back of the queue
// 5. Stop when the queue is empty, max_pages fetches were made, or the
//    cancellation token fires
//
// Results are committed from this one loop only, so the frontier sees them
// one page at a time. With concurrency = 1 that makes the discovery order
// fully deterministic: pages in queue order, anchors in document order.
// With more workers, pages complete in whatever order the network decides.
//
// Politeness is enforced at dispatch: fetch start times are spaced at least
// politeness_delay apart across the whole pool, not per worker.
//
// Failures stay local: a bad anchor is counted and skipped, a failed fetch
// is recorded and yields no links. The only crawl-level errors are a seed
// that isn't a URL and a seed page that can't be fetched.
// =============================================================================

use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashSet, VecDeque};
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};
use url::Url;

use super::frontier::Frontier;
use super::normalize::{normalize, parse_seed, without_fragment, NormalizeError};
use super::options::{CrawlOptions, OptionsError};
use crate::fetch::{FetchError, PageContent, PageFetcher};
use crate::report::{self, CrawlReport, FetchFailure, SkipTally};

#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid seed URL '{seed}': {source}")]
    InvalidSeed {
        seed: String,
        source: NormalizeError,
    },
    #[error("seed {url} could not be fetched: {source}")]
    SeedUnreachable { url: Url, source: FetchError },
}

// A page waiting in the work queue
#[derive(Debug, Clone)]
struct CrawlTask {
    url: Url,
    depth: usize,
}

// A finished fetch, success or not
struct Fetched {
    task: CrawlTask,
    result: Result<PageContent, FetchError>,
}

// Per-crawl bookkeeping that ends up in the report
#[derive(Default)]
struct Tally {
    pages_fetched: usize,
    failures: Vec<FetchFailure>,
    skipped: SkipTally,
}

pub struct Crawler<F> {
    fetcher: F,
    options: CrawlOptions,
}

impl<F: PageFetcher> Crawler<F> {
    pub fn new(fetcher: F, options: CrawlOptions) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self { fetcher, options })
    }

    /// Crawls from a raw seed string, rejecting it up front if it isn't an
    /// absolute URL.
    pub async fn crawl(
        &self,
        seed: &str,
        cancel: &CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        let seed_url = parse_seed(seed).map_err(|source| CrawlError::InvalidSeed {
            seed: seed.to_string(),
            source,
        })?;
        self.crawl_url(seed_url, cancel).await
    }

    pub async fn crawl_url(
        &self,
        seed: Url,
        cancel: &CancellationToken,
    ) -> Result<CrawlReport, CrawlError> {
        info!(seed = %seed, max_depth = self.options.max_depth, "navigating site");

        let frontier = Frontier::new();
        let mut queue = VecDeque::new();
        let mut tally = Tally::default();

        frontier.try_add(&seed);
        queue.push_back(CrawlTask {
            url: without_fragment(&seed),
            depth: 0,
        });

        let mut in_flight = FuturesUnordered::new();
        let mut dispatched = 0;
        // Earliest moment the next fetch may start
        let mut next_slot = Instant::now();

        loop {
            // Top up the pool
            while in_flight.len() < self.options.concurrency
                && dispatched < self.options.max_pages
                && !cancel.is_cancelled()
            {
                let Some(task) = queue.pop_front() else {
                    break;
                };
                // Same page under another fragment, already taken care of
                if !frontier.mark_visited(&task.url) {
                    continue;
                }
                dispatched += 1;
                let start = next_slot.max(Instant::now());
                next_slot = start + self.options.politeness_delay;
                in_flight.push(self.fetch_task(task, start, cancel));
            }

            let Some(Fetched { task, result }) = in_flight.next().await else {
                break;
            };

            match result {
                Ok(page) => {
                    tally.pages_fetched += 1;
                    self.absorb_page(&frontier, &mut queue, &seed, &task, &page, &mut tally.skipped);
                }
                Err(FetchError::Cancelled) => {
                    debug!(url = %task.url, "fetch cancelled");
                    tally
                        .failures
                        .push(FetchFailure::new(task.url, &FetchError::Cancelled));
                }
                Err(error) if task.depth == 0 => {
                    // Nothing to resolve anything against
                    return Err(CrawlError::SeedUnreachable {
                        url: task.url,
                        source: error,
                    });
                }
                Err(error) => {
                    warn!(url = %task.url, kind = error.kind(), "failed to fetch: {}", error);
                    tally.failures.push(FetchFailure::new(task.url, &error));
                }
            }
        }

        debug!(
            discovered = frontier.len(),
            visited = frontier.visited_count(),
            "crawl loop finished"
        );

        Ok(CrawlReport {
            discovered: report::report(&frontier),
            seed,
            pages_fetched: tally.pages_fetched,
            failures: tally.failures,
            skipped_anchors: tally.skipped,
            pending: count_pending(&frontier, &queue),
            cancelled: cancel.is_cancelled(),
        })
    }

    // Waits for its dispatch slot, then fetches one page. Resolves early with
    // Cancelled if the token fires.
    async fn fetch_task(
        &self,
        task: CrawlTask,
        start: Instant,
        cancel: &CancellationToken,
    ) -> Fetched {
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = async {
                tokio::time::sleep_until(start).await;
                debug!(url = %task.url, depth = task.depth, "fetching page");
                self.fetcher.fetch(&task.url, self.options.fetch_timeout).await
            } => result,
        };

        Fetched { task, result }
    }

    // Records every anchor on a fetched page and queues the ones worth following
    fn absorb_page(
        &self,
        frontier: &Frontier,
        queue: &mut VecDeque<CrawlTask>,
        seed: &Url,
        task: &CrawlTask,
        page: &PageContent,
        skipped: &mut SkipTally,
    ) {
        let mut found = 0;

        // A redirect target is the same page; don't fetch it again later
        let base = page.url();
        if base != &task.url {
            debug!(requested = %task.url, served = %base, "page was redirected");
            frontier.mark_visited(base);
        }

        for raw in page.anchors() {
            // Relative links resolve against the page they're on, not the seed
            let url = match normalize(raw, base) {
                Ok(url) => url,
                Err(error) => {
                    trace!(href = %raw, page = %base, "skipping anchor: {}", error);
                    skipped.record(&error);
                    continue;
                }
            };

            // Always recorded; only followed while there is depth budget left
            if !frontier.try_add(&url) {
                continue;
            }
            found += 1;

            if task.depth < self.options.max_depth && self.should_follow(&url, seed) {
                queue.push_back(CrawlTask {
                    url: without_fragment(&url),
                    depth: task.depth + 1,
                });
            }
        }

        debug!(page = %task.url, new_links = found, "page absorbed");
    }

    // Only web pages get fetched, optionally only on the seed's host
    fn should_follow(&self, url: &Url, seed: &Url) -> bool {
        if !matches!(url.scheme(), "http" | "https") {
            return false;
        }
        !self.options.same_domain || url.host_str() == seed.host_str()
    }
}

// Queued pages that would still be fetched: fragment twins and pages already
// visited are not counted
fn count_pending(frontier: &Frontier, queue: &VecDeque<CrawlTask>) -> usize {
    queue
        .iter()
        .map(|task| &task.url)
        .filter(|url| !frontier.is_visited(url))
        .collect::<HashSet<_>>()
        .len()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why FuturesUnordered instead of tokio::spawn?
//    - The fetch futures borrow the crawler and the token, no Arc needed
//    - Dropping the set drops every in-flight request with it
//    - Completed fetches come back to this loop, which is the only place
//      the frontier and queue are mutated
//
// 2. Why `biased;` in the select?
//    - Cancellation is checked before the fetch is polled, so a token that
//      is already cancelled never starts a request
//
// 3. Why does max_pages count dispatches rather than successes?
//    - It bounds the work done against remote servers; a 500 costs the
//      server as much as a 200
// -----------------------------------------------------------------------------
