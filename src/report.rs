// src/report.rs
// =============================================================================
// This module turns a finished crawl into output.
//
// Two formats:
// - plain: one normalized URL per line, first-discovered first (default)
// - json: the whole CrawlReport, including failures and skip counts (--json)
//
// Output goes through any `impl Write`, so main() hands us a locked stdout
// and the tests hand us a Vec<u8>.
// =============================================================================

use serde::Serialize;
use std::io::{self, Write};
use tracing::info;
use url::Url;

use crate::crawl::{Frontier, NormalizeError};
use crate::fetch::FetchError;

/// Everything a crawl produced. Built once, printable any number of times.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlReport {
    pub seed: Url,
    /// Every discovered URL, in first-discovery order, no duplicates
    pub discovered: Vec<Url>,
    /// Fetches that returned a page
    pub pages_fetched: usize,
    pub failures: Vec<FetchFailure>,
    pub skipped_anchors: SkipTally,
    /// Queued pages that were never fetched (page budget hit or cancelled)
    pub pending: usize,
    pub cancelled: bool,
}

impl CrawlReport {
    /// True when every page was fetched and nothing was cut short.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && !self.cancelled
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub url: Url,
    pub kind: &'static str,
    pub message: String,
}

impl FetchFailure {
    pub fn new(url: Url, error: &FetchError) -> Self {
        Self {
            url,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Count of anchors dropped because they didn't normalize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SkipTally {
    pub empty: usize,
    pub malformed: usize,
}

impl SkipTally {
    pub fn record(&mut self, error: &NormalizeError) {
        match error {
            NormalizeError::Empty => self.empty += 1,
            NormalizeError::Malformed(_) => self.malformed += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.empty + self.malformed
    }
}

/// The ordered, deduplicated result of a crawl.
pub fn report(frontier: &Frontier) -> Vec<Url> {
    frontier.snapshot_ordered()
}

// Newline-delimited URL list
pub fn write_urls<W: Write>(mut out: W, urls: &[Url]) -> io::Result<()> {
    for url in urls {
        writeln!(out, "{}", url)?;
    }
    out.flush()
}

// Pretty-printed JSON report followed by a newline
pub fn write_json<W: Write>(mut out: W, report: &CrawlReport) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut out, report).map_err(io::Error::from)?;
    writeln!(out)?;
    out.flush()
}

// A reader that hangs up early (`| head`) just means we're done writing
pub fn tolerate_broken_pipe(result: io::Result<()>) -> io::Result<()> {
    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

// Logged, not printed: stdout is reserved for the URL list
pub fn log_summary(report: &CrawlReport) {
    info!(
        seed = %report.seed,
        discovered = report.discovered.len(),
        pages_fetched = report.pages_fetched,
        failures = report.failures.len(),
        skipped_anchors = report.skipped_anchors.total(),
        pending = report.pending,
        cancelled = report.cancelled,
        "crawl finished"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn sample_report() -> CrawlReport {
        CrawlReport {
            seed: url("https://x.com/"),
            discovered: vec![url("https://x.com/"), url("https://x.com/a")],
            pages_fetched: 1,
            failures: vec![FetchFailure::new(url("https://x.com/a"), &FetchError::Timeout)],
            skipped_anchors: SkipTally {
                empty: 2,
                malformed: 1,
            },
            pending: 0,
            cancelled: false,
        }
    }

    #[test]
    fn test_report_matches_frontier_order() {
        let frontier = Frontier::new();
        frontier.try_add(&url("https://x.com/b"));
        frontier.try_add(&url("https://x.com/a"));

        let first = report(&frontier);
        let second = report(&frontier);
        assert_eq!(first, vec![url("https://x.com/b"), url("https://x.com/a")]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_urls_one_per_line() {
        let mut out = Vec::new();
        write_urls(&mut out, &sample_report().discovered).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "https://x.com/\nhttps://x.com/a\n"
        );
    }

    #[test]
    fn test_write_urls_is_stable() {
        let report = sample_report();
        let mut first = Vec::new();
        let mut second = Vec::new();
        write_urls(&mut first, &report.discovered).unwrap();
        write_urls(&mut second, &report.discovered).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_write_json_fields() {
        let mut out = Vec::new();
        write_json(&mut out, &sample_report()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["seed"], "https://x.com/");
        assert_eq!(value["discovered"][1], "https://x.com/a");
        assert_eq!(value["failures"][0]["kind"], "timeout");
        assert_eq!(value["failures"][0]["message"], "request timed out");
        assert_eq!(value["skipped_anchors"]["empty"], 2);
        assert_eq!(value["cancelled"], false);
    }

    // Accepts a few bytes, then behaves like a closed pipe
    struct HangUp {
        budget: usize,
    }

    impl Write for HangUp {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.budget == 0 {
                return Err(io::Error::from(io::ErrorKind::BrokenPipe));
            }
            let n = buf.len().min(self.budget);
            self.budget -= n;
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_broken_pipe_ends_output_quietly() {
        let urls = sample_report().discovered;
        let result = write_urls(HangUp { budget: 5 }, &urls);
        assert_eq!(result.as_ref().map_err(|e| e.kind()), Err(io::ErrorKind::BrokenPipe));
        assert!(tolerate_broken_pipe(result).is_ok());
    }

    #[test]
    fn test_other_write_errors_still_surface() {
        let denied = Err(io::Error::from(io::ErrorKind::PermissionDenied));
        let result = tolerate_broken_pipe(denied);
        assert_eq!(result.map_err(|e| e.kind()), Err(io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_skip_tally() {
        let mut tally = SkipTally::default();
        tally.record(&NormalizeError::Empty);
        tally.record(&NormalizeError::Malformed(url::ParseError::InvalidIpv6Address));
        tally.record(&NormalizeError::Empty);
        assert_eq!(tally, SkipTally { empty: 2, malformed: 1 });
        assert_eq!(tally.total(), 3);
    }

    #[test]
    fn test_is_complete() {
        let mut report = sample_report();
        assert!(!report.is_complete());

        report.failures.clear();
        assert!(report.is_complete());

        report.cancelled = true;
        assert!(!report.is_complete());
    }
}
