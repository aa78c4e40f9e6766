// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (stderr, so stdout stays a clean URL list)
// 2. Parse command-line arguments / environment using clap
// 3. Run the crawl, cancelling it on Ctrl-C
// 4. Print the discovered URLs (or a JSON report)
// 5. Exit with proper code (0 = complete, 1 = partial result, 2 = error)
// =============================================================================

mod cli;    // src/cli.rs - command-line parsing
mod crawl;  // src/crawl/ - normalization, frontier and the crawl engine
mod fetch;  // src/fetch/ - fetching pages and extracting anchors
mod report; // src/report.rs - output formats

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::Cli;
use crawl::Crawler;
use fetch::HttpFetcher;

#[tokio::main]
async fn main() {
    init_logging();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // Startup-class failure: bad options, bad seed, seed unreachable
            error!("{:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

// Returns:
//   Ok(0) = every page fetched, nothing cut short
//   Ok(1) = partial result (some fetches failed, or Ctrl-C)
//   Err   = nothing to report
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let fetcher = HttpFetcher::new().context("failed to build HTTP client")?;
    let crawler = Crawler::new(fetcher, cli.crawl_options()).context("invalid crawl options")?;

    let cancel = CancellationToken::new();
    spawn_ctrl_c_handler(cancel.clone());

    let report = crawler.crawl(&cli.target_url, &cancel).await?;

    let written = if cli.json {
        report::write_json(io::stdout().lock(), &report)
    } else {
        report::write_urls(io::stdout().lock(), &report.discovered)
    };
    report::tolerate_broken_pipe(written).context("failed to write output")?;

    report::log_summary(&report);

    Ok(if report.is_complete() { 0 } else { 1 })
}

// First Ctrl-C stops the crawl; whatever was discovered so far still prints
fn spawn_ctrl_c_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing with partial results");
            cancel.cancel();
        }
    });
}
