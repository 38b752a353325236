// src/main.rs
// =============================================================================
// Entry point of the CLI.
//
// What happens here:
// 1. Parse command-line arguments and set up logging
// 2. Resolve the inputs into a flat list of URLs
// 3. One URL: crawl it. Several: check each one directly
// 4. Print the results and exit (0 = all good, 1 = broken links or bad input)
// =============================================================================

mod checker;
mod cli;
mod crawl;
mod input;
mod report;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use checker::{Fetcher, HttpFetcher, LinkResult};
use cli::Cli;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Mode {
    Crawl(String),
    Check(Vec<String>),
}

impl Mode {
    // Exactly one URL is crawled, anything more is a batch check
    fn select(mut urls: Vec<String>) -> Self {
        if urls.len() == 1 {
            Mode::Crawl(urls.remove(0))
        } else {
            Mode::Check(urls)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("Run with --help for usage.");
            1
        }
    };

    std::process::exit(exit_code);
}

// Diagnostics go to stderr so stdout only ever carries the report
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "linkwalk=debug" } else { "warn" };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let urls = input::resolve_inputs(&cli.inputs, &cli.files)?;

    let fetcher: Arc<dyn Fetcher> = Arc::new(
        HttpFetcher::new(Duration::from_secs(cli.timeout)).context("Failed to create HTTP client")?,
    );

    let banner = !cli.json && !cli.quiet;
    let results = match Mode::select(urls) {
        Mode::Crawl(start_url) => {
            if banner {
                println!("🔍 Crawling: {} (depth: {})\n", start_url, crawl::MAX_DEPTH);
            }
            crawl::crawl(fetcher, &start_url, crawl::MAX_DEPTH).await?
        }
        Mode::Check(urls) => {
            if banner {
                println!("🔍 Checking {} URLs...\n", urls.len());
            }
            checker::check_batch(fetcher, urls).await
        }
    };

    report::print_results(&results, cli.json, cli.quiet)?;

    Ok(exit_code(&results))
}

fn exit_code(results: &[LinkResult]) -> i32 {
    if checker::broken_count(results) > 0 {
        1
    } else {
        0
    }
}
