// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// There are no subcommands: the number of URLs the inputs resolve to picks
// the mode. One URL is crawled, several are checked directly.
// =============================================================================

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "linkwalk",
    version,
    about = "Crawl a website or check a batch of URLs for broken links",
    long_about = "linkwalk checks hyperlinks for reachability.\n\n\
                  Given exactly one URL it crawls that site (same-domain pages are followed \
                  up to depth 2, links to other domains are checked but not followed). \
                  Given several URLs, or files containing them, it checks each one directly.\n\n\
                  Exit code 0 means no broken links, 1 means broken links were found or the \
                  inputs could not be read.",
    after_help = "Examples:\n  \
                  linkwalk https://example.com                     # crawl mode (single URL)\n  \
                  linkwalk https://github.com https://google.com   # check mode (several URLs)\n  \
                  linkwalk README.md                               # check links in a document\n  \
                  linkwalk --file links.txt                        # check URLs from a list file"
)]
pub struct Cli {
    /// URLs, documents (.md, .markdown, .mdx, .html, .htm) or list files (one URL per line)
    pub inputs: Vec<String>,

    /// Read URLs from a list file (one per line, '#' starts a comment); may be repeated
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Output results as JSON for CI/CD integration
    #[arg(long)]
    pub json: bool,

    /// Only print broken links
    #[arg(short, long)]
    pub quiet: bool,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECONDS", default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: u64,

    /// Log debug diagnostics to stderr (RUST_LOG overrides)
    #[arg(short, long)]
    pub verbose: bool,
}
