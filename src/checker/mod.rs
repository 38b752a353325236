// src/checker/mod.rs
// =============================================================================
// This module contains everything about checking a single link.
//
// Submodules:
// - http: Fetcher trait, the reqwest-backed fetcher and the batch checker
// - result: LinkResult and the shared ResultCollection
// - markdown: Extracts links from loosely formatted text (Markdown, plain)
// - html: Extracts links from HTML pages
// =============================================================================

mod html;
mod http;
mod markdown;
mod result;

#[cfg(test)]
pub mod mock;

pub use html::extract_markup_links;
pub use http::{check_batch, check_link, FetchError, Fetcher, HttpFetcher};
pub use markdown::extract_text_links;
pub use result::{broken_count, LinkResult, ResultCollection};
