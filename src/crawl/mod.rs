// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Recursive, concurrent crawl starting from a single URL
// - Same-domain pages are followed, other domains are only probed
// - Fixed depth limit (MAX_DEPTH)
// - A shared visited set so every URL is fetched at most once per crawl
// =============================================================================

mod traverse;
mod visited;

pub use traverse::{crawl, MAX_DEPTH};
