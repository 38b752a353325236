// src/crawl/visited.rs
// =============================================================================
// Thread-safe set of URLs that some task has already claimed for fetching.
//
// This is the only thing that stops the crawler from fetching a page twice:
// tasks are spawned for every discovered link, and each one claims its URL
// before doing anything else. The check-and-insert happens under one lock,
// so among any number of concurrent claimants exactly one wins.
//
// URLs are compared as exact strings. No normalization happens, so
// "http://x.com" and "http://x.com/" are two different URLs.
// =============================================================================

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for the caller.
    ///
    /// Returns `false` the first time a URL is claimed (the caller owns it and
    /// should fetch it) and `true` for every later claim of the same string.
    pub fn claim(&self, url: &str) -> bool {
        let mut urls = self.urls.lock().unwrap_or_else(PoisonError::into_inner);
        if urls.contains(url) {
            return true;
        }
        urls.insert(url.to_string());
        false
    }

    pub fn len(&self) -> usize {
        self.urls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
