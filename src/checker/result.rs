// src/checker/result.rs
// =============================================================================
// The outcome of fetching one URL, and the shared collection that every
// concurrent task appends its outcome to.
//
// A LinkResult is built exactly once per fetched URL and never changes
// afterwards. Its `broken` flag is derived in the constructors, so it always
// equals "an error is present OR status >= 400".
// =============================================================================

use serde::Serialize;
use std::sync::{Mutex, PoisonError};

use super::http::FetchError;

/// Result of fetching a single link.
///
/// Serializes to the JSON report shape:
/// `{"url", "status", "error"?, "broken", "source"?}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkResult {
    url: String,
    /// HTTP status code, 0 when the request never completed
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    broken: bool,
    /// Page the link was found on; empty for the crawl root and batch checks
    #[serde(rename = "source", skip_serializing_if = "String::is_empty")]
    source_url: String,
}

impl LinkResult {
    /// A fetch that produced an HTTP response.
    pub fn from_status(url: impl Into<String>, source_url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
            error: None,
            broken: status >= 400,
            source_url: source_url.into(),
        }
    }

    /// A fetch that failed before any response arrived.
    pub fn from_error(
        url: impl Into<String>,
        source_url: impl Into<String>,
        error: &FetchError,
    ) -> Self {
        Self {
            url: url.into(),
            status: 0,
            error: Some(error.to_string()),
            broken: true,
            source_url: source_url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }
}

// Append-only sequence of results shared by all tasks of one run.
//
// The lock is held only for the push itself, never across a network call.
#[derive(Debug, Default)]
pub struct ResultCollection {
    results: Mutex<Vec<LinkResult>>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: LinkResult) {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result);
    }

    pub fn len(&self) -> usize {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Takes every collected result out, in insertion order.
    pub fn take(&self) -> Vec<LinkResult> {
        std::mem::take(&mut *self.results.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Number of results flagged as broken.
pub fn broken_count(results: &[LinkResult]) -> usize {
    results.iter().filter(|r| r.is_broken()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        for (status, broken) in [(200, false), (301, false), (399, false), (400, true), (404, true), (503, true)] {
            let result = LinkResult::from_status("https://example.com", "", status);
            assert_eq!(result.is_broken(), broken, "status {}", status);
            assert_eq!(result.is_broken(), result.error().is_some() || result.status() >= 400);
        }
    }

    #[test]
    fn test_error_is_always_broken() {
        let result = LinkResult::from_error("https://example.com", "", &FetchError::Timeout);
        assert!(result.is_broken());
        assert_eq!(result.status(), 0);
        assert_eq!(result.error(), Some("request timed out"));
    }

    #[test]
    fn test_json_shape_omits_empty_fields() {
        let result = LinkResult::from_status("https://example.com/a", "", 200);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"url": "https://example.com/a", "status": 200, "broken": false})
        );

        let result = LinkResult::from_error(
            "https://example.com/b",
            "https://example.com/",
            &FetchError::Connect("connection refused".to_string()),
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["source"], "https://example.com/");
        assert_eq!(json["broken"], true);
        assert_eq!(json["status"], 0);
        assert!(json["error"].as_str().unwrap().contains("connection refused"));
    }

    #[test]
    fn test_collection_keeps_insertion_order() {
        let collection = ResultCollection::new();
        collection.push(LinkResult::from_status("https://a.com", "", 200));
        collection.push(LinkResult::from_status("https://b.com", "", 404));
        assert_eq!(collection.len(), 2);

        let results = collection.take();
        assert_eq!(results[0].url(), "https://a.com");
        assert_eq!(results[1].url(), "https://b.com");
        assert_eq!(broken_count(&results), 1);
        assert_eq!(collection.len(), 0);
    }
}
