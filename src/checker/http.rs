// src/checker/http.rs
// =============================================================================
// This module fetches URLs over HTTP and turns the outcome into LinkResults.
//
// Key functionality:
// - A `Fetcher` trait so the crawler and batch checker don't care whether they
//   talk to the network or to a test double
// - `HttpFetcher`: one GET per call through a shared reqwest Client
// - Categorizes transport failures (timeout, DNS, TLS, ...) into FetchError
// - `check_batch`: checks a fixed list of URLs concurrently, no recursion
//
// Rust concepts:
// - Traits + trait objects (Arc<dyn Fetcher>): swap implementations at runtime
// - async_trait: async methods in an object-safe trait
// - tokio::spawn: every check runs as its own task
// =============================================================================

use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

use super::result::{LinkResult, ResultCollection};

// Redirect hops followed before a request is given up on
const MAX_REDIRECTS: usize = 10;

// Why a request never produced a status code.
//
// The Display text is what ends up in LinkResult's `error` field and in the
// "[error] <message>" lines of the human report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("too many redirects")]
    TooManyRedirects,
    #[error("could not resolve hostname: {0}")]
    Dns(String),
    #[error("TLS error: {0}")]
    Tls(String),
    #[error("connection failed: {0}")]
    Connect(String),
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        // reqwest's own message is generic ("error sending request"), the
        // useful part lives further down the source chain
        let detail = error_chain(&error);
        let lowered = detail.to_lowercase();

        if error.is_timeout() {
            FetchError::Timeout
        } else if error.is_redirect() {
            FetchError::TooManyRedirects
        } else if error.is_builder() {
            FetchError::InvalidUrl(detail)
        } else if lowered.contains("dns") {
            FetchError::Dns(detail)
        } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl") {
            FetchError::Tls(detail)
        } else if error.is_connect() {
            FetchError::Connect(detail)
        } else {
            FetchError::Request(detail)
        }
    }
}

fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// What a completed GET returned.
#[derive(Debug, Clone)]
pub struct Fetched {
    pub status: u16,
    /// Response body, only present when the caller asked for it
    pub body: Option<String>,
    pub elapsed: Duration,
}

/// Issues a single GET against a URL.
///
/// Implementations are stateless between calls and shared by every task of a
/// run, hence `Send + Sync`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, read_body: bool) -> Result<Fetched, FetchError>;
}

// The real fetcher, backed by a reqwest Client.
//
// Client is internally reference counted, so one instance serves every task
// and they all share the connection pool.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a client whose requests are each bounded by `timeout`.
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!("linkwalk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, read_body: bool) -> Result<Fetched, FetchError> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", url, e)))?;

        let started = Instant::now();
        let response = self.client.get(parsed).send().await?;
        let status = response.status().as_u16();

        // A body that fails halfway still leaves us with a valid status, so
        // the link is reported and only link extraction is lost
        let body = if read_body {
            match response.text().await {
                Ok(text) => Some(text),
                Err(e) => {
                    tracing::warn!(url, error = %FetchError::from(e), "failed to read response body");
                    None
                }
            }
        } else {
            None
        };

        let elapsed = started.elapsed();
        tracing::debug!(url, status, elapsed_ms = elapsed.as_millis() as u64, "fetched");

        Ok(Fetched { status, body, elapsed })
    }
}

// Fetches one URL and records the outcome, without looking at the body.
//
// Used for batch checks and for probing cross-domain links during a crawl.
pub async fn check_link(fetcher: &dyn Fetcher, url: String, source_url: String) -> LinkResult {
    match fetcher.fetch(&url, false).await {
        Ok(fetched) => LinkResult::from_status(url, source_url, fetched.status),
        Err(e) => {
            tracing::debug!(url = %url, error = %e, "fetch failed");
            LinkResult::from_error(url, source_url, &e)
        }
    }
}

// Checks every URL concurrently, one task each.
//
// No deduplication happens here: a URL listed twice is fetched twice.
// Results come back in completion order, with an empty source.
pub async fn check_batch(fetcher: Arc<dyn Fetcher>, urls: Vec<String>) -> Vec<LinkResult> {
    let results = Arc::new(ResultCollection::new());

    let handles: Vec<_> = urls
        .into_iter()
        .map(|url| {
            let fetcher = Arc::clone(&fetcher);
            let results = Arc::clone(&results);
            tokio::spawn(async move {
                let result = check_link(fetcher.as_ref(), url, String::new()).await;
                results.push(result);
            })
        })
        .collect();

    for joined in join_all(handles).await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "link check task failed");
        }
    }

    results.take()
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why a trait instead of calling reqwest directly?
//    - The crawler only needs "GET this, tell me the status (and maybe body)"
//    - Tests plug in MockFetcher and never touch the network
//
// 2. Why Arc<dyn Fetcher>?
//    - tokio::spawn needs 'static data, so each task holds its own Arc
//    - dyn lets the same crawl code run against any implementation
//
// 3. Why read the body only on request?
//    - Probes and batch checks only care about the status code
//    - Skipping the body saves bandwidth on large pages
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::mock::MockFetcher;
    use crate::checker::result::broken_count;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_check_batch_mixed_outcomes() {
        let fetcher = MockFetcher::new()
            .with_page("https://ok.example/", 200, "")
            .with_page("https://missing.example/", 404, "");
        // refused.example has no route: the mock refuses the connection

        let results = check_batch(
            Arc::new(fetcher),
            vec![
                "https://ok.example/".to_string(),
                "https://missing.example/".to_string(),
                "https://refused.example/".to_string(),
            ],
        )
        .await;

        assert_eq!(results.len(), 3);
        assert_eq!(broken_count(&results), 2);
        assert!(results.iter().all(|r| r.source_url().is_empty()));

        let refused = results
            .iter()
            .find(|r| r.url() == "https://refused.example/")
            .unwrap();
        assert_eq!(refused.status(), 0);
        assert!(refused.error().is_some());

        let missing = results
            .iter()
            .find(|r| r.url() == "https://missing.example/")
            .unwrap();
        assert_eq!(missing.status(), 404);
        assert_eq!(missing.error(), None);
    }

    #[tokio::test]
    async fn test_check_batch_does_not_dedup() {
        let fetcher = Arc::new(MockFetcher::new().with_page("https://ok.example/", 200, ""));
        let results = check_batch(
            fetcher.clone(),
            vec!["https://ok.example/".to_string(), "https://ok.example/".to_string()],
        )
        .await;

        assert_eq!(results.len(), 2);
        assert_eq!(fetcher.fetch_count("https://ok.example/"), 2);
    }

    #[tokio::test]
    async fn test_check_batch_empty() {
        let results = check_batch(Arc::new(MockFetcher::new()), Vec::new()).await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_check_link_never_reads_body() {
        let fetcher = MockFetcher::new().with_page("https://ok.example/", 200, "<a href='/x'>x</a>");
        let result = check_link(&fetcher, "https://ok.example/".to_string(), "src".to_string()).await;

        assert_eq!(result.status(), 200);
        assert_eq!(result.source_url(), "src");
        assert_eq!(fetcher.body_requests(), 0);
    }

    #[tokio::test]
    async fn test_http_fetcher_rejects_invalid_url() {
        let fetcher = HttpFetcher::new(Duration::from_secs(1)).unwrap();
        let err = fetcher.fetch("://invalid", false).await.unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_http_fetcher_connection_refused() {
        // Bind then drop a listener to get a local port nobody listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();
        let result = check_link(&fetcher, format!("http://127.0.0.1:{}/", port), String::new()).await;

        assert!(result.is_broken());
        assert_eq!(result.status(), 0);
        assert!(result.error().is_some());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(FetchError::Timeout.to_string(), "request timed out");
        assert_eq!(
            FetchError::Dns("no such host".to_string()).to_string(),
            "could not resolve hostname: no such host"
        );
    }
}
