// MockFetcher - in-memory Fetcher for tests
//
// Serves canned pages keyed by exact URL string and records every call, so
// tests can assert on what was (and wasn't) fetched without a network.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::http::{FetchError, Fetched, Fetcher};

#[derive(Debug, Clone)]
enum Route {
    Page { status: u16, body: String },
    Fail(FetchError),
}

#[derive(Debug, Clone)]
pub struct FetchCall {
    pub url: String,
    pub read_body: bool,
}

#[derive(Debug, Default)]
pub struct MockFetcher {
    routes: HashMap<String, Route>,
    delay: Option<Duration>,
    calls: Arc<Mutex<Vec<FetchCall>>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` with `status` for exactly this URL string
    pub fn with_page(mut self, url: &str, status: u16, body: &str) -> Self {
        self.routes.insert(
            url.to_string(),
            Route::Page {
                status,
                body: body.to_string(),
            },
        );
        self
    }

    /// Fail every request to this URL with `error`
    pub fn with_failure(mut self, url: &str, error: FetchError) -> Self {
        self.routes.insert(url.to_string(), Route::Fail(error));
        self
    }

    /// Sleep before answering, so concurrent tasks overlap
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.url == url).count()
    }

    pub fn was_fetched(&self, url: &str) -> bool {
        self.fetch_count(url) > 0
    }

    pub fn body_requests(&self) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| c.read_body).count()
    }
}

#[async_trait]
impl Fetcher for MockFetcher {
    async fn fetch(&self, url: &str, read_body: bool) -> Result<Fetched, FetchError> {
        self.calls.lock().unwrap().push(FetchCall {
            url: url.to_string(),
            read_body,
        });

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.routes.get(url) {
            Some(Route::Page { status, body }) => Ok(Fetched {
                status: *status,
                body: read_body.then(|| body.clone()),
                elapsed: self.delay.unwrap_or_default(),
            }),
            Some(Route::Fail(error)) => Err(error.clone()),
            None => Err(FetchError::Connect("connection refused".to_string())),
        }
    }
}
