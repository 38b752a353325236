// src/crawl/traverse.rs
// =============================================================================
// This module crawls a website recursively and concurrently.
//
// How it works:
// 1. Every URL is handled by its own task, starting with the root at depth 0
// 2. A task claims its URL in the VisitedSet; if someone else already did,
//    the task ends without doing anything
// 3. The URL is fetched and the outcome recorded, whatever it is
// 4. Pages that failed, returned >= 400, live on another domain or sit at
//    MAX_DEPTH are not expanded
// 5. Otherwise every link on the page spawns a task:
//    - same-domain links: another traversal, one level deeper
//    - other domains: a one-shot probe that records the status and stops
// 6. A task finishes once all the tasks it spawned have finished, so when
//    the root task returns the whole tree is done
//
// There is no worker pool and no cap on in-flight requests. A page with many
// same-domain links fans out into as many simultaneous requests.
//
// Rust concepts:
// - Arc<Self>: every task holds a handle to the shared crawl state
// - BoxFuture: a recursive async fn needs a boxed, sized future type
// - tokio::spawn + join_all: concurrent children, awaited by their parent
// =============================================================================

use anyhow::{anyhow, bail, Result};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

use super::visited::VisitedSet;
use crate::checker::{check_link, extract_markup_links, Fetcher, LinkResult, ResultCollection};

/// Deepest level whose pages are still fetched; their links are not followed.
pub const MAX_DEPTH: usize = 2;

// State shared by every task of one crawl. Dropped when the crawl returns.
struct Crawler {
    fetcher: Arc<dyn Fetcher>,
    visited: VisitedSet,
    results: ResultCollection,
    // The start URL; its host and port define what "same domain" means
    root: String,
    max_depth: usize,
}

// Crawls a website starting from a URL.
//
// Parameters:
//   fetcher: how pages are fetched (shared by all tasks)
//   start_url: the URL to start from, at depth 0
//   max_depth: last depth that is fetched (MAX_DEPTH for the CLI)
//
// Returns every fetched URL's result, in completion order. Fails only when
// the start URL itself is unusable.
pub async fn crawl(fetcher: Arc<dyn Fetcher>, start_url: &str, max_depth: usize) -> Result<Vec<LinkResult>> {
    validate_start_url(start_url)?;

    let crawler = Arc::new(Crawler {
        fetcher,
        visited: VisitedSet::new(),
        results: ResultCollection::new(),
        root: start_url.to_string(),
        max_depth,
    });

    Arc::clone(&crawler)
        .traverse(start_url.to_string(), String::new(), 0)
        .await;

    tracing::debug!(
        visited = crawler.visited.len(),
        results = crawler.results.len(),
        "crawl finished"
    );

    Ok(crawler.results.take())
}

fn validate_start_url(start_url: &str) -> Result<Url> {
    let start = Url::parse(start_url).map_err(|e| anyhow!("Invalid URL '{}': {}", start_url, e))?;

    if !matches!(start.scheme(), "http" | "https") {
        bail!("Invalid URL '{}': only http and https can be crawled", start_url);
    }
    if start.host_str().is_none() {
        bail!("URL has no host: {}", start_url);
    }

    Ok(start)
}

impl Crawler {
    fn traverse(self: Arc<Self>, target: String, source: String, depth: usize) -> BoxFuture<'static, ()> {
        async move {
            if self.visited.claim(&target) {
                tracing::trace!(url = %target, "already claimed");
                return;
            }

            // Known before the request goes out, so bodies of pages that will
            // never be expanded aren't downloaded
            let expandable = depth < self.max_depth && same_domain(&target, &self.root);

            let fetched = match self.fetcher.fetch(&target, expandable).await {
                Ok(fetched) => fetched,
                Err(e) => {
                    tracing::debug!(url = %target, error = %e, "fetch failed");
                    self.results.push(LinkResult::from_error(target, source, &e));
                    return;
                }
            };

            tracing::debug!(
                url = %target,
                status = fetched.status,
                depth,
                elapsed_ms = fetched.elapsed.as_millis() as u64,
                "crawled"
            );
            self.results
                .push(LinkResult::from_status(target.clone(), source, fetched.status));

            if fetched.status >= 400 || !expandable {
                return;
            }
            let Some(body) = fetched.body else {
                return;
            };

            let links = extract_markup_links(&body, &target);
            let mut children: Vec<JoinHandle<()>> = Vec::with_capacity(links.len());

            for link in links {
                if same_domain(&link, &self.root) {
                    let child = Arc::clone(&self).traverse(link, target.clone(), depth + 1);
                    children.push(tokio::spawn(child));
                } else if !self.visited.claim(&link) {
                    let probe = Arc::clone(&self).probe(link, target.clone());
                    children.push(tokio::spawn(probe));
                }
            }

            tracing::trace!(url = %target, spawned = children.len(), "expanded");

            for joined in join_all(children).await {
                if let Err(e) = joined {
                    tracing::error!(error = %e, "crawl task failed");
                }
            }
        }
        .boxed()
    }

    // Checks a cross-domain link once. Its body is never read, so nothing
    // behind it is followed regardless of status or content.
    async fn probe(self: Arc<Self>, target: String, source: String) {
        let result = check_link(self.fetcher.as_ref(), target, source).await;
        self.results.push(result);
    }
}

// Checks if two URLs point at the same host and port.
//
// The host and port are compared exactly as written in each URL, so the
// scheme doesn't matter (http vs https is the same site) while any explicit
// port does, default or not. A URL that doesn't parse, or has no host, is
// never on the same domain as anything.
pub fn same_domain(a: &str, b: &str) -> bool {
    match (written_host(a), written_host(b)) {
        (Some(host_a), Some(host_b)) => host_a == host_b,
        _ => false,
    }
}

// Host plus explicit port as they appear in `url`, without userinfo.
//
// Url::parse only validates here: its host_str()/port() are normalized
// (lowercased host, scheme-default port dropped).
fn written_host(url: &str) -> Option<&str> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str()?;

    let (_, rest) = url.split_once("://")?;
    let end = rest.find(['/', '?', '#', '\\']).unwrap_or(rest.len());
    let authority = &rest[..end];
    let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);

    (!host.is_empty()).then_some(host)
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why claim inside the task and not before spawning?
//    - Two pages can discover the same link at the same moment
//    - Only the claim itself is atomic, so that's where the decision is made
//    - A task for an already-claimed URL costs one lock and returns
//
// 2. Why are external links claimed before spawning?
//    - A probe is a fire-once check; there's no reason to spawn a task just
//      to have it discover it lost the race
//
// 3. Why does each task wait for its children?
//    - It turns the task tree into one future: awaiting the root waits for
//      everything, with no separate counter or channel to keep in sync
//
// 4. Why is nothing locked across .await?
//    - VisitedSet and ResultCollection use std Mutex guards that are dropped
//      before the next network call, keeping critical sections short
// -----------------------------------------------------------------------------
