// src/checker/html.rs
// =============================================================================
// This module extracts links from HTML pages.
//
// We use the `scraper` crate to parse the page and select anchor elements,
// and the `url` crate to resolve relative hrefs against the page's URL.
//
// Order of first appearance is preserved and nothing is deduplicated: the
// crawler relies on its visited set for that.
// =============================================================================

use scraper::{Html, Selector};
use std::sync::OnceLock;
use url::Url;

// Hrefs that don't point at a fetchable document
const SKIPPED_PREFIXES: [&str; 5] = ["#", "javascript:", "mailto:", "tel:", "data:"];

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    // The selector is a constant, parsing it can only fail on a typo here
    SELECTOR.get_or_init(|| Selector::parse("a[href], area[href]").expect("valid anchor selector"))
}

// Extracts every link from HTML content as an absolute URL.
//
// Parameters:
//   html: the page content
//   base_url: the URL the page was fetched from
//
// Example:
//   html = "<a href='/docs'>Docs</a>", base_url = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_markup_links(html: &str, base_url: &str) -> Vec<String> {
    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(base_url, error = %e, "invalid base URL, no links extracted");
            return Vec::new();
        }
    };

    let document = Html::parse_document(html);

    let links: Vec<String> = document
        .select(anchor_selector())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_url(&base, href))
        .collect();

    links
}

// Resolves a possibly-relative href to an absolute URL.
//
// An href that is already absolute comes back exactly as written (the
// visited set compares raw strings); only relative ones go through join().
// Returns None for empty hrefs, fragment-only hrefs, non-navigable schemes
// and anything that doesn't parse.
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || is_skipped(href) {
        return None;
    }

    match Url::parse(href) {
        Ok(_) => Some(href.to_string()),
        Err(_) => base.join(href).ok().map(String::from),
    }
}

fn is_skipped(href: &str) -> bool {
    SKIPPED_PREFIXES.iter().any(|prefix| {
        href.get(..prefix.len())
            .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
    })
}
