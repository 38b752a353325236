// src/checker/markdown.rs
// =============================================================================
// This module extracts links from loosely formatted text (Markdown files,
// READMEs, plain notes).
//
// Two kinds of links are recognized:
// - Markdown link syntax, `[text](url)`, found with `pulldown-cmark`
// - Bare `http(s)://` URLs anywhere else in the text, found with `regex`
//
// A bare URL that sits inside a link's span is the same link, so it is not
// counted twice. Output is in document order with duplicates removed.
//
// Rust concepts:
// - into_offset_iter(): parser events paired with their byte ranges
// - OnceLock: compile the regex once, on first use
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::OnceLock;

fn bare_url_regex() -> &'static Regex {
    static BARE_URL: OnceLock<Regex> = OnceLock::new();
    BARE_URL.get_or_init(|| {
        Regex::new(r#"https?://[^\s<>"{}|\\^\[\]`()]+"#).expect("valid bare URL pattern")
    })
}

// Extracts all absolute HTTP/HTTPS links from text.
//
// Example input:
//   "Check out [Rust](https://www.rust-lang.org) and https://crates.io"
//
// Example output:
//   ["https://www.rust-lang.org", "https://crates.io"]
pub fn extract_text_links(text: &str) -> Vec<String> {
    // (position in the document, url)
    let mut found: Vec<(usize, String)> = Vec::new();
    let mut link_spans: Vec<Range<usize>> = Vec::new();

    for (event, range) in Parser::new(text).into_offset_iter() {
        if let Event::Start(Tag::Link(_link_type, dest_url, _title)) = event {
            let url = dest_url.trim();
            if is_http_link(url) {
                found.push((range.start, url.to_string()));
            }
            // Relative targets are dropped, but a bare URL inside their span
            // still belongs to the link, so the span is kept either way
            link_spans.push(range);
        }
    }

    for bare in bare_url_regex().find_iter(text) {
        let inside_link = link_spans
            .iter()
            .any(|span| bare.start() >= span.start && bare.end() <= span.end);
        if !inside_link {
            found.push((bare.start(), bare.as_str().to_string()));
        }
    }

    // Stable sort: a link and its text can't share a start position anyway
    found.sort_by_key(|(position, _)| *position);

    let mut seen = HashSet::new();
    found
        .into_iter()
        .map(|(_, url)| url)
        .filter(|url| seen.insert(url.clone()))
        .collect()
}

fn is_http_link(url: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        url.get(..scheme.len())
            .is_some_and(|start| start.eq_ignore_ascii_case(scheme))
    })
}
