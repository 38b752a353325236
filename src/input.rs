// src/input.rs
// =============================================================================
// This module turns command-line inputs into one flat list of URLs.
//
// Each argument is one of:
// - a literal http:// or https:// URL
// - a document (Markdown/HTML) whose links are extracted
// - a list file with one URL per line ('#' comments and blank lines ignored)
//
// Any file that can't be read is fatal, as is ending up with no URLs at all:
// the run stops before a single request is made.
// =============================================================================

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::checker::extract_text_links;

// Extensions whose files are scanned for links rather than read line by line
const DOCUMENT_EXTENSIONS: [&str; 5] = ["md", "markdown", "mdx", "html", "htm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Url(String),
    Document(PathBuf),
    ListFile(PathBuf),
}

impl Input {
    /// Classifies a positional argument by its shape
    pub fn classify(arg: &str) -> Self {
        if is_literal_url(arg) {
            return Input::Url(arg.to_string());
        }

        let path = PathBuf::from(arg);
        let is_document = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| DOCUMENT_EXTENSIONS.iter().any(|d| ext.eq_ignore_ascii_case(d)));

        if is_document {
            Input::Document(path)
        } else {
            Input::ListFile(path)
        }
    }

    fn resolve(&self) -> Result<Vec<String>> {
        match self {
            Input::Url(url) => Ok(vec![url.clone()]),
            Input::Document(path) => {
                let content = read(path)?;
                let links = extract_text_links(&content);
                tracing::debug!(path = %path.display(), links = links.len(), "document scanned");
                Ok(links)
            }
            Input::ListFile(path) => Ok(parse_list(&read(path)?)),
        }
    }
}

// Resolves every input into URLs, in argument order.
//
// `list_files` (from --file) come first, then the positional arguments.
pub fn resolve_inputs(args: &[String], list_files: &[PathBuf]) -> Result<Vec<String>> {
    let inputs = list_files
        .iter()
        .cloned()
        .map(Input::ListFile)
        .chain(args.iter().map(|arg| Input::classify(arg)));

    let mut urls = Vec::new();
    for input in inputs {
        urls.extend(input.resolve()?);
    }

    if urls.is_empty() {
        bail!("no URLs to check");
    }

    Ok(urls)
}

fn is_literal_url(arg: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        arg.get(..scheme.len())
            .is_some_and(|start| start.eq_ignore_ascii_case(scheme))
    })
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

// One URL per line; blank lines and '#' comments are skipped
fn parse_list(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect()
}
