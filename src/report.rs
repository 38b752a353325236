// src/report.rs
// =============================================================================
// Renders a run's results for humans or for machines.
//
// - JSON: a summary block plus every result, for CI/CD pipelines
// - Human: one line per link, broken ones with their source and error,
//   followed by a summary line. Quiet mode keeps only the broken links.
//
// Writers are generic over io::Write so tests can render into a Vec<u8>.
// =============================================================================

use anyhow::Result;
use serde::Serialize;
use std::io::Write;

use crate::checker::{broken_count, LinkResult};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    summary: Summary,
    results: &'a [LinkResult],
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct Summary {
    total: usize,
    broken: usize,
    success: usize,
}

impl Summary {
    fn of(results: &[LinkResult]) -> Self {
        let broken = broken_count(results);
        Self {
            total: results.len(),
            broken,
            success: results.len() - broken,
        }
    }
}

// Prints the results either as JSON or as human-readable lines
pub fn print_results(results: &[LinkResult], json: bool, quiet: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if json {
        write_json(&mut out, results)?;
    } else {
        write_human(&mut out, results, quiet)?;
    }
    out.flush()?;
    Ok(())
}

pub fn write_json<W: Write>(out: &mut W, results: &[LinkResult]) -> Result<()> {
    let report = JsonReport {
        summary: Summary::of(results),
        results,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_human<W: Write>(out: &mut W, results: &[LinkResult], quiet: bool) -> Result<()> {
    if !quiet {
        writeln!(out, "Results:")?;
        writeln!(out, "{}", RULE)?;
    }

    for result in results {
        if result.is_broken() {
            match result.error() {
                Some(error) => {
                    writeln!(out, "✗ [error] {}", result.url())?;
                    write_source(out, result)?;
                    writeln!(out, "  └─ Error: {}", error)?;
                }
                None => {
                    writeln!(out, "✗ [{}] {}", result.status(), result.url())?;
                    write_source(out, result)?;
                }
            }
            writeln!(out)?;
        } else if !quiet {
            writeln!(out, "✓ [{}] {}", result.status(), result.url())?;
        }
    }

    if !quiet {
        writeln!(out, "{}", RULE)?;
        writeln!(
            out,
            "Summary: {} checked, {} broken",
            results.len(),
            broken_count(results)
        )?;
    }

    Ok(())
}

fn write_source<W: Write>(out: &mut W, result: &LinkResult) -> Result<()> {
    if !result.source_url().is_empty() {
        writeln!(out, "  └─ Source: {}", result.source_url())?;
    }
    Ok(())
}
