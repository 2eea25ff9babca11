//! CLI output formatting.
//!
//! # Output Format
//!
//! ```text
//! Optimizing images in /srv/site/img
//!
//!   photo1.JPG: 488 KB -> 92 KB (-81%)
//!   broken.jpg: skip (cannot identify image file: ...)
//! Total: 1464 KB -> 92 KB (-94%)
//! ```
//!
//! Sizes are whole kibibytes (truncated). The percentage is the size
//! reduction rounded to an integer; a file that grew shows `+N%` instead.
//! Skipped files produce no output at all, and the `Total:` line only appears
//! when at least one file was optimized.
//!
//! # Architecture
//!
//! Each `format_*` function is pure and returns lines for testability; the
//! `print_*` wrappers write them to stdout.

use crate::optimize::{FileOutcome, OptimizeEvent, RunSummary, reduction_percent};
use std::path::Path;

/// Whole kibibytes, truncated.
fn kib(bytes: u64) -> u64 {
    bytes / 1024
}

/// Signed change label: `-81%` for a reduction, `+4%` for growth.
fn format_change(before: u64, after: u64) -> String {
    let pct = reduction_percent(before, after);
    if pct < 0.0 {
        format!("+{:.0}%", -pct)
    } else {
        format!("-{:.0}%", pct)
    }
}

/// Diagnostic for a missing image directory.
pub fn format_missing_dir(dir: &Path) -> String {
    format!("No img/ directory found at {}", dir.display())
}

/// Format a single progress event as display lines.
pub fn format_event(event: &OptimizeEvent) -> Vec<String> {
    match event {
        OptimizeEvent::Started { dir } => {
            vec![format!("Optimizing images in {}", dir.display()), String::new()]
        }
        OptimizeEvent::File(outcome) => vec![format_outcome(outcome)],
    }
}

/// Format the per-file line.
pub fn format_outcome(outcome: &FileOutcome) -> String {
    match outcome {
        FileOutcome::Optimized {
            name,
            before,
            after,
        } => format!(
            "  {}: {} KB -> {} KB ({})",
            name,
            kib(*before),
            kib(*after),
            format_change(*before, *after)
        ),
        FileOutcome::Failed { name, reason, .. } => format!("  {}: skip ({})", name, reason),
    }
}

/// Format the run total, or `None` when nothing was optimized.
pub fn format_summary(summary: &RunSummary) -> Option<String> {
    summary.reduction_percent()?;
    Some(format!(
        "Total: {} KB -> {} KB ({})",
        kib(summary.total_before),
        kib(summary.total_after),
        format_change(summary.total_before, summary.total_after)
    ))
}

/// Print event lines to stdout.
pub fn print_event(event: &OptimizeEvent) {
    for line in format_event(event) {
        println!("{}", line);
    }
}

/// Print the run total to stdout, if there is one.
pub fn print_summary(summary: &RunSummary) {
    if let Some(line) = format_summary(summary) {
        println!("{}", line);
    }
}
