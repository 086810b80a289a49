//! Terminal header and summary output
//!
//! Plain styled output around the run; per-file detail goes through tracing.

use crate::pipeline::ShadowReport;
use console::style;
use humansize::{format_size, BINARY};

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let bytes: Vec<_> = s.bytes().rev().collect();

    let chunks: Vec<String> = bytes
        .chunks(3)
        .map(|chunk| chunk.iter().rev().map(|&b| b as char).collect::<String>())
        .collect();

    chunks.into_iter().rev().collect::<Vec<_>>().join(",")
}

/// Print a header at the start of the run
pub fn print_header(input: &str, output: &str, workers: usize) {
    println!();
    println!(
        "{} {}",
        style("photo-shadow").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("{}", style("─".repeat(50)).dim());
    println!("  {} {}", style("Source:").bold(), input);
    println!("  {} {}", style("Output:").bold(), output);
    println!("  {} {}", style("Workers:").bold(), workers);
    println!();
}

/// Print a summary of the completed run
pub fn print_summary(report: &ShadowReport) {
    let duration_secs = report.duration.as_secs_f64();

    println!();
    println!("{}", style("Shadow Tree Complete").green().bold());
    println!("{}", style("─".repeat(50)).dim());
    println!(
        "  {} {}",
        style("Files scanned:").bold(),
        format_number(report.scanned)
    );
    println!(
        "  {} {} ({})",
        style("Queued:").bold(),
        format_number(report.queued),
        format_size(report.queued_bytes, BINARY)
    );
    println!(
        "  {} {} non-image, {} already linked",
        style("Skipped:").bold(),
        format_number(report.skipped_non_image),
        format_number(report.skipped_existing)
    );
    println!(
        "  {} {} ({} without EXIF date)",
        style("Dates extracted:").bold(),
        format_number(report.extracted),
        format_number(report.no_exif)
    );
    println!(
        "  {} {} created, {} pre-existing",
        style("Links:").bold(),
        format_number(report.links_created),
        format_number(report.links_skipped)
    );
    if report.failed > 0 {
        println!(
            "  {} {}",
            style("Extraction failures:").yellow().bold(),
            format_number(report.failed)
        );
    }
    println!("  {} {:.1}s", style("Duration:").bold(), duration_secs);
    println!();
}
