//! Terminal output: progress bar and report rendering.

use std::fmt::Write as _;

use indicatif::{ProgressBar, ProgressStyle};
use paper_downloader_core::{BatchReport, Outcome, ResolutionResult};

pub(crate) fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

pub(crate) fn should_show_progress(stderr_is_terminal: bool, quiet: bool, dumb_terminal: bool) -> bool {
    stderr_is_terminal && !quiet && !dumb_terminal
}

/// Progress bar over `total` references.
pub(crate) fn progress_bar(total: usize) -> ProgressBar {
    let bar = ProgressBar::new(u64::try_from(total).unwrap_or(u64::MAX));
    bar.set_style(
        ProgressStyle::with_template("{spinner} [{pos}/{len}] {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

/// One-line status for the progress bar message.
pub(crate) fn progress_message(result: &ResolutionResult) -> String {
    let status = if result.success() { "ok" } else { "failed" };
    format!("{status}: {}", result.source_reference)
}

/// Renders the human-readable report for stdout.
pub(crate) fn render_report(report: &BatchReport) -> String {
    let mut out = String::new();
    for result in &report.results {
        match &result.outcome {
            Outcome::Downloaded { local_path, .. } => {
                let _ = writeln!(out, "[ok]     {}", result.source_reference);
                let _ = writeln!(out, "         -> {}", local_path.display());
            }
            Outcome::ManualAction {
                fallback_url,
                reason,
            } => {
                let _ = writeln!(out, "[manual] {}: {reason}", result.source_reference);
                let _ = writeln!(out, "         -> {fallback_url}");
            }
            Outcome::NotFound { reason } => {
                let _ = writeln!(out, "[failed] {}: {reason}", result.source_reference);
            }
        }
    }

    let summary = report.summary;
    let _ = writeln!(
        out,
        "\nDownloaded {}, manual {}, not found {} (of {})",
        summary.downloaded,
        summary.manual,
        summary.not_found,
        summary.total()
    );
    out
}
