//! Reference list parsing for CLI input.

/// Splits raw input into references: one per line, trimmed, skipping blank
/// lines and `#` comments.
#[must_use]
pub fn parse_references(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
