//! PDF link extraction from landing-page HTML.
//!
//! The scan is deliberately naive: the first anchor whose `href` mentions
//! `.pdf` wins. There is no ranking between multiple candidates.

use scraper::{Html, Selector};
use tracing::trace;
use url::Url;

/// Returns the first anchor `href` containing `.pdf` (case-insensitive), made absolute.
///
/// Root-relative hrefs take the scheme and host of `base_url`; other relative
/// hrefs are joined against it. When `base_url` cannot be parsed or is not
/// http(s), relative hrefs are returned as written.
///
/// # Examples
///
/// ```
/// use paper_downloader_core::html::find_pdf_link;
///
/// let html = r#"<a href="/about">About</a><a href="/content/paper.pdf">PDF</a>"#;
/// assert_eq!(
///     find_pdf_link(html, "https://www.nature.com/articles/s41586").as_deref(),
///     Some("https://www.nature.com/content/paper.pdf")
/// );
/// ```
#[must_use]
pub fn find_pdf_link(html: &str, base_url: &str) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    let document = Html::parse_document(html);

    let href = document
        .select(&selector)
        .filter_map(|anchor| anchor.value().attr("href"))
        .map(str::trim)
        .find(|href| href.to_ascii_lowercase().contains(".pdf"))?;

    trace!(href, base_url, "matched pdf anchor");
    Some(absolutize(href, base_url))
}

fn absolutize(href: &str, base_url: &str) -> String {
    let lower = href.to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return href.to_string();
    }

    let Ok(base) = Url::parse(base_url) else {
        return href.to_string();
    };
    if !matches!(base.scheme(), "http" | "https") {
        return href.to_string();
    }

    if let Some(rest) = href.strip_prefix("//") {
        return format!("{}://{rest}", base.scheme());
    }

    if href.starts_with('/') {
        return format!("{}{href}", base.origin().ascii_serialization());
    }

    base.join(href)
        .map_or_else(|_| href.to_string(), |joined| joined.to_string())
}
