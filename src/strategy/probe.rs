//! Low-level probes shared by the site strategies.

use tracing::debug;

use super::StrategyContext;
use crate::fetch::{FetchOutcome, FetchRequest, is_pdf};
use crate::html::find_pdf_link;
use crate::metadata::LandingPage;

/// GETs `url` in stream mode and keeps the response only if it is a 2xx PDF.
pub async fn try_direct_pdf(ctx: &StrategyContext, url: &str) -> Option<FetchOutcome> {
    let outcome = match ctx.fetcher.fetch(FetchRequest::stream(url)).await {
        Ok(outcome) => outcome,
        Err(error) => {
            debug!(url, error = %error, "pdf probe failed");
            return None;
        }
    };

    if outcome.is_success() && is_pdf(&outcome) {
        debug!(url, "pdf probe hit");
        Some(outcome)
    } else {
        debug!(
            url,
            status = outcome.status,
            content_type = outcome.content_type.as_deref().unwrap_or(""),
            "pdf probe miss"
        );
        None
    }
}

/// Probes `base` (trailing `/` trimmed) with each suffix in order.
///
/// Returns the first URL that served a PDF together with its response.
pub async fn try_suffix_pdf(
    ctx: &StrategyContext,
    base: &str,
    suffixes: &[&str],
) -> Option<(String, FetchOutcome)> {
    let base = base.trim_end_matches('/');
    for suffix in suffixes {
        let candidate = format!("{base}{suffix}");
        if let Some(response) = try_direct_pdf(ctx, &candidate).await {
            return Some((candidate, response));
        }
    }
    None
}

/// GETs an HTML page; `None` unless the status is 200.
pub async fn landing_page(ctx: &StrategyContext, url: &str) -> Option<LandingPage> {
    let outcome = match ctx.fetcher.fetch(FetchRequest::text(url)).await {
        Ok(outcome) => outcome,
        Err(error) => {
            debug!(url, error = %error, "landing page request failed");
            return None;
        }
    };

    if outcome.status != 200 {
        debug!(url, status = outcome.status, "landing page returned non-200");
        return None;
    }

    let final_url = outcome.final_url.clone();
    outcome
        .into_text()
        .map(|html| LandingPage { url: final_url, html })
}

/// Extracts the first PDF link from `page` and probes it.
pub async fn pdf_from_landing(
    ctx: &StrategyContext,
    page: &LandingPage,
) -> Option<(String, FetchOutcome)> {
    let Some(candidate) = find_pdf_link(&page.html, &page.url) else {
        debug!(url = %page.url, "no pdf link on landing page");
        return None;
    };
    let response = try_direct_pdf(ctx, &candidate).await?;
    Some((candidate, response))
}
