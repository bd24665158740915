//! arXiv strategy: rewrite abstract or PDF links to the canonical PDF URL.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::probe::try_direct_pdf;
use super::{Strategy, StrategyContext, StrategyOutcome};

static ARXIV_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = r"arxiv\.org/(abs|pdf)/([0-9]+\.[0-9]+)";
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
});

/// Returns the new-style arXiv identifier (`2301.00001`) in an `abs` or `pdf` URL.
///
/// Version suffixes are dropped: `abs/2301.00001v2` yields `2301.00001`.
#[must_use]
pub fn arxiv_id(url: &str) -> Option<&str> {
    ARXIV_ID_RE
        .captures(url)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Handles `arxiv.org`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArxivStrategy;

#[async_trait]
impl Strategy for ArxivStrategy {
    fn name(&self) -> &'static str {
        "arxiv"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("arxiv.org")
    }

    #[tracing::instrument(skip(self, ctx), fields(strategy = "arxiv"))]
    async fn resolve(&self, url: &str, ctx: &StrategyContext) -> StrategyOutcome {
        let Some(id) = arxiv_id(url) else {
            return StrategyOutcome::failed("Invalid arXiv URL");
        };

        let pdf_url = ctx.metadata.endpoints().arxiv_pdf(id);
        match try_direct_pdf(ctx, &pdf_url).await {
            Some(response) => StrategyOutcome::pdf(pdf_url, response),
            None => StrategyOutcome::failed("arXiv PDF failed"),
        }
    }
}
