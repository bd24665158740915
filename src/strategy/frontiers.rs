//! Frontiers strategy: `/pdf` suffix first, then the article page.

use async_trait::async_trait;

use super::probe::{landing_page, pdf_from_landing, try_suffix_pdf};
use super::{Strategy, StrategyContext, StrategyOutcome};

/// Handles `frontiersin.org`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrontiersStrategy;

#[async_trait]
impl Strategy for FrontiersStrategy {
    fn name(&self) -> &'static str {
        "frontiers"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("frontiersin.org")
    }

    #[tracing::instrument(skip(self, ctx), fields(strategy = "frontiers"))]
    async fn resolve(&self, url: &str, ctx: &StrategyContext) -> StrategyOutcome {
        if let Some((pdf_url, response)) = try_suffix_pdf(ctx, url, &["/pdf"]).await {
            return StrategyOutcome::pdf(pdf_url, response);
        }

        // An unreachable page is not reported separately; the user still gets the article URL.
        if let Some(page) = landing_page(ctx, url).await
            && let Some((pdf_url, response)) = pdf_from_landing(ctx, &page).await
        {
            return StrategyOutcome::pdf(pdf_url, response);
        }

        StrategyOutcome::manual("Frontiers PDF not found", url)
    }
}
