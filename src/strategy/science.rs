//! Science (AAAS) strategy: scrape the article page for its PDF link.

use async_trait::async_trait;

use super::probe::{landing_page, pdf_from_landing};
use super::{Strategy, StrategyContext, StrategyOutcome};

/// Handles `science.org` and legacy `sciencemag.org` article pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScienceStrategy;

#[async_trait]
impl Strategy for ScienceStrategy {
    fn name(&self) -> &'static str {
        "science"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("science.org") || host.contains("sciencemag.org")
    }

    #[tracing::instrument(skip(self, ctx), fields(strategy = "science"))]
    async fn resolve(&self, url: &str, ctx: &StrategyContext) -> StrategyOutcome {
        let Some(page) = landing_page(ctx, url).await else {
            return StrategyOutcome::failed("Science page unreachable");
        };

        match pdf_from_landing(ctx, &page).await {
            Some((pdf_url, response)) => StrategyOutcome::pdf(pdf_url, response),
            None => StrategyOutcome::manual("Science PDF not found", url),
        }
    }
}
