//! Nature strategy: scrape the article page for its PDF link.

use async_trait::async_trait;

use super::probe::{landing_page, pdf_from_landing};
use super::{Strategy, StrategyContext, StrategyOutcome};

/// Handles `nature.com` article pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NatureStrategy;

#[async_trait]
impl Strategy for NatureStrategy {
    fn name(&self) -> &'static str {
        "nature"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("nature.com")
    }

    #[tracing::instrument(skip(self, ctx), fields(strategy = "nature"))]
    async fn resolve(&self, url: &str, ctx: &StrategyContext) -> StrategyOutcome {
        let Some(page) = landing_page(ctx, url).await else {
            return StrategyOutcome::failed("Nature page unreachable");
        };

        match pdf_from_landing(ctx, &page).await {
            Some((pdf_url, response)) => StrategyOutcome::pdf(pdf_url, response),
            None => StrategyOutcome::manual("Nature PDF not found", url),
        }
    }
}
