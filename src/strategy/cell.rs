//! Cell Press strategy.

use async_trait::async_trait;

use super::probe::{landing_page, pdf_from_landing};
use super::{Strategy, StrategyContext, StrategyOutcome};

/// Handles `cell.com`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CellStrategy;

#[async_trait]
impl Strategy for CellStrategy {
    fn name(&self) -> &'static str {
        "cell"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("cell.com")
    }

    #[tracing::instrument(skip(self, ctx), fields(strategy = "cell"))]
    async fn resolve(&self, url: &str, ctx: &StrategyContext) -> StrategyOutcome {
        let Some(page) = landing_page(ctx, url).await else {
            return StrategyOutcome::failed("Cell page unreachable");
        };

        match pdf_from_landing(ctx, &page).await {
            Some((pdf_url, response)) => StrategyOutcome::pdf(pdf_url, response),
            None => StrategyOutcome::manual("Cell PDF not found", url),
        }
    }
}
