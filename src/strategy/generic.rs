//! Fallback strategy: the reference itself might be a PDF.

use async_trait::async_trait;

use super::probe::try_direct_pdf;
use super::{Strategy, StrategyContext, StrategyOutcome};

/// Probes the URL verbatim. Used when no site strategy matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericStrategy;

#[async_trait]
impl Strategy for GenericStrategy {
    fn name(&self) -> &'static str {
        "generic"
    }

    fn matches(&self, _host: &str) -> bool {
        true
    }

    #[tracing::instrument(skip(self, ctx), fields(strategy = "generic"))]
    async fn resolve(&self, url: &str, ctx: &StrategyContext) -> StrategyOutcome {
        match try_direct_pdf(ctx, url).await {
            Some(response) => StrategyOutcome::pdf(url, response),
            None => StrategyOutcome::failed("No direct PDF"),
        }
    }
}
