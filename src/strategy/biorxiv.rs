//! bioRxiv / medRxiv strategy: probe the conventional full-text suffixes.

use async_trait::async_trait;

use super::probe::try_suffix_pdf;
use super::{Strategy, StrategyContext, StrategyOutcome};

const PDF_SUFFIXES: [&str; 2] = [".full.pdf", "/full.pdf"];

/// Handles `biorxiv.org` and `medrxiv.org` content pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct BiorxivStrategy;

/// Drops the query string from a preprint URL.
fn strip_query(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[async_trait]
impl Strategy for BiorxivStrategy {
    fn name(&self) -> &'static str {
        "biorxiv"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("biorxiv.org") || host.contains("medrxiv.org")
    }

    #[tracing::instrument(skip(self, ctx), fields(strategy = "biorxiv"))]
    async fn resolve(&self, url: &str, ctx: &StrategyContext) -> StrategyOutcome {
        match try_suffix_pdf(ctx, strip_query(url), &PDF_SUFFIXES).await {
            Some((pdf_url, response)) => StrategyOutcome::pdf(pdf_url, response),
            None => StrategyOutcome::failed("bioRxiv PDF not found"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_query() {
        assert_eq!(
            strip_query("https://www.biorxiv.org/content/10.1101/2020.01.01.12345v1?versioned=true"),
            "https://www.biorxiv.org/content/10.1101/2020.01.01.12345v1"
        );
        assert_eq!(strip_query("https://medrxiv.org/x"), "https://medrxiv.org/x");
    }

    #[test]
    fn test_biorxiv_matches_both_servers() {
        assert!(BiorxivStrategy.matches("www.biorxiv.org"));
        assert!(BiorxivStrategy.matches("www.medrxiv.org"));
        assert!(!BiorxivStrategy.matches("arxiv.org"));
    }
}
