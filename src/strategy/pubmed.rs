//! PubMed strategy: PMC full text first, then the publisher via DOI.

use async_trait::async_trait;
use tracing::debug;

use super::probe::{pdf_from_landing, try_direct_pdf};
use super::{Strategy, StrategyContext, StrategyOutcome};
use crate::metadata::{ResolvedIdentifiers, pmid_from_url};

const REASON_NO_IDS: &str = "No PMC and no DOI";
const REASON_NO_LANDING: &str = "Could not resolve publisher page";
const REASON_MANUAL: &str = "Publisher page (manual download)";

/// Handles `pubmed.ncbi.nlm.nih.gov` article pages.
///
/// Steps, each allowed to fail on its own:
/// 1. PMID → efetch XML (fetched once) → PMC ID and DOI
/// 2. PMC ID → PMC PDF
/// 3. DOI → publisher landing page → first PDF link
/// 4. DOI → Unpaywall open-access URL, when a contact email is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct PubMedStrategy;

#[async_trait]
impl Strategy for PubMedStrategy {
    fn name(&self) -> &'static str {
        "pubmed"
    }

    fn matches(&self, host: &str) -> bool {
        host.contains("pubmed.ncbi.nlm.nih.gov")
    }

    #[tracing::instrument(skip(self, ctx), fields(strategy = "pubmed"))]
    async fn resolve(&self, url: &str, ctx: &StrategyContext) -> StrategyOutcome {
        let ids = match pmid_from_url(url) {
            Some(pmid) => ctx.metadata.identifiers(&pmid).await,
            None => {
                debug!("no PMID in URL");
                ResolvedIdentifiers::default()
            }
        };
        debug!(doi = ?ids.doi, pmcid = ?ids.pmcid, "pubmed identifiers");

        if let Some(pmcid) = ids.pmcid.as_deref() {
            let pdf_url = ctx.metadata.endpoints().pmc_pdf(pmcid);
            if let Some(response) = try_direct_pdf(ctx, &pdf_url).await {
                return StrategyOutcome::pdf(pdf_url, response);
            }
        }

        let Some(doi) = ids.doi.as_deref() else {
            return StrategyOutcome::failed(REASON_NO_IDS);
        };

        let Some(landing) = ctx.metadata.resolve_doi(doi).await else {
            return StrategyOutcome::manual(
                REASON_NO_LANDING,
                ctx.metadata.endpoints().doi_url(doi),
            );
        };

        if let Some((pdf_url, response)) = pdf_from_landing(ctx, &landing).await {
            return StrategyOutcome::pdf(pdf_url, response);
        }

        if ctx.metadata.unpaywall_enabled()
            && let Some(oa_url) = ctx.metadata.unpaywall_lookup(doi).await
            && let Some(response) = try_direct_pdf(ctx, &oa_url).await
        {
            return StrategyOutcome::pdf(oa_url, response);
        }

        StrategyOutcome::manual(REASON_MANUAL, landing.url)
    }
}
