//! Source-specific PDF strategies.
//!
//! A strategy knows how one family of sites exposes its PDFs. It receives the
//! (possibly DOI-resolved) reference URL and either hands back a PDF response
//! ready to be saved or a failure with a human-readable reason.
//!
//! # Architecture
//!
//! - [`Strategy`] - Async trait every site strategy implements
//! - [`StrategyContext`] - Transport and metadata lookups shared by all strategies
//! - [`StrategyOutcome`] - PDF found, or failure with optional fallback URL
//!
//! Strategies never return errors. Every transport failure, bad status, or
//! missing identifier is folded into [`StrategyOutcome::Failed`].

mod arxiv;
mod biorxiv;
mod cell;
mod frontiers;
mod generic;
mod nature;
mod probe;
mod pubmed;
mod science;

pub use arxiv::{ArxivStrategy, arxiv_id};
pub use biorxiv::BiorxivStrategy;
pub use cell::CellStrategy;
pub use frontiers::FrontiersStrategy;
pub use generic::GenericStrategy;
pub use nature::NatureStrategy;
pub use probe::{landing_page, pdf_from_landing, try_direct_pdf, try_suffix_pdf};
pub use pubmed::PubMedStrategy;
pub use science::ScienceStrategy;

use std::sync::Arc;

use async_trait::async_trait;

use crate::fetch::{Fetch, FetchOutcome};
use crate::metadata::MetadataClient;

/// Shared collaborators handed to every strategy call.
#[derive(Clone)]
pub struct StrategyContext {
    /// Transport for probes and landing pages.
    pub fetcher: Arc<dyn Fetch>,
    /// PubMed, DOI, and Unpaywall lookups.
    pub metadata: MetadataClient,
}

impl std::fmt::Debug for StrategyContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyContext")
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

impl StrategyContext {
    /// Creates a context over `fetcher` and `metadata`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetch>, metadata: MetadataClient) -> Self {
        Self { fetcher, metadata }
    }
}

/// Result of running one strategy.
#[derive(Debug)]
pub enum StrategyOutcome {
    /// A PDF response was obtained; its body has not been read yet.
    Pdf {
        /// URL that was probed (not the post-redirect URL).
        pdf_url: String,
        /// The successful response.
        response: FetchOutcome,
    },
    /// No PDF could be obtained.
    Failed {
        /// Human-readable reason.
        reason: String,
        /// Page the user can open to fetch the PDF by hand.
        fallback_url: Option<String>,
    },
}

impl StrategyOutcome {
    /// Successful probe of `pdf_url`.
    #[must_use]
    pub fn pdf(pdf_url: impl Into<String>, response: FetchOutcome) -> Self {
        Self::Pdf {
            pdf_url: pdf_url.into(),
            response,
        }
    }

    /// Failure without a fallback page.
    #[must_use]
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            fallback_url: None,
        }
    }

    /// Failure that points the user at a page to open by hand.
    #[must_use]
    pub fn manual(reason: impl Into<String>, fallback_url: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
            fallback_url: Some(fallback_url.into()),
        }
    }

    /// Returns true when a PDF was found.
    #[must_use]
    pub fn is_pdf(&self) -> bool {
        matches!(self, Self::Pdf { .. })
    }
}

/// Trait that all site strategies implement.
///
/// Uses `async_trait` so the router can hold `Box<dyn Strategy>`.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short identifier used in logs (e.g. "arxiv").
    fn name(&self) -> &'static str;

    /// Returns true if this strategy handles URLs on `host` (lowercase).
    fn matches(&self, host: &str) -> bool;

    /// Attempts to obtain a PDF for `url`.
    async fn resolve(&self, url: &str, ctx: &StrategyContext) -> StrategyOutcome;
}

/// Builds the site strategies in routing order. [`GenericStrategy`] is not
/// included; the router uses it when nothing else matches.
#[must_use]
pub fn default_strategies() -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(PubMedStrategy),
        Box::new(ArxivStrategy),
        Box::new(BiorxivStrategy),
        Box::new(NatureStrategy),
        Box::new(ScienceStrategy),
        Box::new(CellStrategy),
        Box::new(FrontiersStrategy),
    ]
}
