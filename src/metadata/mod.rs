//! Metadata lookups that turn one identifier into another.
//!
//! - PubMed efetch: PMID → DOI and PMC ID
//! - DOI resolver: DOI → publisher landing page
//! - Unpaywall: DOI → open-access URL
//!
//! Every lookup returns `Option`. A transport error, a non-200 status, or an
//! unparseable body all collapse to `None`; the reason is logged at debug.

mod doi;
mod pubmed;
mod unpaywall;

pub use doi::{is_bare_doi, is_doi_reference};
pub use pubmed::{ArticleIds, parse_article_ids, pmid_from_url};
pub use unpaywall::{OaLocation, UnpaywallRecord};

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::endpoints::Endpoints;
use crate::fetch::{Fetch, FetchRequest};

/// Identifiers gathered for one reference.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedIdentifiers {
    /// PubMed ID.
    pub pmid: Option<String>,
    /// Digital Object Identifier.
    pub doi: Option<String>,
    /// PubMed Central ID (`PMC…`).
    pub pmcid: Option<String>,
}

/// A publisher landing page reached through the DOI resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingPage {
    /// URL after redirects.
    pub url: String,
    /// Page body.
    pub html: String,
}

/// Metadata lookups over a shared [`Fetch`] transport.
#[derive(Clone)]
pub struct MetadataClient {
    fetcher: Arc<dyn Fetch>,
    endpoints: Endpoints,
    unpaywall_email: Option<String>,
}

impl std::fmt::Debug for MetadataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetadataClient")
            .field("endpoints", &self.endpoints)
            .field("unpaywall_email", &self.unpaywall_email)
            .finish_non_exhaustive()
    }
}

impl MetadataClient {
    /// Creates a client without Unpaywall access.
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetch>, endpoints: Endpoints) -> Self {
        Self {
            fetcher,
            endpoints,
            unpaywall_email: None,
        }
    }

    /// Enables Unpaywall lookups with `email` as the contact address.
    ///
    /// A blank email leaves Unpaywall disabled.
    #[must_use]
    pub fn with_unpaywall_email(mut self, email: Option<String>) -> Self {
        self.unpaywall_email = email
            .map(|e| e.trim().to_string())
            .filter(|e| !e.is_empty());
        self
    }

    /// Service base URLs in use.
    #[must_use]
    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Returns true when an Unpaywall contact email is configured.
    #[must_use]
    pub fn unpaywall_enabled(&self) -> bool {
        self.unpaywall_email.is_some()
    }

    /// Fetches the efetch XML document for `pmid`.
    #[instrument(skip(self))]
    pub async fn pubmed_fetch_xml(&self, pmid: &str) -> Option<String> {
        self.get_text(&self.endpoints.pubmed_efetch(pmid))
            .await
            .map(|(_, body)| body)
    }

    /// DOI of the article `pmid`, if PubMed knows one.
    pub async fn doi_of(&self, pmid: &str) -> Option<String> {
        let xml = self.pubmed_fetch_xml(pmid).await?;
        parse_article_ids(&xml).doi
    }

    /// PMC ID of the article `pmid`, if it has one.
    pub async fn pmcid_of(&self, pmid: &str) -> Option<String> {
        let xml = self.pubmed_fetch_xml(pmid).await?;
        parse_article_ids(&xml).pmcid
    }

    /// Reads DOI and PMC ID from a single efetch call.
    pub async fn identifiers(&self, pmid: &str) -> ResolvedIdentifiers {
        let ids = match self.pubmed_fetch_xml(pmid).await {
            Some(xml) => parse_article_ids(&xml),
            None => ArticleIds::default(),
        };
        ResolvedIdentifiers {
            pmid: Some(pmid.to_string()),
            doi: ids.doi,
            pmcid: ids.pmcid,
        }
    }

    /// Follows the DOI resolver to the publisher landing page.
    #[instrument(skip(self))]
    pub async fn resolve_doi(&self, doi: &str) -> Option<LandingPage> {
        self.get_text(&self.endpoints.doi_url(doi))
            .await
            .map(|(url, html)| LandingPage { url, html })
    }

    /// Asks Unpaywall for an open-access URL.
    ///
    /// Always `None` when no contact email is configured; no request is made.
    #[instrument(skip(self))]
    pub async fn unpaywall_lookup(&self, doi: &str) -> Option<String> {
        let email = self.unpaywall_email.as_deref()?;
        let (_, body) = self
            .get_text(&self.endpoints.unpaywall_record(doi, email))
            .await?;

        match serde_json::from_str::<UnpaywallRecord>(&body) {
            Ok(record) => record.preferred_url(),
            Err(error) => {
                debug!(doi, error = %error, "unparseable Unpaywall response");
                None
            }
        }
    }

    /// Text GET that only accepts a 200 response. Returns `(final_url, body)`.
    async fn get_text(&self, url: &str) -> Option<(String, String)> {
        let outcome = match self.fetcher.fetch(FetchRequest::text(url)).await {
            Ok(outcome) => outcome,
            Err(error) => {
                debug!(url, error = %error, "metadata request failed");
                return None;
            }
        };

        if outcome.status != 200 {
            debug!(url, status = outcome.status, "metadata request returned non-200");
            return None;
        }

        let final_url = outcome.final_url.clone();
        outcome.into_text().map(|body| (final_url, body))
    }
}
