//! Reference routing: DOI redirect resolution, then host classification.

use std::time::Duration;

use tracing::{debug, instrument};
use url::Url;

use crate::fetch::{DOI_REDIRECT_TIMEOUT_SECS, FetchRequest};
use crate::metadata::{is_bare_doi, is_doi_reference};
use crate::strategy::{GenericStrategy, Strategy, StrategyContext, default_strategies};

/// The strategy chosen for a reference and the URL it should run on.
pub struct Route<'a> {
    /// Selected strategy.
    pub strategy: &'a dyn Strategy,
    /// URL after DOI resolution.
    pub url: String,
}

impl std::fmt::Debug for Route<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Route")
            .field("strategy", &self.strategy.name())
            .field("url", &self.url)
            .finish()
    }
}

/// Ordered table of site strategies with a generic fallback.
///
/// The first strategy whose [`Strategy::matches`] accepts the host wins.
/// Registering a strategy is the only change needed to support a new site.
pub struct Router {
    strategies: Vec<Box<dyn Strategy>>,
    fallback: GenericStrategy,
    doi_timeout: Duration,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.strategies.iter().map(|s| s.name()).collect();
        f.debug_struct("Router")
            .field("strategies", &names)
            .field("doi_timeout", &self.doi_timeout)
            .finish()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::with_default_strategies()
    }
}

impl Router {
    /// Creates an empty router; every reference goes to the generic strategy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            fallback: GenericStrategy,
            doi_timeout: Duration::from_secs(DOI_REDIRECT_TIMEOUT_SECS),
        }
    }

    /// Creates a router with every built-in site strategy.
    #[must_use]
    pub fn with_default_strategies() -> Self {
        let mut router = Self::new();
        for strategy in default_strategies() {
            router.register(strategy);
        }
        router
    }

    /// Overrides the timeout of the DOI redirect probe.
    #[must_use]
    pub fn with_doi_timeout(mut self, timeout: Duration) -> Self {
        self.doi_timeout = timeout;
        self
    }

    /// Appends a strategy after those already registered.
    pub fn register(&mut self, strategy: Box<dyn Strategy>) {
        debug!(strategy = strategy.name(), "registered strategy");
        self.strategies.push(strategy);
    }

    /// Follows a DOI reference to its landing URL.
    ///
    /// Non-DOI references are returned unchanged. Bare DOIs are first turned
    /// into resolver URLs. When the probe fails or does not end in a 200, the
    /// normalized reference is returned.
    #[instrument(skip(self, ctx))]
    pub async fn resolve_reference(&self, reference: &str, ctx: &StrategyContext) -> String {
        let reference = reference.trim();
        if !is_doi_reference(reference) {
            return reference.to_string();
        }

        let normalized = if is_bare_doi(reference) {
            ctx.metadata.endpoints().doi_url(reference)
        } else {
            reference.to_string()
        };

        let request = FetchRequest::stream(&normalized).with_timeout(self.doi_timeout);
        match ctx.fetcher.fetch(request).await {
            Ok(outcome) if outcome.status == 200 => {
                debug!(final_url = %outcome.final_url, "DOI resolved");
                outcome.final_url
            }
            Ok(outcome) => {
                debug!(status = outcome.status, "DOI probe returned non-200");
                normalized
            }
            Err(error) => {
                debug!(error = %error, "DOI probe failed");
                normalized
            }
        }
    }

    /// Picks the strategy for `url` by case-insensitive host match.
    #[must_use]
    pub fn classify(&self, url: &str) -> &dyn Strategy {
        let host = Url::parse(url)
            .ok()
            .and_then(|parsed| parsed.host_str().map(str::to_ascii_lowercase))
            .unwrap_or_default();

        match self
            .strategies
            .iter()
            .find(|strategy| !host.is_empty() && strategy.matches(&host))
        {
            Some(strategy) => strategy.as_ref(),
            None => &self.fallback,
        }
    }

    /// Resolves `reference` and selects its strategy.
    pub async fn route(&self, reference: &str, ctx: &StrategyContext) -> Route<'_> {
        let url = self.resolve_reference(reference, ctx).await;
        let strategy = self.classify(&url);
        debug!(strategy = strategy.name(), url = %url, "routed reference");
        Route { strategy, url }
    }
}
