//! Batch orchestration: route every reference, run its strategy, save the PDF.
//!
//! # Overview
//!
//! [`Downloader::download_all`] turns a list of references into a
//! [`BatchReport`] with exactly one [`ResolutionResult`] per input, in input
//! order. Individual failures never abort the batch.
//!
//! # Concurrency Model
//!
//! - Default concurrency is 1: each reference is fully resolved before the next starts
//! - Higher limits (up to 16) run references in separate Tokio tasks, at most
//!   `concurrency` in flight, joined in input order
//! - Within one reference the strategy's steps always run in order
//! - The only shared state is the output directory and its claimed filenames
//! - Filenames are claimed in input order, so collision suffixes do not depend
//!   on which download finishes first

mod error;
mod report;
mod store;

pub use error::StoreError;
pub use report::{BatchReport, BatchSummary, Outcome, ResolutionResult};
pub use store::{PdfStore, derive_filename};

use std::path::{Path, PathBuf};
use std::pin::pin;
use std::sync::Arc;

use futures_util::{StreamExt, stream};
use tokio::sync::oneshot;
use tracing::{debug, info, instrument, warn};

use crate::router::Router;
use crate::strategy::{StrategyContext, StrategyOutcome};

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 16;

/// Default concurrency: strictly sequential.
pub const DEFAULT_CONCURRENCY: usize = 1;

/// Errors that stop a whole batch.
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// The output directory could not be created.
    #[error("cannot prepare output directory: {0}")]
    OutputDir(#[source] StoreError),
}

/// Resolves and downloads batches of references.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use paper_downloader_core::{
///     Downloader, Endpoints, HttpFetcher, MetadataClient, StrategyContext,
/// };
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = Arc::new(HttpFetcher::new()?);
/// let metadata = MetadataClient::new(fetcher.clone(), Endpoints::default());
/// let downloader = Downloader::new(StrategyContext::new(fetcher, metadata), "papers");
///
/// let report = downloader
///     .download_all(&["https://arxiv.org/abs/1706.03762", "10.1038/s41586-020-2649-2"])
///     .await?;
/// println!("downloaded {} of {}", report.summary.downloaded, report.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Downloader {
    router: Arc<Router>,
    ctx: StrategyContext,
    output_dir: PathBuf,
    concurrency: usize,
}

impl Downloader {
    /// Creates a sequential downloader with the default strategy table.
    #[must_use]
    pub fn new(ctx: StrategyContext, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            router: Arc::new(Router::with_default_strategies()),
            ctx,
            output_dir: output_dir.into(),
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Replaces the router.
    #[must_use]
    pub fn with_router(mut self, router: Router) -> Self {
        self.router = Arc::new(router);
        self
    }

    /// Sets how many references may be in flight at once.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-16).
    pub fn with_concurrency(mut self, concurrency: usize) -> Result<Self, BatchError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(BatchError::InvalidConcurrency { value: concurrency });
        }
        self.concurrency = concurrency;
        Ok(self)
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the output directory.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Processes every reference and returns the ordered report.
    ///
    /// # Errors
    ///
    /// Returns [`BatchError::OutputDir`] when the output directory cannot be
    /// created. Per-reference failures are recorded in the report.
    pub async fn download_all<S: AsRef<str>>(
        &self,
        references: &[S],
    ) -> Result<BatchReport, BatchError> {
        self.download_all_with(references, |_| {}).await
    }

    /// Like [`Self::download_all`], calling `on_result` as each result becomes
    /// available, in input order.
    ///
    /// # Errors
    ///
    /// See [`Self::download_all`].
    #[instrument(skip(self, references, on_result), fields(count = references.len(), concurrency = self.concurrency))]
    pub async fn download_all_with<S, F>(
        &self,
        references: &[S],
        mut on_result: F,
    ) -> Result<BatchReport, BatchError>
    where
        S: AsRef<str>,
        F: FnMut(&ResolutionResult),
    {
        let store = Arc::new(PdfStore::new(&self.output_dir));
        store.ensure_dir().await.map_err(BatchError::OutputDir)?;

        info!(output_dir = %self.output_dir.display(), "starting batch");

        let mut previous_claim: Option<oneshot::Receiver<()>> = None;
        let tasks = references.iter().map(|reference| {
            let reference = reference.as_ref().to_string();
            let (done, next_claim) = oneshot::channel();
            let turn = ClaimTurn {
                previous: previous_claim.replace(next_claim),
                done,
            };

            let router = Arc::clone(&self.router);
            let ctx = self.ctx.clone();
            let store = Arc::clone(&store);
            let task_reference = reference.clone();
            let handle = tokio::spawn(async move {
                process_reference(&router, &ctx, &store, &task_reference, turn).await
            });

            async move {
                handle.await.unwrap_or_else(|error| {
                    warn!(reference = %reference, error = %error, "reference task aborted");
                    ResolutionResult::failed(reference, format!("Internal error: {error}"), None)
                })
            }
        });

        // `buffered` spawns lazily and yields in input order.
        let mut in_order = pin!(stream::iter(tasks).buffered(self.concurrency));
        let mut results = Vec::with_capacity(references.len());
        while let Some(result) = in_order.next().await {
            on_result(&result);
            results.push(result);
        }

        let report = BatchReport::from_results(results);
        info!(
            downloaded = report.summary.downloaded,
            manual = report.summary.manual,
            not_found = report.summary.not_found,
            "batch finished"
        );
        Ok(report)
    }
}

/// One reference's place in the filename claim chain.
///
/// A reference claims its filename (or passes) only after the reference
/// before it has done so.
struct ClaimTurn {
    previous: Option<oneshot::Receiver<()>>,
    done: oneshot::Sender<()>,
}

impl ClaimTurn {
    async fn claim(self, store: &PdfStore, pdf_url: &str) -> PathBuf {
        self.take(|| store.claim_path(pdf_url)).await
    }

    async fn pass(self) {
        self.take(|| ()).await;
    }

    async fn take<T>(self, step: impl FnOnce() -> T) -> T {
        if let Some(previous) = self.previous {
            // Err means the previous task died before its turn; nothing to wait for.
            let _ = previous.await;
        }
        let value = step();
        let _ = self.done.send(());
        value
    }
}

/// Routes one reference, runs its strategy, and saves any PDF it returns.
#[instrument(skip(router, ctx, store, turn))]
async fn process_reference(
    router: &Router,
    ctx: &StrategyContext,
    store: &PdfStore,
    reference: &str,
    turn: ClaimTurn,
) -> ResolutionResult {
    let route = router.route(reference, ctx).await;
    debug!(strategy = route.strategy.name(), url = %route.url, "running strategy");

    let result = match route.strategy.resolve(&route.url, ctx).await {
        StrategyOutcome::Pdf { pdf_url, response } => {
            let path = turn.claim(store, &pdf_url).await;
            match store.write(&path, response.body).await {
                Ok(()) => ResolutionResult::downloaded(reference, path, pdf_url),
                Err(error) => {
                    warn!(pdf_url = %pdf_url, error = %error, "failed to save pdf");
                    ResolutionResult::failed(reference, format!("Failed to save PDF: {error}"), None)
                }
            }
        }
        StrategyOutcome::Failed {
            reason,
            fallback_url,
        } => {
            turn.pass().await;
            ResolutionResult::failed(reference, reason, fallback_url)
        }
    };

    match &result.outcome {
        Outcome::Downloaded { local_path, .. } => {
            info!(path = %local_path.display(), "downloaded");
        }
        Outcome::ManualAction {
            fallback_url,
            reason,
        } => info!(fallback_url = %fallback_url, reason = %reason, "manual download needed"),
        Outcome::NotFound { reason } => info!(reason = %reason, "not found"),
    }
    result
}
