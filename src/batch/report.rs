//! Per-reference results and the batch summary.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// What happened to one reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The PDF was saved.
    Downloaded {
        /// Where the PDF was written.
        local_path: PathBuf,
        /// URL the PDF was fetched from.
        pdf_url: String,
    },
    /// No PDF, but a page the user can open to get it by hand.
    ManualAction {
        /// Page to open.
        fallback_url: String,
        /// Why the PDF could not be fetched.
        reason: String,
    },
    /// Nothing usable was found.
    NotFound {
        /// Why resolution failed.
        reason: String,
    },
}

/// Terminal result for one input reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionResult {
    /// The reference exactly as given.
    pub source_reference: String,
    /// Resolution outcome.
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl ResolutionResult {
    /// A saved PDF.
    #[must_use]
    pub fn downloaded(
        source_reference: impl Into<String>,
        local_path: PathBuf,
        pdf_url: impl Into<String>,
    ) -> Self {
        Self {
            source_reference: source_reference.into(),
            outcome: Outcome::Downloaded {
                local_path,
                pdf_url: pdf_url.into(),
            },
        }
    }

    /// A failure; carries a fallback page when one is known.
    #[must_use]
    pub fn failed(
        source_reference: impl Into<String>,
        reason: impl Into<String>,
        fallback_url: Option<String>,
    ) -> Self {
        let reason = reason.into();
        let outcome = match fallback_url {
            Some(fallback_url) => Outcome::ManualAction {
                fallback_url,
                reason,
            },
            None => Outcome::NotFound { reason },
        };
        Self {
            source_reference: source_reference.into(),
            outcome,
        }
    }

    /// True when the PDF was saved.
    #[must_use]
    pub fn success(&self) -> bool {
        matches!(self.outcome, Outcome::Downloaded { .. })
    }

    /// Saved file path, on success.
    #[must_use]
    pub fn local_path(&self) -> Option<&Path> {
        match &self.outcome {
            Outcome::Downloaded { local_path, .. } => Some(local_path),
            _ => None,
        }
    }

    /// Page to open by hand, for manual-action failures.
    #[must_use]
    pub fn fallback_url(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::ManualAction { fallback_url, .. } => Some(fallback_url),
            _ => None,
        }
    }

    /// Failure reason; `None` on success.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::ManualAction { reason, .. } | Outcome::NotFound { reason } => Some(reason),
            Outcome::Downloaded { .. } => None,
        }
    }
}

/// Outcome counts for a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// References whose PDF was saved.
    pub downloaded: usize,
    /// References with a fallback page only.
    pub manual: usize,
    /// References with nothing usable.
    pub not_found: usize,
}

impl BatchSummary {
    /// Total references counted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.downloaded + self.manual + self.not_found
    }
}

/// All results of one batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    /// One result per input reference.
    pub results: Vec<ResolutionResult>,
    /// Counts by outcome.
    pub summary: BatchSummary,
}

impl BatchReport {
    /// Builds a report and its summary from ordered results.
    #[must_use]
    pub fn from_results(results: Vec<ResolutionResult>) -> Self {
        let mut summary = BatchSummary::default();
        for result in &results {
            match result.outcome {
                Outcome::Downloaded { .. } => summary.downloaded += 1,
                Outcome::ManualAction { .. } => summary.manual += 1,
                Outcome::NotFound { .. } => summary.not_found += 1,
            }
        }
        Self { results, summary }
    }

    /// True when every reference was downloaded.
    #[must_use]
    pub fn all_downloaded(&self) -> bool {
        self.summary.downloaded == self.results.len()
    }

    /// Number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// True when the batch had no references.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
