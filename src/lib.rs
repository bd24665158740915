//! Paper Downloader Core Library
//!
//! Resolves scholarly article references (PubMed URLs, DOIs, arXiv links,
//! publisher landing pages) to PDF files and downloads them.
//!
//! # Architecture
//!
//! Data flows strictly downward; only [`fetch`] touches the network.
//! - [`batch`] - Orchestrates a list of references and persists PDFs
//! - [`router`] - DOI redirect resolution and host classification
//! - [`strategy`] - One strategy per site family plus a generic fallback
//! - [`metadata`] - PubMed efetch, DOI resolver, and Unpaywall lookups
//! - [`html`] - PDF link extraction from landing pages
//! - [`fetch`] - HTTP GET behind the [`Fetch`] trait, PDF content-type check
//! - [`endpoints`] - Base URLs of every external service

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod batch;
pub mod endpoints;
pub mod fetch;
pub mod html;
pub mod metadata;
pub mod router;
pub mod strategy;
pub mod user_agent;

// Re-export commonly used types
pub use batch::{
    BatchError, BatchReport, BatchSummary, DEFAULT_CONCURRENCY, Downloader, MAX_CONCURRENCY,
    MIN_CONCURRENCY, Outcome, PdfStore, ResolutionResult, StoreError,
};
pub use endpoints::Endpoints;
pub use fetch::{
    CONNECT_TIMEOUT_SECS, DOI_REDIRECT_TIMEOUT_SECS, Fetch, FetchError, FetchOutcome,
    FetchRequest, HttpFetcher, REQUEST_TIMEOUT_SECS, is_pdf,
};
pub use metadata::{MetadataClient, ResolvedIdentifiers};
pub use router::{Route, Router};
pub use strategy::{Strategy, StrategyContext, StrategyOutcome};
