//! HTTP fetch layer: one GET in, one [`FetchOutcome`] out.
//!
//! Everything above this module talks to the network through the [`Fetch`]
//! trait. The production implementation is [`HttpFetcher`] (reqwest); tests
//! substitute a scripted implementation so strategies can be exercised
//! without sockets.
//!
//! # Contract
//!
//! - Transport failures (DNS, TLS, timeout, reset, malformed URL) come back
//!   as [`FetchError`], never as a panic.
//! - Non-2xx responses are *outcomes*, not errors. Callers decide.
//! - No retries. Each call is exactly one request (plus redirects).

mod client;
mod constants;
mod error;

pub use client::HttpFetcher;
pub use constants::{CONNECT_TIMEOUT_SECS, DOI_REDIRECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
pub use error::FetchError;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;

/// Streamed response body chunks.
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, FetchError>>;

/// How the response body should be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyMode {
    /// Leave the body unread and hand back a chunk stream.
    Stream,
    /// Read the whole body as text.
    Text,
}

/// A single GET request description.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Target URL.
    pub url: String,
    /// Body delivery mode.
    pub mode: BodyMode,
    /// Per-request timeout; `None` uses the client default.
    pub timeout: Option<Duration>,
    /// Whether redirects are followed.
    pub follow_redirects: bool,
}

impl FetchRequest {
    /// A streaming GET that follows redirects.
    #[must_use]
    pub fn stream(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: BodyMode::Stream,
            timeout: None,
            follow_redirects: true,
        }
    }

    /// A text GET that follows redirects.
    #[must_use]
    pub fn text(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mode: BodyMode::Text,
            timeout: None,
            follow_redirects: true,
        }
    }

    /// Overrides the client default timeout for this request.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Disables redirect following for this request.
    #[must_use]
    pub fn without_redirects(mut self) -> Self {
        self.follow_redirects = false;
        self
    }
}

/// Response body as delivered by the fetch layer.
pub enum FetchBody {
    /// Unread body chunks.
    Stream(ByteStream),
    /// Fully read text body.
    Text(String),
}

impl FetchBody {
    /// Wraps an in-memory buffer as a single-chunk stream.
    #[must_use]
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self::Stream(futures_util::stream::iter([Ok::<_, FetchError>(data)]).boxed())
    }
}

impl fmt::Debug for FetchBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stream(_) => f.write_str("FetchBody::Stream(..)"),
            Self::Text(text) => write!(f, "FetchBody::Text({} bytes)", text.len()),
        }
    }
}

/// The result of one HTTP GET.
#[derive(Debug)]
pub struct FetchOutcome {
    /// HTTP status code.
    pub status: u16,
    /// URL after redirects.
    pub final_url: String,
    /// Raw `Content-Type` header value, if present.
    pub content_type: Option<String>,
    /// Response body.
    pub body: FetchBody,
}

impl FetchOutcome {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Returns the text body, or `None` for streamed bodies.
    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self.body {
            FetchBody::Text(text) => Some(text),
            FetchBody::Stream(_) => None,
        }
    }
}

/// The single seam through which all network I/O flows.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Performs one GET described by `request`.
    async fn fetch(&self, request: FetchRequest) -> Result<FetchOutcome, FetchError>;
}

/// Returns true iff the declared content type is `application/pdf`.
///
/// This trusts the header; a server lying about its content type will fool it.
#[must_use]
pub fn is_pdf(outcome: &FetchOutcome) -> bool {
    outcome
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/pdf"))
}
