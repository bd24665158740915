//! Error types for the fetch layer.
//!
//! Every transport-level failure is converted into a [`FetchError`] at the
//! client boundary. Callers never see a panic or a raw `reqwest::Error`
//! without the URL it belongs to.

use thiserror::Error;

/// Errors that can occur while performing a single GET request.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, resets).
    #[error("network error fetching {url}: {message}")]
    Network {
        /// The URL that failed.
        url: String,
        /// Rendered transport error.
        message: String,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// The URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The HTTP client itself could not be constructed.
    #[error("HTTP client construction failed: {message}")]
    Build {
        /// Rendered builder error.
        message: String,
    },

    /// The response body could not be read.
    #[error("failed reading body from {url}: {message}")]
    Body {
        /// The URL whose body failed.
        url: String,
        /// Rendered read error.
        message: String,
    },
}

impl FetchError {
    /// Creates a network error from any displayable transport error.
    pub fn network(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Network {
            url: url.into(),
            message: source.to_string(),
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a body read error.
    pub fn body(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Body {
            url: url.into(),
            message: source.to_string(),
        }
    }

    /// Creates a client construction error.
    pub fn build(source: impl std::fmt::Display) -> Self {
        Self::Build {
            message: source.to_string(),
        }
    }

    /// Maps a reqwest error, keeping timeouts distinguishable.
    pub(crate) fn from_reqwest(url: &str, error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::timeout(url)
        } else if error.is_builder() {
            Self::invalid_url(url)
        } else {
            Self::network(url, error)
        }
    }

    /// Returns the URL this error relates to, if any.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Network { url, .. }
            | Self::Timeout { url }
            | Self::InvalidUrl { url }
            | Self::Body { url, .. } => Some(url.as_str()),
            Self::Build { .. } => None,
        }
    }
}
