//! Errors raised while persisting PDFs.

use std::path::PathBuf;

use thiserror::Error;

use crate::fetch::FetchError;

/// Errors that can occur while writing a PDF to the output directory.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system error (create directory, create file, write, flush).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The response body stream broke off mid-transfer.
    #[error("{source}")]
    Body {
        /// The transport error.
        #[source]
        source: FetchError,
    },
}

impl StoreError {
    /// Creates an IO error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a body stream error.
    pub fn body(source: FetchError) -> Self {
        Self::Body { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_io_display_has_path() {
        let error = StoreError::io(
            "/tmp/out/paper.pdf",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = error.to_string();
        assert!(msg.contains("/tmp/out/paper.pdf"), "got: {msg}");
        assert!(msg.contains("denied"), "got: {msg}");
    }

    #[test]
    fn test_store_error_body_display_passes_through() {
        let error = StoreError::body(FetchError::network("https://a.b/p.pdf", "reset"));
        assert!(error.to_string().starts_with("network error fetching https://a.b/p.pdf"));
    }
}
