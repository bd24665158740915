//! Output directory handling: filename derivation, collision claims, streaming writes.

use std::path::{Component, Path, PathBuf};

use dashmap::DashSet;
use futures_util::StreamExt;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};
use url::Url;

use super::StoreError;
use crate::fetch::FetchBody;

const DEFAULT_FILENAME: &str = "paper.pdf";
const PDF_EXTENSION: &str = ".pdf";

/// Derives the local filename for a PDF URL.
///
/// Takes the last path segment (percent-decoded), appends `.pdf` when it does
/// not already end with it (case-insensitive), and falls back to `paper.pdf`
/// when the segment is empty.
///
/// # Examples
///
/// ```
/// use paper_downloader_core::batch::derive_filename;
///
/// assert_eq!(
///     derive_filename("https://www.biorxiv.org/content/10.1101/2020.01.01.12345.full"),
///     "2020.01.01.12345.full.pdf"
/// );
/// assert_eq!(derive_filename("https://example.com/files/paper.pdf"), "paper.pdf");
/// ```
#[must_use]
pub fn derive_filename(pdf_url: &str) -> String {
    let segment = last_path_segment(pdf_url);
    if segment.is_empty() {
        return DEFAULT_FILENAME.to_string();
    }

    let mut name = sanitize_filename(&segment);
    if !name.to_ascii_lowercase().ends_with(PDF_EXTENSION) {
        name.push_str(PDF_EXTENSION);
    }
    name
}

fn last_path_segment(pdf_url: &str) -> String {
    let raw = match Url::parse(pdf_url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default()
            .to_string(),
        Err(_) => pdf_url
            .split(['?', '#'])
            .next()
            .and_then(|path| path.rsplit('/').next())
            .unwrap_or_default()
            .to_string(),
    };

    urlencoding::decode(&raw).map_or(raw.clone(), |decoded| decoded.into_owned())
}

/// Replaces characters that are invalid on common filesystems.
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    let is_dot_segment = Path::new(&sanitized)
        .components()
        .any(|component| matches!(component, Component::CurDir | Component::ParentDir));
    if is_dot_segment {
        sanitized.replace('.', "_")
    } else {
        sanitized
    }
}

fn with_suffix(filename: &str, n: usize) -> String {
    match filename.rfind('.') {
        Some(pos) if pos > 0 => format!("{}_{n}{}", &filename[..pos], &filename[pos..]),
        _ => format!("{filename}_{n}"),
    }
}

/// Writes PDFs into one output directory.
///
/// Names claimed during this store's lifetime are never reused: the second
/// `paper.pdf` becomes `paper_2.pdf`, the third `paper_3.pdf`. Files left by
/// earlier runs are overwritten.
#[derive(Debug)]
pub struct PdfStore {
    dir: PathBuf,
    claimed: DashSet<String>,
}

impl PdfStore {
    /// Creates a store rooted at `dir`. Nothing is touched on disk yet.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            claimed: DashSet::new(),
        }
    }

    /// Output directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the output directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] when the directory cannot be created.
    pub async fn ensure_dir(&self) -> Result<(), StoreError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))
    }

    /// Reserves a unique path for `pdf_url` within this batch.
    #[must_use]
    pub fn claim_path(&self, pdf_url: &str) -> PathBuf {
        let filename = derive_filename(pdf_url);
        if self.claimed.insert(filename.clone()) {
            return self.dir.join(filename);
        }

        let mut n = 2;
        loop {
            let candidate = with_suffix(&filename, n);
            if self.claimed.insert(candidate.clone()) {
                debug!(original = %filename, renamed = %candidate, "filename collision");
                return self.dir.join(candidate);
            }
            n += 1;
        }
    }

    /// Streams `body` to a freshly claimed path and returns it.
    ///
    /// # Errors
    ///
    /// See [`Self::write`].
    pub async fn save(&self, pdf_url: &str, body: FetchBody) -> Result<PathBuf, StoreError> {
        let path = self.claim_path(pdf_url);
        self.write(&path, body).await?;
        Ok(path)
    }

    /// Streams `body` to `path`, usually one returned by [`Self::claim_path`].
    ///
    /// On failure the partial file is removed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the file cannot be written or the body
    /// stream fails.
    #[tracing::instrument(skip(self, path, body), fields(path = %path.display()))]
    pub async fn write(&self, path: &Path, body: FetchBody) -> Result<(), StoreError> {
        match write_body(path, body).await {
            Ok(bytes) => {
                debug!(bytes, "pdf saved");
                Ok(())
            }
            Err(error) => {
                if let Err(cleanup) = tokio::fs::remove_file(path).await
                    && cleanup.kind() != std::io::ErrorKind::NotFound
                {
                    warn!(error = %cleanup, "could not remove partial file");
                }
                Err(error)
            }
        }
    }
}

async fn write_body(path: &Path, body: FetchBody) -> Result<u64, StoreError> {
    let file = File::create(path)
        .await
        .map_err(|e| StoreError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    let mut bytes_written: u64 = 0;

    match body {
        FetchBody::Stream(mut stream) => {
            while let Some(chunk) = stream.next().await {
                let chunk = chunk.map_err(StoreError::body)?;
                writer
                    .write_all(&chunk)
                    .await
                    .map_err(|e| StoreError::io(path, e))?;
                bytes_written += chunk.len() as u64;
            }
        }
        FetchBody::Text(text) => {
            writer
                .write_all(text.as_bytes())
                .await
                .map_err(|e| StoreError::io(path, e))?;
            bytes_written = text.len() as u64;
        }
    }

    writer.flush().await.map_err(|e| StoreError::io(path, e))?;
    Ok(bytes_written)
}
