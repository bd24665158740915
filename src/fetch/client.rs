//! reqwest-backed implementation of [`Fetch`].

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use tracing::{debug, instrument};
use url::Url;

use super::constants::{CONNECT_TIMEOUT_SECS, REQUEST_TIMEOUT_SECS};
use super::{BodyMode, Fetch, FetchBody, FetchError, FetchOutcome, FetchRequest};
use crate::user_agent;

const MAX_REDIRECTS: usize = 10;

/// HTTP client used for every page, metadata, and PDF request.
///
/// Holds two pooled clients that differ only in redirect policy, because
/// reqwest fixes the policy at build time. Cloning is cheap.
///
/// # Example
///
/// ```no_run
/// use paper_downloader_core::fetch::{Fetch, FetchRequest, HttpFetcher, is_pdf};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let fetcher = HttpFetcher::new()?;
/// let outcome = fetcher
///     .fetch(FetchRequest::stream("https://arxiv.org/pdf/2301.00001.pdf"))
///     .await?;
/// println!("pdf: {}", is_pdf(&outcome));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    no_redirect_client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with default timeouts and the default User-Agent.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Build`] when the TLS backend cannot be initialized.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_settings(
            Duration::from_secs(CONNECT_TIMEOUT_SECS),
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
            &user_agent::default_user_agent(),
        )
    }

    /// Creates a fetcher with explicit timeouts and User-Agent.
    ///
    /// `request_timeout` is the default for requests that do not carry their own.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Build`] when the TLS backend cannot be initialized.
    #[instrument(level = "debug", skip(user_agent))]
    pub fn with_settings(
        connect_timeout: Duration,
        request_timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, FetchError> {
        let build = |policy: Policy| {
            Client::builder()
                .connect_timeout(connect_timeout)
                .timeout(request_timeout)
                .user_agent(user_agent)
                .redirect(policy)
                .gzip(true)
                .build()
                .map_err(FetchError::build)
        };

        Ok(Self {
            client: build(Policy::limited(MAX_REDIRECTS))?,
            no_redirect_client: build(Policy::none())?,
        })
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    #[instrument(skip(self, request), fields(url = %request.url, mode = ?request.mode))]
    async fn fetch(&self, request: FetchRequest) -> Result<FetchOutcome, FetchError> {
        let parsed =
            Url::parse(&request.url).map_err(|_| FetchError::invalid_url(&request.url))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(FetchError::invalid_url(&request.url));
        }

        let client = if request.follow_redirects {
            &self.client
        } else {
            &self.no_redirect_client
        };
        let mut builder = client.get(parsed);
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(&request.url, &e))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        debug!(
            status,
            final_url = %final_url,
            content_type = content_type.as_deref().unwrap_or(""),
            "response received"
        );

        let body = match request.mode {
            BodyMode::Text => FetchBody::Text(
                response
                    .text()
                    .await
                    .map_err(|e| FetchError::body(&request.url, e))?,
            ),
            BodyMode::Stream => {
                let url = request.url.clone();
                FetchBody::Stream(
                    response
                        .bytes_stream()
                        .map(move |chunk| {
                            chunk
                                .map(|bytes| bytes.to_vec())
                                .map_err(|e| FetchError::body(url.as_str(), e))
                        })
                        .boxed(),
                )
            }
        };

        Ok(FetchOutcome {
            status,
            final_url,
            content_type,
            body,
        })
    }
}
