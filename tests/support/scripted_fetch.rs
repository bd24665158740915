//! In-memory [`Fetch`] implementation keyed by exact URL.
//!
//! Unscripted URLs answer 404 with an empty HTML body. Every request is
//! recorded so tests can assert which probes ran and in what order.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use paper_downloader_core::fetch::{BodyMode, FetchBody};
use paper_downloader_core::{
    Endpoints, Fetch, FetchError, FetchOutcome, FetchRequest, MetadataClient, StrategyContext,
};

pub const PDF_BYTES: &[u8] = b"%PDF-1.7\n%test fixture\n";

#[derive(Debug, Clone)]
enum Reply {
    Response {
        status: u16,
        final_url: Option<String>,
        content_type: Option<String>,
        body: Vec<u8>,
    },
    NetworkError,
    Timeout,
}

#[derive(Debug, Default)]
pub struct ScriptedFetch {
    replies: Mutex<HashMap<String, Reply>>,
    delays: Mutex<HashMap<String, Duration>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl ScriptedFetch {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(self, url: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), reply);
        self
    }

    /// 200 `application/pdf`.
    pub fn pdf(self, url: &str) -> Self {
        self.pdf_bytes(url, PDF_BYTES)
    }

    pub fn pdf_bytes(self, url: &str, bytes: &[u8]) -> Self {
        self.script(
            url,
            Reply::Response {
                status: 200,
                final_url: None,
                content_type: Some("application/pdf".to_string()),
                body: bytes.to_vec(),
            },
        )
    }

    /// 200 `text/html`.
    pub fn html(self, url: &str, html: &str) -> Self {
        self.script(
            url,
            Reply::Response {
                status: 200,
                final_url: None,
                content_type: Some("text/html; charset=utf-8".to_string()),
                body: html.as_bytes().to_vec(),
            },
        )
    }

    /// 200 `text/html` reached after redirecting to `final_url`.
    pub fn redirect_to(self, url: &str, final_url: &str, html: &str) -> Self {
        self.script(
            url,
            Reply::Response {
                status: 200,
                final_url: Some(final_url.to_string()),
                content_type: Some("text/html; charset=utf-8".to_string()),
                body: html.as_bytes().to_vec(),
            },
        )
    }

    /// 200 `application/xml`.
    pub fn xml(self, url: &str, xml: &str) -> Self {
        self.script(
            url,
            Reply::Response {
                status: 200,
                final_url: None,
                content_type: Some("text/xml; charset=UTF-8".to_string()),
                body: xml.as_bytes().to_vec(),
            },
        )
    }

    /// 200 `application/json`.
    pub fn json(self, url: &str, json: &serde_json::Value) -> Self {
        self.script(
            url,
            Reply::Response {
                status: 200,
                final_url: None,
                content_type: Some("application/json".to_string()),
                body: json.to_string().into_bytes(),
            },
        )
    }

    /// Arbitrary status with an HTML body.
    pub fn status(self, url: &str, status: u16) -> Self {
        self.script(
            url,
            Reply::Response {
                status,
                final_url: None,
                content_type: Some("text/html".to_string()),
                body: Vec::new(),
            },
        )
    }

    /// Status and content type chosen by the test.
    pub fn respond(self, url: &str, status: u16, content_type: &str, body: &[u8]) -> Self {
        self.script(
            url,
            Reply::Response {
                status,
                final_url: None,
                content_type: Some(content_type.to_string()),
                body: body.to_vec(),
            },
        )
    }

    pub fn network_error(self, url: &str) -> Self {
        self.script(url, Reply::NetworkError)
    }

    pub fn timeout(self, url: &str) -> Self {
        self.script(url, Reply::Timeout)
    }

    /// Holds the reply for `url` back by `delay`.
    pub fn delay(self, url: &str, delay: Duration) -> Self {
        self.delays
            .lock()
            .unwrap()
            .insert(url.to_string(), delay);
        self
    }

    /// URLs requested so far, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn count(&self, url: &str) -> usize {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.url == url)
            .count()
    }
}

#[async_trait]
impl Fetch for ScriptedFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchOutcome, FetchError> {
        self.requests.lock().unwrap().push(request.clone());
        let delay = self.delays.lock().unwrap().get(&request.url).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.replies.lock().unwrap().get(&request.url).cloned();

        let (status, final_url, content_type, body) = match reply {
            Some(Reply::Response {
                status,
                final_url,
                content_type,
                body,
            }) => (status, final_url, content_type, body),
            Some(Reply::NetworkError) => {
                return Err(FetchError::network(&request.url, "connection refused"));
            }
            Some(Reply::Timeout) => return Err(FetchError::timeout(&request.url)),
            None => (404, None, Some("text/html".to_string()), Vec::new()),
        };

        let body = match request.mode {
            BodyMode::Stream => FetchBody::from_bytes(body),
            BodyMode::Text => FetchBody::Text(String::from_utf8_lossy(&body).into_owned()),
        };

        Ok(FetchOutcome {
            status,
            final_url: final_url.unwrap_or_else(|| request.url.clone()),
            content_type,
            body,
        })
    }
}

/// Strategy context over `fetch` with production endpoints and no Unpaywall.
pub fn context(fetch: &Arc<ScriptedFetch>) -> StrategyContext {
    context_with_email(fetch, None)
}

pub fn context_with_email(fetch: &Arc<ScriptedFetch>, email: Option<&str>) -> StrategyContext {
    let transport: Arc<dyn Fetch> = fetch.clone();
    let metadata = MetadataClient::new(Arc::clone(&transport), Endpoints::default())
        .with_unpaywall_email(email.map(str::to_string));
    StrategyContext::new(transport, metadata)
}

/// Minimal efetch document carrying the given identifiers.
pub fn efetch_xml(doi: Option<&str>, pmcid: Option<&str>) -> String {
    let mut ids = String::from("<ArticleId IdType=\"pubmed\">1</ArticleId>");
    if let Some(doi) = doi {
        ids.push_str(&format!("<ArticleId IdType=\"doi\">{doi}</ArticleId>"));
    }
    if let Some(pmcid) = pmcid {
        ids.push_str(&format!("<ArticleId IdType=\"pmc\">{pmcid}</ArticleId>"));
    }
    format!(
        "<?xml version=\"1.0\" ?><PubmedArticleSet><PubmedArticle><PubmedData>\
         <ArticleIdList>{ids}</ArticleIdList></PubmedData></PubmedArticle></PubmedArticleSet>"
    )
}
