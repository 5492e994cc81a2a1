//! Remote content fetching.
//!
//! Remote documents are plain JSON objects served over HTTPS GET, usually a
//! paste-bin raw URL. Reads are unauthenticated.

use std::fmt;
use std::io::Read;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::content::ContentPatch;
use crate::error::{FolioError, Result};

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

/// Upper bound on a remote document. Embedded images make documents large,
/// but never this large.
const MAX_DOCUMENT_SIZE: u64 = 32 * 1024 * 1024;

/// Which URL tier a remote load used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteKind {
    /// Configured for the deployment; always wins.
    Fixed,
    /// Saved at runtime, usually after a publish.
    Dynamic,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteSource {
    pub url: String,
    pub kind: RemoteKind,
}

impl RemoteSource {
    /// The fixed URL when non-empty, else the runtime override, else none.
    #[must_use]
    pub fn select(fixed: Option<&str>, dynamic: Option<&str>) -> Option<Self> {
        fn non_empty(url: Option<&str>) -> Option<&str> {
            url.map(str::trim).filter(|url| !url.is_empty())
        }
        if let Some(url) = non_empty(fixed) {
            return Some(Self {
                url: url.to_string(),
                kind: RemoteKind::Fixed,
            });
        }
        non_empty(dynamic).map(|url| Self {
            url: url.to_string(),
            kind: RemoteKind::Dynamic,
        })
    }
}

impl fmt::Display for RemoteSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            RemoteKind::Fixed => "fixed",
            RemoteKind::Dynamic => "dynamic",
        };
        write!(f, "{} ({kind})", self.url)
    }
}

/// Retrieves a remote content document.
pub trait ContentFetcher: Send + Sync {
    /// Transport failures and non-OK statuses are [`FolioError::Network`];
    /// a body that is not a content document is [`FolioError::Parse`].
    fn fetch(&self, url: &str) -> Result<ContentPatch>;
}

/// Blocking HTTP fetcher.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| FolioError::Config(format!("build http client: {err}")))?;
        Ok(Self { client })
    }
}

impl ContentFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<ContentPatch> {
        let response = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .map_err(|err| FolioError::Network(format!("GET {url}: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FolioError::Network(format!("GET {url}: HTTP {status}")));
        }

        if let Some(content_length) = response.content_length() {
            if content_length > MAX_DOCUMENT_SIZE {
                return Err(FolioError::Network(format!(
                    "GET {url}: document too large ({content_length} bytes)"
                )));
            }
        }

        let mut body = String::new();
        response
            .take(MAX_DOCUMENT_SIZE + 1)
            .read_to_string(&mut body)
            .map_err(|err| FolioError::Network(format!("GET {url}: read body: {err}")))?;
        if body.len() as u64 > MAX_DOCUMENT_SIZE {
            return Err(FolioError::Network(format!(
                "GET {url}: document exceeded size limit"
            )));
        }
        debug!(url, bytes = body.len(), "fetched remote content");

        ContentPatch::from_json(&body)
    }
}
