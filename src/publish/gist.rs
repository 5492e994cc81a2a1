//! Paste-bin (gist) API client.

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FolioError, Result};

/// Default create endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/gists";

const USER_AGENT: &str = concat!("folio/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Serialize)]
pub(crate) struct GistRequest<'a> {
    pub description: &'a str,
    pub public: bool,
    pub files: BTreeMap<&'a str, GistFileContent>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GistFileContent {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GistResponse {
    pub id: String,
    #[serde(default)]
    pub files: HashMap<String, Option<GistFile>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GistFile {
    #[serde(default)]
    pub raw_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Thin client over the create/update calls of a gist-style API.
#[derive(Debug, Clone)]
pub struct GistClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl GistClient {
    pub fn new(endpoint: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| FolioError::Config(format!("build http client: {err}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub(crate) fn create(
        &self,
        token: &str,
        request: &GistRequest<'_>,
    ) -> Result<(StatusCode, GistResponse)> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(token)
            .json(request)
            .send()
            .map_err(|err| FolioError::Network(format!("publish request failed: {err}")))?;
        parse_response(response, "create")
    }

    pub(crate) fn update(
        &self,
        token: &str,
        id: &str,
        request: &GistRequest<'_>,
    ) -> Result<(StatusCode, GistResponse)> {
        let url = format!("{}/{id}", self.endpoint);
        let response = self
            .client
            .patch(url)
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(token)
            .json(request)
            .send()
            .map_err(|err| FolioError::Network(format!("publish request failed: {err}")))?;
        parse_response(response, "update")
    }
}

fn parse_response(
    response: reqwest::blocking::Response,
    action: &str,
) -> Result<(StatusCode, GistResponse)> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|err| FolioError::Network(format!("{action} response unreadable: {err}")))?;
    debug!(action, status = status.as_u16(), bytes = body.len(), "publish endpoint answered");

    if !status.is_success() {
        let message = serde_json::from_str::<ApiMessage>(&body)
            .map(|api| api.message)
            .unwrap_or_else(|_| body.chars().take(200).collect());
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(FolioError::Auth(format!(
                "publish endpoint rejected the credential (HTTP {}): {message}",
                status.as_u16()
            )));
        }
        return Err(FolioError::RemoteService {
            status: status.as_u16(),
            message,
        });
    }

    let parsed = serde_json::from_str::<GistResponse>(&body).map_err(|err| {
        FolioError::RemoteService {
            status: status.as_u16(),
            message: format!("unexpected {action} response: {err}"),
        }
    })?;
    Ok((status, parsed))
}

/// Drop the revision segment of a raw URL so it always serves the latest
/// content: `.../raw/<sha>/<file>` becomes `.../raw/<file>`.
#[must_use]
pub fn latest_raw_url(raw: &str) -> String {
    const MARKER: &str = "/raw/";
    let Some(idx) = raw.find(MARKER) else {
        return raw.to_string();
    };
    let (head, tail) = raw.split_at(idx + MARKER.len());
    match tail.split_once('/') {
        Some((revision, rest))
            if revision.len() == 40 && revision.chars().all(|c| c.is_ascii_hexdigit()) =>
        {
            format!("{head}{rest}")
        }
        _ => raw.to_string(),
    }
}
