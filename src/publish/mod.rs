//! Content publishing.
//!
//! Publishing uploads the icon-stripped session document to a gist-style
//! endpoint. The first publish creates a document; later publishes update the
//! same one, addressed by the saved id.

pub mod gist;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use crate::content::{ContentDocument, strip_icons};
use crate::error::{FolioError, Result};
use crate::resolver::{ContentResolver, Resolution};
use crate::storage::{PublishRecord, StateKey, StateStore};

pub use gist::{DEFAULT_ENDPOINT, GistClient, latest_raw_url};
use gist::{GistFileContent, GistRequest};

/// How published documents are named and shared.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    pub file_name: String,
    pub description: String,
    pub public: bool,
    /// Keep the revision-pinned raw URL instead of the "latest" form.
    pub pin_revision: bool,
}

impl Default for PublishOptions {
    fn default() -> Self {
        Self {
            file_name: "content.json".to_string(),
            description: "Portfolio content".to_string(),
            public: false,
            pin_revision: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishResult {
    pub doc_id: String,
    pub fetch_url: String,
    /// True when a new remote document was created.
    pub created: bool,
}

/// Result of publishing the live session.
#[derive(Debug, Clone)]
pub struct SessionPublish {
    pub result: PublishResult,
    /// The reload triggered by adopting the new URL, when requested.
    pub applied: Option<Resolution>,
}

pub struct Publisher {
    client: GistClient,
    options: PublishOptions,
    store: Arc<dyn StateStore>,
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("client", &self.client)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Publisher {
    pub fn new(client: GistClient, options: PublishOptions, store: Arc<dyn StateStore>) -> Self {
        Self {
            client,
            options,
            store,
        }
    }

    #[must_use]
    pub fn options(&self) -> &PublishOptions {
        &self.options
    }

    /// The JSON uploaded for `doc`: pretty-printed, every icon nulled.
    pub fn payload(doc: &ContentDocument) -> Result<String> {
        Ok(serde_json::to_string_pretty(&strip_icons(doc))?)
    }

    /// Create or update the remote document. Nothing is persisted here.
    pub fn publish(
        &self,
        token: &str,
        existing_id: Option<&str>,
        doc: &ContentDocument,
    ) -> Result<PublishResult> {
        let token = token.trim();
        if token.is_empty() {
            return Err(FolioError::Auth("publish token is empty".to_string()));
        }

        let mut files = BTreeMap::new();
        files.insert(
            self.options.file_name.as_str(),
            GistFileContent {
                content: Self::payload(doc)?,
            },
        );
        let request = GistRequest {
            description: &self.options.description,
            public: self.options.public,
            files,
        };

        let existing_id = existing_id.map(str::trim).filter(|id| !id.is_empty());
        let (status, response) = match existing_id {
            Some(id) => self.client.update(token, id, &request)?,
            None => self.client.create(token, &request)?,
        };

        let raw_url = response
            .files
            .get(&self.options.file_name)
            .and_then(Option::as_ref)
            .and_then(|file| file.raw_url.clone())
            .ok_or_else(|| FolioError::RemoteService {
                status: status.as_u16(),
                message: format!(
                    "response has no raw URL for {}",
                    self.options.file_name
                ),
            })?;
        let fetch_url = if self.options.pin_revision {
            raw_url
        } else {
            latest_raw_url(&raw_url)
        };

        Ok(PublishResult {
            doc_id: response.id,
            fetch_url,
            created: existing_id.is_none(),
        })
    }

    /// Publish the session document using saved credentials unless
    /// overridden. On success the token and document id are saved so the
    /// next publish updates the same document; with `apply`, the session
    /// switches to the new URL right away.
    pub fn publish_session(
        &self,
        resolver: &ContentResolver,
        token_override: Option<&str>,
        id_override: Option<&str>,
        apply: bool,
    ) -> Result<SessionPublish> {
        let token = match token_override {
            Some(token) => Some(token.to_string()),
            None => self.store.get(StateKey::PublishToken)?.or_else(token_from_env),
        }
        .ok_or_else(|| {
            FolioError::Auth("no publish token saved or supplied".to_string())
        })?;
        let doc_id = match id_override {
            Some(id) => Some(id.to_string()),
            None => self.store.get(StateKey::PublishDocId)?,
        };

        let document = resolver.document();
        let result = self.publish(&token, doc_id.as_deref(), &document)?;
        info!(
            doc_id = %result.doc_id,
            url = %result.fetch_url,
            created = result.created,
            "content published"
        );

        self.store.set(StateKey::PublishToken, token.trim())?;
        self.store.set(StateKey::PublishDocId, &result.doc_id)?;
        let record = PublishRecord {
            doc_id: result.doc_id.clone(),
            fetch_url: result.fetch_url.clone(),
            created: result.created,
            fingerprint: document.fingerprint()?,
            published_at: Utc::now(),
        };
        if let Err(err) = self.store.record_publish(&record) {
            warn!(error = %err, "could not record publish history");
        }

        let applied = if apply {
            Some(resolver.set_override_url(Some(&result.fetch_url))?)
        } else {
            None
        };
        Ok(SessionPublish { result, applied })
    }

    /// Clear the saved token and document id. The next publish creates a new
    /// document.
    pub fn forget(&self) -> Result<()> {
        self.store.remove(StateKey::PublishToken)?;
        self.store.remove(StateKey::PublishDocId)?;
        info!("publish credentials cleared");
        Ok(())
    }
}

fn token_from_env() -> Option<String> {
    std::env::var("GITHUB_TOKEN")
        .ok()
        .or_else(|| std::env::var("GH_TOKEN").ok())
        .filter(|token| !token.trim().is_empty())
}
