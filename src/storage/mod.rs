//! Storage layer for folio
//!
//! Durable session state lives under a handful of stable keys in a
//! [`StateStore`]. The SQLite store backs real sessions; the in-memory store
//! backs tests and throwaway sessions.

pub mod draft;
pub mod migrations;
pub mod sqlite;

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub use draft::DraftStore;
pub use sqlite::SqliteStateStore;

/// Stable keys of durable local state. Each one is independently clearable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StateKey {
    /// Locally saved, unpublished content.
    Draft,
    /// Runtime remote URL adopted after a publish or set by the operator.
    OverrideUrl,
    /// Credential for the publish endpoint.
    PublishToken,
    /// Id of the remote document repeated publishes update.
    PublishDocId,
}

impl StateKey {
    pub const ALL: [Self; 4] = [
        Self::Draft,
        Self::OverrideUrl,
        Self::PublishToken,
        Self::PublishDocId,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "folio.content.draft",
            Self::OverrideUrl => "folio.remote.override_url",
            Self::PublishToken => "folio.publish.token",
            Self::PublishDocId => "folio.publish.doc_id",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One successful publish, newest first when listed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRecord {
    pub doc_id: String,
    pub fetch_url: String,
    pub created: bool,
    pub fingerprint: String,
    pub published_at: DateTime<Utc>,
}

/// Key/value persistence for session state.
pub trait StateStore: Send + Sync {
    fn get(&self, key: StateKey) -> Result<Option<String>>;

    fn set(&self, key: StateKey, value: &str) -> Result<()>;

    /// Removes the key entirely. Removing an absent key is not an error.
    fn remove(&self, key: StateKey) -> Result<()>;

    fn record_publish(&self, record: &PublishRecord) -> Result<()>;

    fn publish_history(&self, limit: usize) -> Result<Vec<PublishRecord>>;
}

/// Process-local store; nothing survives the session.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    values: Mutex<HashMap<StateKey, String>>,
    publishes: Mutex<Vec<PublishRecord>>,
}

impl MemoryStateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: StateKey) -> Result<Option<String>> {
        Ok(self.values.lock().get(&key).cloned())
    }

    fn set(&self, key: StateKey, value: &str) -> Result<()> {
        self.values.lock().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StateKey) -> Result<()> {
        self.values.lock().remove(&key);
        Ok(())
    }

    fn record_publish(&self, record: &PublishRecord) -> Result<()> {
        self.publishes.lock().push(record.clone());
        Ok(())
    }

    fn publish_history(&self, limit: usize) -> Result<Vec<PublishRecord>> {
        Ok(self
            .publishes
            .lock()
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}
