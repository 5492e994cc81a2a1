//! SQLite-backed session state

use std::path::Path;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::{PublishRecord, StateKey, StateStore};
use crate::error::{FolioError, Result};
use crate::storage::migrations;

/// Durable state in a single SQLite file.
pub struct SqliteStateStore {
    conn: Mutex<Connection>,
    schema_version: u32,
}

impl std::fmt::Debug for SqliteStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStateStore")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl SqliteStateStore {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::configure_pragmas(&conn)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let schema_version = migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            schema_version,
        })
    }

    /// Current schema version after migrations.
    #[must_use]
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;",
        )?;
        Ok(())
    }
}

impl StateStore for SqliteStateStore {
    fn get(&self, key: StateKey) -> Result<Option<String>> {
        let conn = self.conn.lock();
        let value = conn
            .query_row(
                "SELECT value FROM state WHERE key = ?",
                [key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: StateKey, value: &str) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO state (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET
                value=excluded.value,
                updated_at=excluded.updated_at",
            params![key.as_str(), value, Utc::now().to_rfc3339()],
        )
        .map_err(|err| FolioError::Storage(format!("write {key}: {err}")))?;
        Ok(())
    }

    fn remove(&self, key: StateKey) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute("DELETE FROM state WHERE key = ?", [key.as_str()])
            .map_err(|err| FolioError::Storage(format!("remove {key}: {err}")))?;
        Ok(())
    }

    fn record_publish(&self, record: &PublishRecord) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO publish_log (doc_id, fetch_url, created, fingerprint, published_at)
             VALUES (?, ?, ?, ?, ?)",
            params![
                record.doc_id,
                record.fetch_url,
                record.created,
                record.fingerprint,
                record.published_at.to_rfc3339(),
            ],
        )
        .map_err(|err| FolioError::Storage(format!("record publish: {err}")))?;
        Ok(())
    }

    fn publish_history(&self, limit: usize) -> Result<Vec<PublishRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(
            "SELECT doc_id, fetch_url, created, fingerprint, published_at
             FROM publish_log ORDER BY id DESC LIMIT ?",
        )?;
        let rows = stmt.query_map([limit as i64], publish_from_row)?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

fn publish_from_row(row: &Row<'_>) -> rusqlite::Result<PublishRecord> {
    let published_at: String = row.get(4)?;
    let published_at = DateTime::parse_from_rfc3339(&published_at)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|err| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, Box::new(err))
        })?;
    Ok(PublishRecord {
        doc_id: row.get(0)?,
        fetch_url: row.get(1)?,
        created: row.get(2)?,
        fingerprint: row.get(3)?,
        published_at,
    })
}
