//! Error handling for folio.
//!
//! This module provides:
//! - [`FolioError`]: The main error enum for all folio operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Error with code, suggestion and context for machine mode

mod codes;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;

/// Main error type for folio operations.
#[derive(Error, Debug)]
pub enum FolioError {
    /// Remote content could not be fetched (transport failure or non-OK status).
    #[error("Network error: {0}")]
    Network(String),

    /// A content document (remote body, draft, patch) is not valid.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Publish credential missing or rejected.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Publish endpoint answered with a non-success status.
    #[error("Remote service error (HTTP {status}): {message}")]
    RemoteService { status: u16, message: String },

    /// Durable state could not be written or read.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Invalid defaults: {0}")]
    Defaults(String),

    #[error("Invalid edit: {0}")]
    InvalidEdit(String),

    #[error("Confirmation required: {0}")]
    ConfirmationRequired(String),

    #[error("Export failed: {0}")]
    Export(String),
}

impl FolioError {
    /// Get the error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Network(_) => ErrorCode::NetworkUnreachable,
            Self::Parse(_) => ErrorCode::ContentParseError,
            Self::Auth(_) => ErrorCode::PublishAuthFailed,
            Self::RemoteService { .. } => ErrorCode::PublishRejected,
            Self::Storage(_) => ErrorCode::StorageWriteError,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::SerializationError,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::Defaults(_) => ErrorCode::DefaultsInvalid,
            Self::InvalidEdit(_) => ErrorCode::EditInvalid,
            Self::ConfirmationRequired(_) => ErrorCode::ConfirmationRequired,
            Self::Export(_) => ErrorCode::ExportFailed,
        }
    }

    /// Errors that make the resolver fall through to the next source
    /// instead of surfacing to the user.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Parse(_))
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::RemoteService { status, message } => {
                Some(serde_json::json!({ "status": status, "message": message }))
            }
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_folio_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "PUBLISH_AUTH_FAILED")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 701)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// Error category (e.g., "publish", "storage")
    pub category: String,
}

impl StructuredError {
    #[must_use]
    pub fn from_folio_error(err: &FolioError) -> Self {
        let code = err.code();
        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion: code.suggestion().to_string(),
            context: err.context(),
            recoverable: code.is_recoverable(),
            category: code.category().to_string(),
        }
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&FolioError> for StructuredError {
    fn from(err: &FolioError) -> Self {
        Self::from_folio_error(err)
    }
}

/// Result type alias using FolioError.
pub type Result<T> = std::result::Result<T, FolioError>;
