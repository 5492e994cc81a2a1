//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Content errors
//! - 3xx: Config errors
//! - 5xx: Network errors
//! - 6xx: Storage errors
//! - 7xx: Publish errors
//! - 8xx: Edit/validation errors
//! - 9xx: Internal and export errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for machine mode output.
///
/// Each variant maps to a numeric code (e.g., `ContentParseError` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Content errors (1xx)
    // ========================================
    /// E101: A content document could not be parsed
    ContentParseError,
    /// E102: Built-in or configured defaults are invalid
    DefaultsInvalid,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Network errors (5xx)
    // ========================================
    /// E501: Remote content could not be fetched
    NetworkUnreachable,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E602: Failed to write durable state
    StorageWriteError,
    /// E604: Database operation failed
    DatabaseError,
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Publish errors (7xx)
    // ========================================
    /// E701: Publish credential missing or rejected
    PublishAuthFailed,
    /// E702: Publish endpoint rejected the request
    PublishRejected,

    // ========================================
    // Edit errors (8xx)
    // ========================================
    /// E801: Edit targets a project or section that does not exist
    EditInvalid,
    /// E802: Destructive edit was not confirmed
    ConfirmationRequired,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Every export strategy failed
    ExportFailed,
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `ContentParseError` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::ContentParseError => 101,
            Self::DefaultsInvalid => 102,

            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            Self::NetworkUnreachable => 501,

            Self::StorageWriteError => 602,
            Self::DatabaseError => 604,
            Self::SerializationError => 605,

            Self::PublishAuthFailed => 701,
            Self::PublishRejected => 702,

            Self::EditInvalid => 801,
            Self::ConfirmationRequired => 802,

            Self::ExportFailed => 901,
            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::ContentParseError => "Check the document is a JSON object whose keys match the content sections",
            Self::DefaultsInvalid => "Fix the defaults file referenced by `content.defaults_path`, or unset it to use the built-in defaults",
            Self::ConfigInvalid => "Check TOML syntax in the config file and the FOLIO_* environment variables",
            Self::ConfigMissingRequired => "Set the required value in config.toml or through its FOLIO_* variable",
            Self::NetworkUnreachable => "Check the remote URL with `folio remote show`; content falls back to the draft or defaults",
            Self::StorageWriteError => "Check disk space and write permissions on the state directory",
            Self::DatabaseError => "The state database may be corrupted. Move it aside and retry",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",
            Self::PublishAuthFailed => "Pass --token, or set FOLIO_PUBLISH_TOKEN or GITHUB_TOKEN with the gist scope",
            Self::PublishRejected => "The publish endpoint rejected the upload. Check the document id with `folio status`",
            Self::EditInvalid => "Run `folio show --section projects` to list valid indexes and ids",
            Self::ConfirmationRequired => "Re-run with --yes to confirm the removal",
            Self::ExportFailed => "Pass --output with a writable path",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::ContentParseError
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::NetworkUnreachable
            | Self::StorageWriteError
            | Self::PublishAuthFailed
            | Self::PublishRejected
            | Self::EditInvalid
            | Self::ConfirmationRequired
            | Self::ExportFailed
            | Self::IoError => true,

            Self::DefaultsInvalid | Self::DatabaseError | Self::SerializationError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "content",
            3 => "config",
            5 => "network",
            6 => "storage",
            7 => "publish",
            8 => "edit",
            9 => "internal",
            _ => "unknown",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
