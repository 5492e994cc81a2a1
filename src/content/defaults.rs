//! Static defaults: the content baked into the deployed build.

use std::path::Path;

use tracing::debug;

use super::schema::ContentDocument;
use crate::error::{FolioError, Result};

/// Default file name of a defaults document (also the export file name).
pub const DEFAULTS_FILE_NAME: &str = "content.json";

const BUILTIN_DEFAULTS: &str = include_str!("defaults.json");

/// Parse the defaults compiled into this binary.
pub fn builtin() -> Result<ContentDocument> {
    parse(BUILTIN_DEFAULTS, "built-in defaults")
}

/// Load the defaults for a session: a site-specific file when configured,
/// otherwise the built-in set.
pub fn load(path: Option<&Path>) -> Result<ContentDocument> {
    let Some(path) = path else {
        return builtin();
    };
    let raw = std::fs::read_to_string(path)
        .map_err(|err| FolioError::Defaults(format!("read {}: {err}", path.display())))?;
    debug!(path = %path.display(), "loading site defaults");
    parse(&raw, &path.display().to_string())
}

fn parse(raw: &str, origin: &str) -> Result<ContentDocument> {
    serde_json::from_str(raw).map_err(|err| FolioError::Defaults(format!("{origin}: {err}")))
}
