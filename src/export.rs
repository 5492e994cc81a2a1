//! Exporting the session content as a source artifact.
//!
//! The artifact is written through an ordered list of targets. The first
//! target that succeeds wins; an export only fails when every target fails.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::content::defaults::DEFAULTS_FILE_NAME;
use crate::content::{ContentDocument, fill_missing_icons};
use crate::error::{FolioError, Result};

/// File name of the projects-only snippet.
pub const PROJECTS_FILE_NAME: &str = "projects.json";

/// A rendered file, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub contents: String,
}

/// The full defaults file for `doc`. Icons lost along the way are restored
/// from `defaults` entry by entry, so edited text is kept.
pub fn render_defaults_file(
    doc: &ContentDocument,
    defaults: &ContentDocument,
) -> Result<ExportArtifact> {
    let filled = fill_missing_icons(doc.clone(), defaults);
    let mut contents = serde_json::to_string_pretty(&filled)?;
    contents.push('\n');
    Ok(ExportArtifact {
        file_name: DEFAULTS_FILE_NAME.to_string(),
        contents,
    })
}

/// Just the projects section, for pasting into another copy of the site.
pub fn render_projects_snippet(doc: &ContentDocument) -> Result<ExportArtifact> {
    let mut contents =
        serde_json::to_string_pretty(&serde_json::json!({ "projects": &doc.projects }))?;
    contents.push('\n');
    Ok(ExportArtifact {
        file_name: PROJECTS_FILE_NAME.to_string(),
        contents,
    })
}

/// One way of putting an artifact on disk.
pub trait ExportTarget {
    fn name(&self) -> &'static str;

    /// Write the artifact, returning where it landed.
    fn write(&self, artifact: &ExportArtifact) -> Result<PathBuf>;
}

/// The explicit save location chosen by the operator. Writes atomically and
/// overwrites an existing file.
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ExportTarget for FileTarget {
    fn name(&self) -> &'static str {
        "file"
    }

    fn write(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        let path = if self.path.is_dir() {
            self.path.join(&artifact.file_name)
        } else {
            self.path.clone()
        };
        write_atomic(&path, artifact.contents.as_bytes())?;
        Ok(path)
    }
}

/// Drop the artifact into a downloads directory without clobbering
/// anything: `content.json`, then `content (1).json`, `content (2).json`...
#[derive(Debug, Clone)]
pub struct DownloadsTarget {
    dir: PathBuf,
}

impl DownloadsTarget {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform downloads directory, if there is one.
    #[must_use]
    pub fn platform_default() -> Option<Self> {
        dirs::download_dir().map(Self::new)
    }

    fn free_path(&self, file_name: &str) -> PathBuf {
        let candidate = self.dir.join(file_name);
        if !candidate.exists() {
            return candidate;
        }
        let (stem, ext) = match file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
            _ => (file_name, None),
        };
        (1..)
            .map(|n| match ext {
                Some(ext) => self.dir.join(format!("{stem} ({n}).{ext}")),
                None => self.dir.join(format!("{stem} ({n})")),
            })
            .find(|path| !path.exists())
            .unwrap_or(candidate)
    }
}

impl ExportTarget for DownloadsTarget {
    fn name(&self) -> &'static str {
        "downloads"
    }

    fn write(&self, artifact: &ExportArtifact) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.free_path(&artifact.file_name);
        write_atomic(&path, artifact.contents.as_bytes())?;
        Ok(path)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetFailure {
    pub target: &'static str,
    pub message: String,
}

impl fmt::Display for TargetFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.target, self.message)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ExportOutcome {
    pub path: PathBuf,
    pub target: &'static str,
    /// Targets tried before the one that succeeded.
    pub failures: Vec<TargetFailure>,
}

/// Try each target in order until one succeeds.
pub fn export_with_fallback(
    artifact: &ExportArtifact,
    targets: &[&dyn ExportTarget],
) -> Result<ExportOutcome> {
    let mut failures = Vec::new();
    for target in targets {
        match target.write(artifact) {
            Ok(path) => {
                debug!(target = target.name(), path = %path.display(), "artifact written");
                return Ok(ExportOutcome {
                    path,
                    target: target.name(),
                    failures,
                });
            }
            Err(err) => {
                warn!(target = target.name(), error = %err, "export target failed");
                failures.push(TargetFailure {
                    target: target.name(),
                    message: err.to_string(),
                });
            }
        }
    }

    let detail = if failures.is_empty() {
        "no export target available".to_string()
    } else {
        failures
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    };
    Err(FolioError::Export(detail))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(parent)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| FolioError::Io(err.error))?;
    Ok(())
}
