use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};
use crate::publish::{DEFAULT_ENDPOINT, PublishOptions};

/// Remote content URL baked in at build time. Empty means none.
pub const BUILD_CONTENT_URL: Option<&str> = option_env!("FOLIO_CONTENT_URL");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub content: ContentConfig,
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub publish: PublishConfig,
    #[serde(default)]
    pub state: StateConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

impl Config {
    /// Defaults, then the global file (or the explicit one, which replaces
    /// it), then `FOLIO_*` environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::default();

        let explicit = explicit_path
            .map(PathBuf::from)
            .or_else(|| env_string("FOLIO_CONFIG").map(PathBuf::from));

        if let Some(path) = explicit {
            let patch = Self::load_patch(&path)?.ok_or_else(|| {
                FolioError::Config(format!("config file not found: {}", path.display()))
            })?;
            config.merge_patch(patch);
        } else if let Some(global) = Self::load_global()? {
            config.merge_patch(global);
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Path of the global config file, if the platform has a config dir.
    #[must_use]
    pub fn global_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("folio").join("config.toml"))
    }

    fn load_global() -> Result<Option<ConfigPatch>> {
        match Self::global_path() {
            Some(path) => Self::load_patch(&path),
            None => Ok(None),
        }
    }

    fn load_patch(path: &Path) -> Result<Option<ConfigPatch>> {
        if !path.exists() {
            return Ok(None);
        }

        let raw = std::fs::read_to_string(path)
            .map_err(|err| FolioError::Config(format!("read config {}: {err}", path.display())))?;
        let patch = toml::from_str(&raw)
            .map_err(|err| FolioError::Config(format!("parse config {}: {err}", path.display())))?;
        Ok(Some(patch))
    }

    fn merge_patch(&mut self, patch: ConfigPatch) {
        if let Some(patch) = patch.content {
            self.content.merge(patch);
        }
        if let Some(patch) = patch.remote {
            self.remote.merge(patch);
        }
        if let Some(patch) = patch.publish {
            self.publish.merge(patch);
        }
        if let Some(patch) = patch.state {
            self.state.merge(patch);
        }
        if let Some(patch) = patch.export {
            self.export.merge(patch);
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if let Some(value) = env_string("FOLIO_DEFAULTS_PATH") {
            self.content.defaults_path = non_empty(value).map(PathBuf::from);
        }

        if let Some(value) = env_string("FOLIO_REMOTE_FIXED_URL") {
            self.remote.fixed_url = non_empty(value);
        }
        if let Some(value) = env_duration("FOLIO_REMOTE_TIMEOUT")? {
            self.remote.timeout = value;
        }

        if let Some(value) = env_string("FOLIO_PUBLISH_ENDPOINT") {
            self.publish.endpoint = value;
        }
        if let Some(value) = env_string("FOLIO_PUBLISH_FILE_NAME") {
            self.publish.file_name = value;
        }
        if let Some(value) = env_bool("FOLIO_PUBLISH_PUBLIC") {
            self.publish.public = value;
        }

        if let Some(value) = env_string("FOLIO_STATE_PATH") {
            self.state.path = non_empty(value).map(PathBuf::from);
        }
        if let Some(value) = env_string("FOLIO_DOWNLOAD_DIR") {
            self.export.download_dir = non_empty(value).map(PathBuf::from);
        }

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        let file_name = self.publish.file_name.trim();
        if file_name.is_empty() || file_name.contains('/') {
            return Err(FolioError::Config(format!(
                "publish.file_name must be a plain file name, got '{}'",
                self.publish.file_name
            )));
        }
        reqwest::Url::parse(&self.publish.endpoint).map_err(|err| {
            FolioError::Config(format!(
                "publish.endpoint '{}' is not a URL: {err}",
                self.publish.endpoint
            ))
        })?;
        if self.remote.timeout.is_zero() || self.publish.timeout.is_zero() {
            return Err(FolioError::Config("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Where durable session state lives.
    pub fn state_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.state.path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("folio").join("state.db"))
            .ok_or_else(|| FolioError::MissingConfig("state.path".to_string()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Site-specific defaults replacing the built-in set.
    #[serde(default)]
    pub defaults_path: Option<PathBuf>,
}

impl ContentConfig {
    fn merge(&mut self, patch: ContentSectionPatch) {
        if let Some(value) = patch.defaults_path {
            self.defaults_path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Fixed content URL; outranks any URL saved at runtime.
    #[serde(default)]
    pub fixed_url: Option<String>,
    #[serde(default = "default_remote_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_remote_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            fixed_url: BUILD_CONTENT_URL
                .filter(|url| !url.trim().is_empty())
                .map(str::to_string),
            timeout: default_remote_timeout(),
        }
    }
}

impl RemoteConfig {
    fn merge(&mut self, patch: RemotePatch) {
        if let Some(value) = patch.fixed_url {
            self.fixed_url = non_empty(value);
        }
        if let Some(value) = patch.timeout {
            self.timeout = value;
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub pin_revision: bool,
    #[serde(default = "default_publish_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_publish_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Default for PublishConfig {
    fn default() -> Self {
        let options = PublishOptions::default();
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            file_name: options.file_name,
            description: options.description,
            public: options.public,
            pin_revision: options.pin_revision,
            timeout: default_publish_timeout(),
        }
    }
}

impl PublishConfig {
    fn merge(&mut self, patch: PublishPatch) {
        if let Some(value) = patch.endpoint {
            self.endpoint = value;
        }
        if let Some(value) = patch.file_name {
            self.file_name = value;
        }
        if let Some(value) = patch.description {
            self.description = value;
        }
        if let Some(value) = patch.public {
            self.public = value;
        }
        if let Some(value) = patch.pin_revision {
            self.pin_revision = value;
        }
        if let Some(value) = patch.timeout {
            self.timeout = value;
        }
    }

    #[must_use]
    pub fn options(&self) -> PublishOptions {
        PublishOptions {
            file_name: self.file_name.trim().to_string(),
            description: self.description.clone(),
            public: self.public,
            pin_revision: self.pin_revision,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl StateConfig {
    fn merge(&mut self, patch: StatePatch) {
        if let Some(value) = patch.path {
            self.path = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default save location for `export`.
    #[serde(default)]
    pub output: Option<PathBuf>,
    /// Fallback directory; the platform downloads dir when unset.
    #[serde(default)]
    pub download_dir: Option<PathBuf>,
}

impl ExportConfig {
    fn merge(&mut self, patch: ExportPatch) {
        if let Some(value) = patch.output {
            self.output = Some(value);
        }
        if let Some(value) = patch.download_dir {
            self.download_dir = Some(value);
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ConfigPatch {
    pub content: Option<ContentSectionPatch>,
    pub remote: Option<RemotePatch>,
    pub publish: Option<PublishPatch>,
    pub state: Option<StatePatch>,
    pub export: Option<ExportPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ContentSectionPatch {
    pub defaults_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RemotePatch {
    pub fixed_url: Option<String>,
    #[serde(default, with = "humantime_serde::option")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct PublishPatch {
    pub endpoint: Option<String>,
    pub file_name: Option<String>,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub pin_revision: Option<bool>,
    #[serde(default, with = "humantime_serde::option")]
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct StatePatch {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ExportPatch {
    pub output: Option<PathBuf>,
    pub download_dir: Option<PathBuf>,
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key).ok().map(|value| {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_duration(key: &str) -> Result<Option<Duration>> {
    match std::env::var(key) {
        Ok(value) => humantime_serde::re::humantime::parse_duration(value.trim())
            .map(Some)
            .map_err(|err| FolioError::Config(format!("invalid {key} value {value}: {err}"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn config_default_is_valid() {
        let config = Config::default();
        config.validate().unwrap();
        assert_eq!(config.publish.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.publish.file_name, "content.json");
        assert_eq!(config.remote.timeout, Duration::from_secs(10));
    }

    #[test]
    fn load_patch_nonexistent_file() {
        let result = Config::load_patch(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn load_patch_reads_durations() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[remote]
fixed_url = "https://example.com/content.json"
timeout = "2s 500ms"

[publish]
public = true
"#,
        )
        .unwrap();

        let patch = Config::load_patch(&path).unwrap().unwrap();
        let remote = patch.remote.unwrap();
        assert_eq!(remote.timeout, Some(Duration::from_millis(2500)));
        assert_eq!(patch.publish.unwrap().public, Some(true));
        assert!(patch.state.is_none());
    }

    #[test]
    fn load_patch_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "this is not valid toml [[[").unwrap();

        let err = Config::load_patch(&path).unwrap_err();
        assert!(matches!(err, FolioError::Config(_)));
    }

    #[test]
    fn merge_patch_leaves_other_values() {
        let mut config = Config::default();
        config.merge_patch(ConfigPatch {
            publish: Some(PublishPatch {
                pin_revision: Some(true),
                ..Default::default()
            }),
            remote: Some(RemotePatch {
                fixed_url: Some("  ".to_string()),
                timeout: None,
            }),
            ..Default::default()
        });

        assert!(config.publish.pin_revision);
        assert_eq!(config.publish.file_name, "content.json");
        assert_eq!(config.remote.fixed_url, None);
        assert_eq!(config.remote.timeout, Duration::from_secs(10));
    }

    #[test]
    fn validate_rejects_path_like_file_name() {
        let mut config = Config::default();
        config.publish.file_name = "dir/content.json".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.publish.endpoint = "not a url".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn explicit_state_path_wins() {
        let mut config = Config::default();
        config.state.path = Some(PathBuf::from("/tmp/folio-test/state.db"));
        assert_eq!(
            config.state_path().unwrap(),
            PathBuf::from("/tmp/folio-test/state.db")
        );
    }

    #[test]
    fn publish_options_follow_config() {
        let mut config = Config::default();
        config.publish.file_name = " site.json ".to_string();
        config.publish.public = true;
        let options = config.publish.options();
        assert_eq!(options.file_name, "site.json");
        assert!(options.public);
    }
}
