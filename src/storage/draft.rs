//! Local draft persistence.

use std::sync::Arc;

use tracing::debug;

use super::{StateKey, StateStore};
use crate::content::{ContentDocument, ContentPatch, strip_icons};
use crate::error::{FolioError, Result};

/// Saves and restores the editor's unpublished content.
///
/// Icons are always stripped before writing; restoring them is the
/// resolver's job.
#[derive(Clone)]
pub struct DraftStore {
    store: Arc<dyn StateStore>,
}

impl DraftStore {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, doc: &ContentDocument) -> Result<()> {
        let payload = serde_json::to_string(&strip_icons(doc))
            .map_err(|err| FolioError::Storage(format!("serialize draft: {err}")))?;
        self.store
            .set(StateKey::Draft, &payload)
            .map_err(|err| match err {
                FolioError::Storage(_) => err,
                other => FolioError::Storage(other.to_string()),
            })?;
        debug!(bytes = payload.len(), "draft saved");
        Ok(())
    }

    /// The saved draft, if any. A corrupt draft is a [`FolioError::Parse`].
    pub fn load(&self) -> Result<Option<ContentPatch>> {
        match self.store.get(StateKey::Draft)? {
            Some(raw) => ContentPatch::from_json(&raw).map(Some),
            None => Ok(None),
        }
    }

    pub fn clear(&self) -> Result<()> {
        self.store.remove(StateKey::Draft)
    }

    pub fn exists(&self) -> Result<bool> {
        Ok(self.store.get(StateKey::Draft)?.is_some())
    }
}

impl std::fmt::Debug for DraftStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DraftStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::defaults;
    use crate::storage::MemoryStateStore;

    fn draft_store() -> (Arc<MemoryStateStore>, DraftStore) {
        let backing = Arc::new(MemoryStateStore::new());
        let drafts = DraftStore::new(backing.clone());
        (backing, drafts)
    }

    #[test]
    fn saved_draft_never_contains_icons() {
        let (backing, drafts) = draft_store();
        let doc = defaults::builtin().unwrap();
        drafts.save(&doc).unwrap();

        let raw = backing.get(StateKey::Draft).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        for social in value["socials"].as_array().unwrap() {
            assert!(social["icon"].is_null());
        }
        for interest in value["interests"]["zh"].as_array().unwrap() {
            assert!(interest["icon"].is_null());
        }
    }

    #[test]
    fn load_returns_saved_sections() {
        let (_, drafts) = draft_store();
        let mut doc = defaults::builtin().unwrap();
        doc.hero.en.name = "Draft Name".into();
        drafts.save(&doc).unwrap();

        let patch = drafts.load().unwrap().unwrap();
        assert_eq!(patch.hero.unwrap().en.name, "Draft Name");
        assert!(drafts.exists().unwrap());
    }

    #[test]
    fn clear_removes_the_key() {
        let (backing, drafts) = draft_store();
        drafts.save(&defaults::builtin().unwrap()).unwrap();
        drafts.clear().unwrap();

        assert!(drafts.load().unwrap().is_none());
        assert_eq!(backing.get(StateKey::Draft).unwrap(), None);
    }

    #[test]
    fn corrupt_draft_is_parse_error() {
        let (backing, drafts) = draft_store();
        backing.set(StateKey::Draft, "{truncated").unwrap();
        let err = drafts.load().unwrap_err();
        assert!(err.is_fallback());
    }
}
