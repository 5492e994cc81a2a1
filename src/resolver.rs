//! Content resolution.
//!
//! The [`ContentResolver`] owns the session document and decides where it
//! comes from: a remote document when one loads, else the local draft, else
//! the static defaults. A successful remote load never consults the draft.
//!
//! Every change replaces the document object wholesale, so consumers holding
//! an older `Arc<ContentDocument>` keep a consistent view and can detect the
//! change by pointer.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::content::{ContentDocument, ContentPatch, fill_missing_icons, rehydrate_icons};
use crate::error::{ErrorCode, FolioError, Result};
use crate::remote::{ContentFetcher, RemoteKind, RemoteSource};
use crate::storage::{DraftStore, StateKey, StateStore};

/// Where the session document came from. Whole-document, display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    StaticDefault,
    LocalDraft,
    RemoteFixed,
    RemoteDynamic,
}

impl Provenance {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::StaticDefault => "static-default",
            Self::LocalDraft => "local-draft",
            Self::RemoteFixed => "remote-fixed",
            Self::RemoteDynamic => "remote-dynamic",
        }
    }

    #[must_use]
    pub const fn is_remote(self) -> bool {
        matches!(self, Self::RemoteFixed | Self::RemoteDynamic)
    }
}

impl From<RemoteKind> for Provenance {
    fn from(kind: RemoteKind) -> Self {
        match kind {
            RemoteKind::Fixed => Self::RemoteFixed,
            RemoteKind::Dynamic => Self::RemoteDynamic,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Step of a load that failed without failing the load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStage {
    OverrideUrl,
    Remote,
    Draft,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub stage: LoadStage,
    pub code: ErrorCode,
    pub message: String,
}

impl LoadFailure {
    fn new(stage: LoadStage, err: &FolioError) -> Self {
        Self {
            stage,
            code: err.code(),
            message: err.to_string(),
        }
    }
}

/// Outcome of one pass of the precedence chain.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub document: ContentDocument,
    pub provenance: Provenance,
    /// The remote source the document came from, when it did.
    pub source: Option<RemoteSource>,
    pub failures: Vec<LoadFailure>,
    /// A draft existed but the remote document won.
    pub draft_shadowed: bool,
}

/// Handle for one load; only the newest ticket may commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Point-in-time view of the session.
#[derive(Debug, Clone)]
pub struct ContentSnapshot {
    pub document: Arc<ContentDocument>,
    pub provenance: Provenance,
    /// Edits not yet saved as a draft.
    pub dirty: bool,
    pub loading: bool,
    pub source: Option<RemoteSource>,
}

#[derive(Debug)]
struct SessionState {
    document: Arc<ContentDocument>,
    provenance: Provenance,
    dirty: bool,
    loading: bool,
    source: Option<RemoteSource>,
}

impl SessionState {
    fn snapshot(&self) -> ContentSnapshot {
        ContentSnapshot {
            document: Arc::clone(&self.document),
            provenance: self.provenance,
            dirty: self.dirty,
            loading: self.loading,
            source: self.source.clone(),
        }
    }
}

pub struct ContentResolver {
    defaults: Arc<ContentDocument>,
    fixed_url: Option<String>,
    store: Arc<dyn StateStore>,
    drafts: DraftStore,
    fetcher: Arc<dyn ContentFetcher>,
    state: Mutex<SessionState>,
    load_seq: AtomicU64,
    subscribers: Mutex<Vec<Sender<ContentSnapshot>>>,
}

impl fmt::Debug for ContentResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentResolver")
            .field("fixed_url", &self.fixed_url)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl ContentResolver {
    /// A session showing `defaults` until the first load commits.
    pub fn new(
        defaults: ContentDocument,
        fixed_url: Option<String>,
        store: Arc<dyn StateStore>,
        fetcher: Arc<dyn ContentFetcher>,
    ) -> Self {
        let defaults = Arc::new(defaults);
        let fixed_url = fixed_url.filter(|url| !url.trim().is_empty());
        Self {
            state: Mutex::new(SessionState {
                document: Arc::clone(&defaults),
                provenance: Provenance::StaticDefault,
                dirty: false,
                loading: false,
                source: None,
            }),
            defaults,
            fixed_url,
            drafts: DraftStore::new(Arc::clone(&store)),
            store,
            fetcher,
            load_seq: AtomicU64::new(0),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn defaults(&self) -> &ContentDocument {
        &self.defaults
    }

    #[must_use]
    pub fn fixed_url(&self) -> Option<&str> {
        self.fixed_url.as_deref()
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    #[must_use]
    pub fn drafts(&self) -> &DraftStore {
        &self.drafts
    }

    /// The remote source a load would try right now.
    pub fn remote_source(&self) -> Result<Option<RemoteSource>> {
        let dynamic = self.store.get(StateKey::OverrideUrl)?;
        Ok(RemoteSource::select(
            self.fixed_url.as_deref(),
            dynamic.as_deref(),
        ))
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Run the precedence chain and commit the result. Never fails: every
    /// problem on the way is logged and reported in [`Resolution::failures`].
    pub fn load(&self) -> Resolution {
        let ticket = self.begin_load();
        let resolution = self.resolve();
        self.commit(ticket, &resolution);
        resolution
    }

    /// Start a load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&self) -> LoadTicket {
        let ticket = LoadTicket(self.load_seq.fetch_add(1, Ordering::SeqCst) + 1);
        let snapshot = {
            let mut state = self.state.lock();
            state.loading = true;
            state.snapshot()
        };
        debug!(ticket = ticket.0, "load started");
        self.notify(snapshot);
        ticket
    }

    /// Resolve the session document without touching session state.
    pub fn resolve(&self) -> Resolution {
        let mut failures = Vec::new();

        let dynamic = match self.store.get(StateKey::OverrideUrl) {
            Ok(url) => url,
            Err(err) => {
                warn!(error = %err, "could not read saved remote URL");
                failures.push(LoadFailure::new(LoadStage::OverrideUrl, &err));
                None
            }
        };

        if let Some(source) = RemoteSource::select(self.fixed_url.as_deref(), dynamic.as_deref()) {
            match self.fetcher.fetch(&source.url) {
                Ok(patch) => {
                    let sections = patch.sections().len();
                    let merged = self.defaults.merged(patch.without_icons());
                    let document = self.with_default_icons(merged);
                    let draft_shadowed = self.drafts.exists().unwrap_or(false);
                    if draft_shadowed {
                        warn!(url = %source.url, "remote content loaded; saved draft not applied");
                    }
                    info!(url = %source.url, kind = ?source.kind, sections, "loaded remote content");
                    return Resolution {
                        document,
                        provenance: source.kind.into(),
                        source: Some(source),
                        failures,
                        draft_shadowed,
                    };
                }
                Err(err) => {
                    warn!(url = %source.url, error = %err, "remote content unavailable, falling back");
                    failures.push(LoadFailure::new(LoadStage::Remote, &err));
                }
            }
        }

        match self.drafts.load() {
            Ok(Some(patch)) => {
                info!("loaded local draft");
                Resolution {
                    document: self.with_default_icons(self.defaults.merged(patch.without_icons())),
                    provenance: Provenance::LocalDraft,
                    source: None,
                    failures,
                    draft_shadowed: false,
                }
            }
            Ok(None) => self.static_resolution(failures),
            Err(err) => {
                warn!(error = %err, "saved draft unreadable, using defaults");
                failures.push(LoadFailure::new(LoadStage::Draft, &err));
                self.static_resolution(failures)
            }
        }
    }

    /// Icons of a merged document come from the defaults only: whole
    /// sections when the head social has none, then entry by entry.
    fn with_default_icons(&self, doc: ContentDocument) -> ContentDocument {
        fill_missing_icons(rehydrate_icons(doc, &self.defaults), &self.defaults)
    }

    fn static_resolution(&self, failures: Vec<LoadFailure>) -> Resolution {
        debug!("using static defaults");
        Resolution {
            document: (*self.defaults).clone(),
            provenance: Provenance::StaticDefault,
            source: None,
            failures,
            draft_shadowed: false,
        }
    }

    /// Install a resolution if `ticket` is still the newest load.
    /// Returns false when the result was discarded.
    pub fn commit(&self, ticket: LoadTicket, resolution: &Resolution) -> bool {
        let snapshot = {
            let mut state = self.state.lock();
            let newest = self.load_seq.load(Ordering::SeqCst);
            if ticket.0 != newest {
                debug!(ticket = ticket.0, newest, "discarding stale load");
                return false;
            }
            state.document = Arc::new(resolution.document.clone());
            state.provenance = resolution.provenance;
            state.source = resolution.source.clone();
            state.dirty = false;
            state.loading = false;
            state.snapshot()
        };
        self.notify(snapshot);
        true
    }

    // =========================================================================
    // Session access
    // =========================================================================

    #[must_use]
    pub fn current(&self) -> ContentSnapshot {
        self.state.lock().snapshot()
    }

    #[must_use]
    pub fn document(&self) -> Arc<ContentDocument> {
        Arc::clone(&self.state.lock().document)
    }

    #[must_use]
    pub fn provenance(&self) -> Provenance {
        self.state.lock().provenance
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    /// Receives a snapshot after every committed change.
    pub fn subscribe(&self) -> Receiver<ContentSnapshot> {
        let (tx, rx) = crossbeam_channel::unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    fn notify(&self, snapshot: ContentSnapshot) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(snapshot.clone()).is_ok());
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adopt (or drop) the runtime remote URL, then reload.
    ///
    /// Adopting a URL clears the local draft so it cannot mask the new remote
    /// content. Dropping the URL keeps the draft, which then wins the reload
    /// unless a fixed URL is configured.
    pub fn set_override_url(&self, url: Option<&str>) -> Result<Resolution> {
        match url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => {
                validate_url(url)?;
                self.store.set(StateKey::OverrideUrl, url)?;
                self.drafts.clear()?;
                info!(url, "remote URL override saved, draft cleared");
            }
            None => {
                self.store.remove(StateKey::OverrideUrl)?;
                info!("remote URL override removed");
            }
        }
        Ok(self.load())
    }

    /// Shallow-merge `patch` into the session document.
    pub fn update(&self, patch: ContentPatch) {
        let sections = patch.sections();
        let snapshot = {
            let mut state = self.state.lock();
            self.apply_locked(&mut state, patch);
            state.snapshot()
        };
        debug!(?sections, "content updated");
        self.notify(snapshot);
    }

    /// Compute a patch from the current document and apply it atomically.
    pub fn edit<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&ContentDocument) -> Result<ContentPatch>,
    {
        self.edit_with(|doc| f(doc).map(|patch| (patch, ())))
    }

    /// Like [`edit`](Self::edit), passing through a value computed with the patch.
    pub fn edit_with<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&ContentDocument) -> Result<(ContentPatch, T)>,
    {
        let (value, snapshot) = {
            let mut state = self.state.lock();
            let (patch, value) = f(&state.document)?;
            debug!(sections = ?patch.sections(), "content edited");
            self.apply_locked(&mut state, patch);
            (value, state.snapshot())
        };
        self.notify(snapshot);
        Ok(value)
    }

    fn apply_locked(&self, state: &mut SessionState, patch: ContentPatch) {
        let merged = state.document.merged(patch.without_icons());
        let next = fill_missing_icons(merged, &self.defaults);
        state.document = Arc::new(next);
        state.dirty = true;
    }

    /// Persist the session document as the local draft.
    pub fn save_draft(&self) -> Result<()> {
        let document = self.document();
        self.drafts.save(&document)?;
        let snapshot = {
            let mut state = self.state.lock();
            // An edit that raced the save keeps the session dirty.
            if Arc::ptr_eq(&state.document, &document) {
                state.dirty = false;
            }
            state.snapshot()
        };
        info!("draft saved");
        self.notify(snapshot);
        Ok(())
    }

    /// Apply the saved draft over the session document. Returns false when
    /// there is no draft.
    pub fn resume_draft(&self) -> Result<bool> {
        let Some(patch) = self.drafts.load()? else {
            return Ok(false);
        };
        let snapshot = {
            let mut state = self.state.lock();
            let next = self.with_default_icons(state.document.merged(patch.without_icons()));
            state.document = Arc::new(next);
            state.provenance = Provenance::LocalDraft;
            state.source = None;
            state.dirty = false;
            state.snapshot()
        };
        info!("resumed local draft");
        self.notify(snapshot);
        Ok(true)
    }

    /// Discard the draft, show the defaults, then reload.
    pub fn reset(&self) -> Result<Resolution> {
        self.drafts.clear()?;
        let snapshot = {
            let mut state = self.state.lock();
            state.document = Arc::clone(&self.defaults);
            state.provenance = Provenance::StaticDefault;
            state.source = None;
            state.dirty = false;
            state.snapshot()
        };
        info!("content reset to defaults");
        self.notify(snapshot);
        Ok(self.load())
    }
}

fn validate_url(url: &str) -> Result<()> {
    let parsed = reqwest::Url::parse(url)
        .map_err(|err| FolioError::Config(format!("invalid remote URL '{url}': {err}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(FolioError::Config(format!(
            "unsupported URL scheme '{scheme}' (expected http or https)"
        ))),
    }
}
