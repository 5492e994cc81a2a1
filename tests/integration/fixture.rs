use std::sync::Arc;
use std::time::Duration;

use folio::content::{ContentDocument, defaults};
use folio::publish::{GistClient, PublishOptions, Publisher};
use folio::remote::HttpFetcher;
use folio::resolver::ContentResolver;
use folio::storage::{SqliteStateStore, StateStore};
use tempfile::TempDir;

/// One editing session backed by an on-disk state database.
pub struct Session {
    pub dir: TempDir,
    pub store: Arc<dyn StateStore>,
    pub resolver: ContentResolver,
}

impl Session {
    pub fn new(fixed_url: Option<String>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        Self::in_dir(dir, fixed_url)
    }

    /// A fresh process over the same state file.
    pub fn reopen(self, fixed_url: Option<String>) -> Self {
        let Self { dir, store, resolver } = self;
        drop(resolver);
        drop(store);
        Self::in_dir(dir, fixed_url)
    }

    fn in_dir(dir: TempDir, fixed_url: Option<String>) -> Self {
        let store: Arc<dyn StateStore> =
            Arc::new(SqliteStateStore::open(dir.path().join("state.db")).unwrap());
        let fetcher = Arc::new(HttpFetcher::new(Some(Duration::from_secs(5))).unwrap());
        let resolver = ContentResolver::new(
            defaults::builtin().unwrap(),
            fixed_url,
            Arc::clone(&store),
            fetcher,
        );
        Self { dir, store, resolver }
    }

    pub fn publisher(&self, endpoint: String) -> Publisher {
        let client = GistClient::new(endpoint, Some(Duration::from_secs(5))).unwrap();
        Publisher::new(client, PublishOptions::default(), Arc::clone(&self.store))
    }
}

pub fn defaults_doc() -> ContentDocument {
    defaults::builtin().unwrap()
}

/// Remote document JSON the way a published copy looks: icons nulled.
pub fn published_json(doc: &ContentDocument) -> String {
    Publisher::payload(doc).unwrap()
}
