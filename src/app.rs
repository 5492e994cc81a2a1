//! Shared state for CLI commands.

use std::sync::Arc;

use tracing::debug;

use crate::cli::Cli;
use crate::config::Config;
use crate::content::defaults;
use crate::error::Result;
use crate::publish::{GistClient, Publisher};
use crate::remote::HttpFetcher;
use crate::resolver::ContentResolver;
use crate::storage::{SqliteStateStore, StateStore};

pub struct AppContext {
    pub config: Config,
    pub robot_mode: bool,
    pub verbosity: u8,
    pub store: Arc<dyn StateStore>,
    pub resolver: ContentResolver,
    pub publisher: Publisher,
}

impl AppContext {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let config = Config::load(cli.config.as_deref())?;
        Self::from_config(config, cli.robot_mode(), cli.verbose)
    }

    /// Wire up the store, resolver and publisher described by `config`.
    pub fn from_config(config: Config, robot_mode: bool, verbosity: u8) -> Result<Self> {
        let state_path = config.state_path()?;
        debug!(path = %state_path.display(), "opening state store");
        let store: Arc<dyn StateStore> = Arc::new(SqliteStateStore::open(&state_path)?);

        let defaults = defaults::load(config.content.defaults_path.as_deref())?;
        let fetcher = Arc::new(HttpFetcher::new(Some(config.remote.timeout))?);
        let resolver = ContentResolver::new(
            defaults,
            config.remote.fixed_url.clone(),
            Arc::clone(&store),
            fetcher,
        );

        let client = GistClient::new(
            config.publish.endpoint.clone(),
            Some(config.publish.timeout),
        )?;
        let publisher = Publisher::new(client, config.publish.options(), Arc::clone(&store));

        Ok(Self {
            config,
            robot_mode,
            verbosity,
            store,
            resolver,
            publisher,
        })
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("robot_mode", &self.robot_mode)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}
