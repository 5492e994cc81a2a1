pub mod app;
pub mod cli;
pub mod config;
pub mod content;
pub mod error;
pub mod export;
pub mod publish;
pub mod remote;
pub mod resolver;
pub mod storage;

pub use error::{FolioError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
