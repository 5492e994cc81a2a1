//! CLI module - Command-line interface definitions and handlers
//!
//! Uses clap v4 with derive macros for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod commands;
pub mod output;

/// folio - Manage portfolio site content: defaults, drafts, remote copies
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable machine-readable JSON output.
    /// Ideal for scripts that need structured output.
    #[arg(long, short = 'm', global = true)]
    pub machine: bool,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file path (default: ~/.config/folio/config.toml)
    #[arg(long, global = true, env = "FOLIO_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether output should be JSON instead of human layout.
    #[must_use]
    pub const fn robot_mode(&self) -> bool {
        self.machine
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the resolved content, whole or one section
    Show(commands::show::ShowArgs),

    /// Show where the content comes from and what is saved locally
    Status(commands::status::StatusArgs),

    /// Run the remote > draft > defaults chain and report each step
    Load(commands::load::LoadArgs),

    /// Edit projects or replace whole sections (saved as the local draft)
    Edit(commands::edit::EditArgs),

    /// Inspect or discard the local draft
    Draft(commands::draft::DraftArgs),

    /// Manage the runtime remote content URL
    Remote(commands::remote::RemoteArgs),

    /// Upload the content and switch to the published URL
    Publish(commands::publish::PublishArgs),

    /// Write the content out as a defaults file
    Export(commands::export::ExportArgs),

    /// Generate shell completions
    Completions(commands::completions::CompletionsArgs),
}
