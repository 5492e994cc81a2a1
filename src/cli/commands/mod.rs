//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - `run()` function to execute the command

use crate::app::AppContext;
use crate::cli::Commands;
use crate::cli::output::HumanLayout;
use crate::error::Result;
use crate::resolver::{LoadStage, Provenance, Resolution};

pub mod completions;
pub mod draft;
pub mod edit;
pub mod export;
pub mod load;
pub mod publish;
pub mod remote;
pub mod show;
pub mod status;

pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Show(args) => show::run(ctx, args),
        Commands::Status(args) => status::run(ctx, args),
        Commands::Load(args) => load::run(ctx, args),
        Commands::Edit(args) => edit::run(ctx, args),
        Commands::Draft(args) => draft::run(ctx, args),
        Commands::Remote(args) => remote::run(ctx, args),
        Commands::Publish(args) => publish::run(ctx, args),
        Commands::Export(args) => export::run(ctx, args),
        Commands::Completions(args) => completions::run(args),
    }
}

/// Load the session. With `resume`, a saved draft is laid over whatever the
/// load produced so edits continue where the last command left off.
pub(crate) fn open_session(ctx: &AppContext, resume: bool) -> Result<Resolution> {
    let resolution = ctx.resolver.load();
    let draft_unreadable = resolution
        .failures
        .iter()
        .any(|failure| failure.stage == LoadStage::Draft);
    if resume && resolution.provenance != Provenance::LocalDraft && !draft_unreadable {
        ctx.resolver.resume_draft()?;
    }
    Ok(resolution)
}

/// Machine-readable summary of a load.
pub(crate) fn resolution_json(resolution: &Resolution) -> serde_json::Value {
    serde_json::json!({
        "provenance": resolution.provenance,
        "source": resolution.source.as_ref().map(|source| source.url.as_str()),
        "draft_shadowed": resolution.draft_shadowed,
        "failures": resolution.failures,
    })
}

/// Human rendering of a load, shared by `load`, `remote` and `publish`.
pub(crate) fn describe_resolution(layout: &mut HumanLayout, resolution: &Resolution) {
    layout.kv("Provenance", resolution.provenance.as_str());
    if let Some(source) = &resolution.source {
        layout.kv("Source", &source.to_string());
    }
    for failure in &resolution.failures {
        layout.warn(&format!(
            "{:?} step failed [{}]: {}",
            failure.stage, failure.code, failure.message
        ));
    }
    if resolution.draft_shadowed {
        layout.warn("A local draft exists but the remote content was used");
    }
}
