//! folio remote - Manage the runtime remote content URL

use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::storage::StateKey;

#[derive(Args, Debug)]
pub struct RemoteArgs {
    #[command(subcommand)]
    pub command: RemoteCommand,
}

#[derive(Subcommand, Debug)]
pub enum RemoteCommand {
    /// Show the configured and saved URLs
    Show,
    /// Save a URL to load content from; discards the local draft
    Set(RemoteSetArgs),
    /// Forget the saved URL; the local draft is kept
    Clear,
}

#[derive(Args, Debug)]
pub struct RemoteSetArgs {
    /// http(s) URL of a content JSON document
    pub url: String,
}

pub fn run(ctx: &AppContext, args: &RemoteArgs) -> Result<()> {
    match &args.command {
        RemoteCommand::Show => show(ctx),
        RemoteCommand::Set(args) => set(ctx, Some(args.url.as_str())),
        RemoteCommand::Clear => set(ctx, None),
    }
}

fn show(ctx: &AppContext) -> Result<()> {
    let override_url = ctx.store.get(StateKey::OverrideUrl)?;
    let active = ctx.resolver.remote_source()?;
    let fixed = ctx.resolver.fixed_url();

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "fixed_url": fixed,
            "override_url": override_url,
            "active": active,
        });
        return emit_json(&robot_ok(payload));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Remote Content")
        .kv("Fixed URL", fixed.unwrap_or("-"))
        .kv("Override URL", override_url.as_deref().unwrap_or("-"))
        .kv(
            "Active",
            &active.map_or_else(|| "none".to_string(), |source| source.to_string()),
        );
    if fixed.is_some() && override_url.is_some() {
        layout
            .blank()
            .warn("The fixed URL outranks the saved override; the override is not used");
    }
    emit_human(&layout);
    Ok(())
}

fn set(ctx: &AppContext, url: Option<&str>) -> Result<()> {
    let resolution = ctx.resolver.set_override_url(url)?;

    if ctx.robot_mode {
        let mut payload = super::resolution_json(&resolution);
        payload["override_url"] = serde_json::json!(url);
        return emit_json(&robot_ok(payload));
    }

    let mut layout = HumanLayout::new();
    layout
        .title(if url.is_some() {
            "Remote URL Saved"
        } else {
            "Remote URL Cleared"
        });
    if url.is_some() {
        layout.bullet("Local draft discarded");
    }
    layout.blank();
    super::describe_resolution(&mut layout, &resolution);
    emit_human(&layout);
    Ok(())
}
