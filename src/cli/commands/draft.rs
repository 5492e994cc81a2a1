//! folio draft - Inspect or discard the local draft

use clap::{Args, Subcommand};

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;

#[derive(Args, Debug)]
pub struct DraftArgs {
    #[command(subcommand)]
    pub command: DraftCommand,
}

#[derive(Subcommand, Debug)]
pub enum DraftCommand {
    /// Print the saved draft (icons are never stored)
    Show,
    /// Delete the saved draft
    Clear,
    /// Delete the draft and reload from remote or defaults
    Reset,
}

pub fn run(ctx: &AppContext, args: &DraftArgs) -> Result<()> {
    match &args.command {
        DraftCommand::Show => show(ctx),
        DraftCommand::Clear => clear(ctx),
        DraftCommand::Reset => reset(ctx),
    }
}

fn show(ctx: &AppContext) -> Result<()> {
    let draft = ctx.resolver.drafts().load()?;
    if ctx.robot_mode {
        let payload = serde_json::json!({
            "exists": draft.is_some(),
            "sections": draft.as_ref().map(|patch| patch.sections()),
            "draft": draft,
        });
        return emit_json(&robot_ok(payload));
    }
    match draft {
        Some(patch) => println!("{}", serde_json::to_string_pretty(&patch)?),
        None => {
            let mut layout = HumanLayout::new();
            layout.push_line("No local draft saved.");
            emit_human(&layout);
        }
    }
    Ok(())
}

fn clear(ctx: &AppContext) -> Result<()> {
    let existed = ctx.resolver.drafts().exists()?;
    ctx.resolver.drafts().clear()?;
    if ctx.robot_mode {
        emit_json(&robot_ok(serde_json::json!({ "cleared": existed })))
    } else {
        let mut layout = HumanLayout::new();
        layout.push_line(if existed {
            "Local draft deleted."
        } else {
            "No local draft to delete."
        });
        emit_human(&layout);
        Ok(())
    }
}

fn reset(ctx: &AppContext) -> Result<()> {
    let resolution = ctx.resolver.reset()?;
    if ctx.robot_mode {
        emit_json(&robot_ok(super::resolution_json(&resolution)))
    } else {
        let mut layout = HumanLayout::new();
        layout.title("Draft Discarded");
        super::describe_resolution(&mut layout, &resolution);
        emit_human(&layout);
        Ok(())
    }
}
