//! folio publish - Upload the content and switch to the published URL

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::publish::Publisher;

#[derive(Args, Debug)]
pub struct PublishArgs {
    /// API token with gist scope; saved after a successful publish
    #[arg(long, env = "FOLIO_PUBLISH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Update this document instead of the saved one
    #[arg(long)]
    pub id: Option<String>,

    /// Keep loading content from the current source afterwards
    #[arg(long)]
    pub no_apply: bool,

    /// Print the upload payload without sending it
    #[arg(long, conflicts_with = "forget")]
    pub dry_run: bool,

    /// Forget the saved token and document id instead of publishing
    #[arg(long)]
    pub forget: bool,
}

pub fn run(ctx: &AppContext, args: &PublishArgs) -> Result<()> {
    if args.forget {
        return forget(ctx);
    }

    super::open_session(ctx, true)?;

    if args.dry_run {
        let payload = Publisher::payload(&ctx.resolver.document())?;
        if ctx.robot_mode {
            let value: serde_json::Value = serde_json::from_str(&payload)?;
            return emit_json(&robot_ok(serde_json::json!({
                "file_name": ctx.publisher.options().file_name,
                "payload": value,
            })));
        }
        println!("{payload}");
        return Ok(());
    }

    let outcome = ctx.publisher.publish_session(
        &ctx.resolver,
        args.token.as_deref(),
        args.id.as_deref(),
        !args.no_apply,
    )?;

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "doc_id": outcome.result.doc_id,
            "fetch_url": outcome.result.fetch_url,
            "created": outcome.result.created,
            "applied": outcome.applied.as_ref().map(super::resolution_json),
        });
        return emit_json(&robot_ok(payload));
    }

    let mut layout = HumanLayout::new();
    layout
        .title(if outcome.result.created {
            "Content Published (new document)"
        } else {
            "Content Published"
        })
        .kv("Document id", &outcome.result.doc_id)
        .kv("URL", &outcome.result.fetch_url);
    match &outcome.applied {
        Some(resolution) => {
            layout.blank().section("Now loading from");
            super::describe_resolution(&mut layout, resolution);
        }
        None => {
            layout
                .blank()
                .bullet("Run `folio remote set <URL>` to load from the published copy");
        }
    }
    emit_human(&layout);
    Ok(())
}

fn forget(ctx: &AppContext) -> Result<()> {
    ctx.publisher.forget()?;
    if ctx.robot_mode {
        emit_json(&robot_ok(serde_json::json!({ "forgotten": true })))
    } else {
        let mut layout = HumanLayout::new();
        layout
            .push_line("Saved publish token and document id removed.")
            .push_line("The next publish creates a new document.");
        emit_human(&layout);
        Ok(())
    }
}
