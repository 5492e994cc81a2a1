//! folio status - Where the content comes from and what is saved locally

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::storage::StateKey;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Number of recent publishes to list
    #[arg(long, default_value = "5")]
    pub history: usize,

    /// Skip the remote fetch; report saved state only
    #[arg(long)]
    pub offline: bool,
}

pub fn run(ctx: &AppContext, args: &StatusArgs) -> Result<()> {
    let resolution = if args.offline {
        None
    } else {
        Some(ctx.resolver.load())
    };
    let snapshot = ctx.resolver.current();
    let source = ctx.resolver.remote_source()?;
    let override_url = ctx.store.get(StateKey::OverrideUrl)?;
    let draft_exists = ctx.resolver.drafts().exists()?;
    let token_saved = ctx.store.get(StateKey::PublishToken)?.is_some();
    let doc_id = ctx.store.get(StateKey::PublishDocId)?;
    let fingerprint = snapshot.document.fingerprint()?;
    let history = ctx.store.publish_history(args.history)?;

    if ctx.robot_mode {
        let payload = serde_json::json!({
            "provenance": snapshot.provenance,
            "resolution": resolution.as_ref().map(super::resolution_json),
            "remote": {
                "fixed_url": ctx.resolver.fixed_url(),
                "override_url": override_url,
                "active": source,
            },
            "draft_exists": draft_exists,
            "fingerprint": fingerprint,
            "publish": {
                "token_saved": token_saved,
                "doc_id": doc_id,
                "history": history,
            },
        });
        return emit_json(&robot_ok(payload));
    }

    let mut layout = HumanLayout::new();
    layout.title("Content Status").section("Session");
    match &resolution {
        Some(resolution) => super::describe_resolution(&mut layout, resolution),
        None => {
            layout.kv("Provenance", "not loaded (--offline)");
        }
    }
    layout
        .kv("Fingerprint", &fingerprint[..12.min(fingerprint.len())])
        .kv("Draft saved", if draft_exists { "yes" } else { "no" })
        .blank()
        .section("Remote")
        .kv("Fixed URL", ctx.resolver.fixed_url().unwrap_or("-"))
        .kv("Override URL", override_url.as_deref().unwrap_or("-"))
        .kv(
            "Active",
            &source.map_or_else(|| "none".to_string(), |source| source.to_string()),
        )
        .blank()
        .section("Publish")
        .kv("Token saved", if token_saved { "yes" } else { "no" })
        .kv("Document id", doc_id.as_deref().unwrap_or("-"));
    if !history.is_empty() {
        layout.blank().section("Recent publishes");
        for record in &history {
            layout.bullet(&format!(
                "{} {} {}{}",
                record.published_at.format("%Y-%m-%d %H:%M"),
                &record.fingerprint[..12.min(record.fingerprint.len())],
                record.fetch_url,
                if record.created { " (created)" } else { "" }
            ));
        }
    }
    emit_human(&layout);
    Ok(())
}
