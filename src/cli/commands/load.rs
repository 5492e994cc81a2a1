//! folio load - Run the precedence chain and report each step

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::{FolioError, Result};

#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Exit non-zero unless the content came from a remote source
    #[arg(long)]
    pub require_remote: bool,
}

pub fn run(ctx: &AppContext, args: &LoadArgs) -> Result<()> {
    let resolution = ctx.resolver.load();
    let fingerprint = resolution.document.fingerprint()?;

    if ctx.robot_mode {
        let mut payload = super::resolution_json(&resolution);
        payload["fingerprint"] = serde_json::Value::String(fingerprint);
        emit_json(&robot_ok(payload))?;
    } else {
        let mut layout = HumanLayout::new();
        layout.title("Content Loaded");
        super::describe_resolution(&mut layout, &resolution);
        layout.kv("Fingerprint", &fingerprint[..12.min(fingerprint.len())]);
        emit_human(&layout);
    }

    if args.require_remote && !resolution.provenance.is_remote() {
        let detail = resolution
            .failures
            .first()
            .map_or_else(|| "no remote URL configured".to_string(), |f| f.message.clone());
        return Err(FolioError::Network(format!(
            "content resolved to {}: {detail}",
            resolution.provenance
        )));
    }
    Ok(())
}
