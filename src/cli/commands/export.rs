//! folio export - Write the content out as a defaults file

use std::path::PathBuf;

use clap::Args;

use crate::app::AppContext;
use crate::cli::output::{HumanLayout, emit_human, emit_json, robot_ok};
use crate::error::Result;
use crate::export::{
    DownloadsTarget, ExportTarget, FileTarget, export_with_fallback, render_defaults_file,
    render_projects_snippet,
};

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// File or directory to write to; falls back to the downloads directory
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Only the projects section
    #[arg(long)]
    pub projects_only: bool,

    /// Print to stdout instead of writing a file
    #[arg(long, conflicts_with = "output")]
    pub stdout: bool,
}

pub fn run(ctx: &AppContext, args: &ExportArgs) -> Result<()> {
    super::open_session(ctx, true)?;
    let document = ctx.resolver.document();
    let artifact = if args.projects_only {
        render_projects_snippet(&document)?
    } else {
        render_defaults_file(&document, ctx.resolver.defaults())?
    };

    if args.stdout {
        print!("{}", artifact.contents);
        return Ok(());
    }

    let file = args
        .output
        .clone()
        .or_else(|| ctx.config.export.output.clone())
        .map(FileTarget::new);
    let downloads = ctx
        .config
        .export
        .download_dir
        .clone()
        .map(DownloadsTarget::new)
        .or_else(DownloadsTarget::platform_default);

    let mut targets: Vec<&dyn ExportTarget> = Vec::new();
    if let Some(file) = &file {
        targets.push(file);
    }
    if let Some(downloads) = &downloads {
        targets.push(downloads);
    }
    let outcome = export_with_fallback(&artifact, &targets)?;

    if ctx.robot_mode {
        let warnings = outcome.failures.iter().map(ToString::to_string).collect();
        return emit_json(&robot_ok(&outcome).with_warnings(warnings));
    }

    let mut layout = HumanLayout::new();
    layout
        .title("Content Exported")
        .kv("File", &outcome.path.display().to_string())
        .kv("Via", outcome.target);
    for failure in &outcome.failures {
        layout.warn(&failure.to_string());
    }
    emit_human(&layout);
    Ok(())
}
