//! folio - portfolio content CLI
//!
//! Resolve, edit, publish and export the content document behind a
//! portfolio site.

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use folio::Result;
use folio::app::AppContext;
use folio::cli::output::{emit_json, robot_error_structured};
use folio::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.robot_mode() {
                // Machine mode: structured error envelope on stdout
                if emit_json(&robot_error_structured(&e)).is_err() {
                    println!("{{\"error\":true}}");
                }
            } else {
                eprintln!("Error: {e}");
                let suggestion = e.code().suggestion();
                if !cli.quiet && !suggestion.is_empty() {
                    eprintln!("Hint: {suggestion}");
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    if let Commands::Completions(args) = &cli.command {
        return folio::cli::commands::completions::run(args);
    }
    let ctx = AppContext::from_cli(cli)?;
    folio::cli::commands::run(&ctx, &cli.command)
}

fn init_tracing(cli: &Cli) {
    if cli.quiet {
        return;
    }

    let filter = match cli.verbose {
        0 => "warn,folio=info",
        1 => "info,folio=debug",
        2 => "debug,folio=trace",
        _ => "trace",
    };

    let env_filter = EnvFilter::try_from_env("FOLIO_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(filter));

    if cli.robot_mode() {
        // JSON logging for machine mode
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
