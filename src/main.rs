//! sops buildpack CLI entry point
//!
//! Dispatches the platform's compile/detect/release phases.

use clap::Parser;
use console::style;
use sops_buildpack::cli::{Cli, Commands};
use sops_buildpack::error::BuildpackResult;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logging: SOPS_LOG takes precedence, then -v/-vv
    let filter = EnvFilter::try_from_env("SOPS_LOG").unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("sops_buildpack=warn"),
        1 => EnvFilter::new("sops_buildpack=info"),
        _ => EnvFilter::new("sops_buildpack=debug"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Diagnostics carry a prefix distinct from progress lines
            eprintln!("{} {}", style(" !").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style(" !").yellow(), hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(cli: Cli) -> BuildpackResult<()> {
    match cli.command {
        Commands::Compile(args) => sops_buildpack::cli::commands::compile(args).await,
        Commands::Detect(args) => sops_buildpack::cli::commands::detect(args).await,
        Commands::Release(args) => sops_buildpack::cli::commands::release(args).await,
    }
}
