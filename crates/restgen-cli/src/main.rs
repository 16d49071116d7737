//! restgen CLI.
//!
//! Turns REST API schema documents into hosted tool functions.
//!
//! # Architecture
//!
//! The pipeline runs as separate subcommands, each reading the previous
//! stage's output from disk:
//! - `index` - Write the service index
//! - `download` - Fetch schema documents for indexed services
//! - `generate` - Render tool functions and manifests
//! - `publish` - Synchronize tools with the registry
//! - `completions` - Generate shell completions
//!
//! # Examples
//!
//! ```bash
//! restgen index
//! restgen download
//! restgen generate
//! REGISTRY_API_KEY=... restgen publish
//! ```

use anyhow::Result;
use clap::Parser;
use restgen_cli::commands;
use restgen_cli::{Cli, Commands, GlobalArgs};
use restgen_core::cli::{ExitCode, OutputFormat};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let output_format = cli
        .format
        .parse::<OutputFormat>()
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let exit_code = execute_command(cli.command, &cli.global, output_format).await?;

    std::process::exit(exit_code.as_i32());
}

/// Initializes logging to stderr.
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` applies, defaulting
/// to `info`.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Routes a command to its handler.
async fn execute_command(
    command: Commands,
    global: &GlobalArgs,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    match command {
        Commands::Index { reset } => commands::index::run(global, reset, output_format).await,
        Commands::Download {
            delay_ms,
            directory_url,
        } => commands::download::run(global, delay_ms, directory_url, output_format).await,
        Commands::Generate { tools_dir } => {
            commands::generate::run(global, tools_dir, output_format).await
        }
        Commands::Publish {
            registry_url,
            api_key,
            keep,
            dry_run,
        } => {
            commands::publish::run(global, registry_url, api_key, keep, dry_run, output_format)
                .await
        }
        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            commands::completions::run(shell, &mut cmd).await
        }
    }
}
