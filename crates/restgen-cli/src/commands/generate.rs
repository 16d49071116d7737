//! Generate command implementation.
//!
//! This command:
//! 1. Loads the service index
//! 2. Reads each service's schema from the schema directory
//! 3. Renders one tool function per operation plus a manifest per service
//! 4. Writes everything below the tools directory, removing stale tools

use super::common::{load_config, validate};
use crate::cli::GlobalArgs;
use crate::formatters::print_output;
use anyhow::{Context, Result};
use chrono::Utc;
use restgen_catalog::{SchemaStore, load_index};
use restgen_codegen::output::export_generated;
use restgen_codegen::{GenerationDriver, SkippedService};
use restgen_core::cli::{ExitCode, OutputFormat};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

/// Result of a generation run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationResult {
    output_dir: String,
    services_processed: usize,
    services_generated: usize,
    operations_found: usize,
    tools_generated: usize,
    files_written: usize,
    stale_removed: usize,
    skipped: Vec<SkippedService>,
}

/// Runs the generate command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the index is missing
/// or unreadable, a tool fails to render, or output cannot be written.
pub async fn run(
    global: &GlobalArgs,
    tools_dir: Option<PathBuf>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let mut config = load_config(global)?;
    if let Some(dir) = tools_dir {
        config.tools_dir = dir;
    }
    validate(&config)?;

    let services = load_index(config.catalog_path()).context("failed to load service index")?;
    let store = SchemaStore::new(config.schemas_path());
    let driver = GenerationDriver::new(config.bindings.clone())
        .context("failed to initialize code generator")?;

    info!("Generating tools for {} services", services.len());
    let report = driver
        .run(&services, &store, Utc::now())
        .context("code generation failed")?;

    let output_dir = config.tools_path();
    let stats = export_generated(&report.code, &output_dir)
        .with_context(|| format!("failed to write tools to {}", output_dir.display()))?;

    if report.summary.total_tools == 0 {
        warn!("No tools generated; run `restgen download` to fetch schemas");
    }
    info!(
        "Generated {} tools for {} services in {}",
        report.summary.total_tools,
        report.summary.total_services,
        output_dir.display()
    );

    let exit_code = if report.summary.total_tools == 0 {
        ExitCode::ERROR
    } else {
        ExitCode::SUCCESS
    };

    let result = GenerationResult {
        output_dir: output_dir.display().to_string(),
        services_processed: services.len(),
        services_generated: report.summary.total_services,
        operations_found: report.operations_found,
        tools_generated: report.summary.total_tools,
        files_written: stats.written,
        stale_removed: stats.removed,
        skipped: report.skipped,
    };
    print_output(&result, output_format)?;

    Ok(exit_code)
}
