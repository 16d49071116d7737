//! Download command implementation.
//!
//! Fetches a schema document for every service in the index, one service at
//! a time, and records the URL each document was found at.

use super::common::{load_config, validate};
use crate::cli::GlobalArgs;
use crate::formatters::print_output;
use anyhow::{Context, Result};
use restgen_catalog::{
    DownloadOutcome, DownloadReport, HttpFetcher, SchemaDownloader, SchemaStore, load_index,
    save_index,
};
use restgen_core::cli::{ExitCode, OutputFormat};
use serde::Serialize;
use tracing::{info, warn};

/// Result of a download run.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DownloadSummary {
    /// Services in the index
    pub services: usize,
    /// Documents fetched in this run
    pub downloaded: usize,
    /// Documents that were already on disk
    pub already_present: usize,
    /// Keys of the services without a document
    pub failed: Vec<String>,
}

impl DownloadSummary {
    /// Summarizes a download report.
    #[must_use]
    pub fn from_report(report: &DownloadReport) -> Self {
        let count = |pred: fn(&DownloadOutcome) -> bool| {
            report.services.iter().filter(|(_, o)| pred(o)).count()
        };
        Self {
            services: report.services.len(),
            downloaded: count(|o| matches!(o, DownloadOutcome::Downloaded { .. })),
            already_present: count(|o| matches!(o, DownloadOutcome::AlreadyPresent)),
            failed: report.failed().into_iter().map(str::to_string).collect(),
        }
    }

    /// Exit code of the run: an error only when no service has a document.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        if self.services > 0 && self.failed.len() == self.services {
            ExitCode::REMOTE_ERROR
        } else {
            ExitCode::SUCCESS
        }
    }
}

/// Runs the download command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the index is missing
/// or unreadable, or a document or the updated index cannot be written.
pub async fn run(
    global: &GlobalArgs,
    delay_ms: Option<u64>,
    directory_url: Option<String>,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let mut config = load_config(global)?;
    if let Some(ms) = delay_ms {
        config.download_delay_ms = ms;
    }
    if let Some(url) = directory_url {
        config.directory_url = url;
    }
    validate(&config)?;

    let catalog_path = config.catalog_path();
    let mut services = load_index(&catalog_path).context("failed to load service index")?;
    let store = SchemaStore::new(config.schemas_path());
    let fetcher = HttpFetcher::new().context("failed to initialize HTTP client")?;
    let downloader =
        SchemaDownloader::new(fetcher, config.directory_url.clone(), config.download_delay());

    info!(
        "Downloading schemas for {} services into {}",
        services.len(),
        store.dir().display()
    );
    let report = downloader
        .download_all(&mut services, &store)
        .await
        .context("schema download failed")?;

    save_index(&catalog_path, &services).context("failed to update service index")?;

    let summary = DownloadSummary::from_report(&report);
    if !summary.failed.is_empty() {
        warn!("No schema found for {} services", summary.failed.len());
    }
    print_output(&summary, output_format)?;

    Ok(summary.exit_code())
}
