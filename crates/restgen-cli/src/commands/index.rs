//! Index command implementation.
//!
//! Writes the curated production service list to the service index. Schema
//! URLs discovered by earlier downloads survive a rewrite unless `--reset`
//! is given.

use super::common::{load_config, validate};
use crate::cli::GlobalArgs;
use crate::formatters::print_output;
use anyhow::{Context, Result};
use restgen_catalog::{curated_services, load_index, save_index};
use restgen_core::Service;
use restgen_core::cli::{ExitCode, OutputFormat};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// Result of writing the service index.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct IndexResult {
    path: String,
    services: usize,
    schema_urls_kept: usize,
}

/// Copies schema URLs from a previous index onto matching services.
///
/// Returns the number of services that received a URL.
///
/// # Examples
///
/// ```
/// use restgen_cli::commands::index::carry_schema_urls;
/// use restgen_core::Service;
///
/// let previous = [Service::new("wql", "v1").with_schema_url("https://example.com/wql.json")];
/// let mut services = vec![Service::new("wql", "v1"), Service::new("staffing", "v7")];
///
/// assert_eq!(carry_schema_urls(&mut services, &previous), 1);
/// assert_eq!(services[0].schema_url.as_deref(), Some("https://example.com/wql.json"));
/// ```
pub fn carry_schema_urls(services: &mut [Service], previous: &[Service]) -> usize {
    let known: HashMap<String, &str> = previous
        .iter()
        .filter_map(|s| {
            s.schema_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .map(|url| (s.key(), url))
        })
        .collect();

    let mut kept = 0;
    for service in services.iter_mut() {
        if let Some(url) = known.get(&service.key()) {
            service.schema_url = Some((*url).to_string());
            kept += 1;
        }
    }
    kept
}

/// Runs the index command.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an existing index
/// cannot be read (use `--reset` to replace it), or the index cannot be
/// written.
pub async fn run(global: &GlobalArgs, reset: bool, output_format: OutputFormat) -> Result<ExitCode> {
    let config = load_config(global)?;
    validate(&config)?;
    let path = config.catalog_path();

    let mut services = curated_services();
    let schema_urls_kept = if !reset && path.exists() {
        let previous = load_index(&path)
            .context("failed to read existing service index (use --reset to replace it)")?;
        carry_schema_urls(&mut services, &previous)
    } else {
        0
    };

    save_index(&path, &services).context("failed to write service index")?;
    info!(
        "Indexed {} services ({} known schema URLs kept)",
        services.len(),
        schema_urls_kept
    );

    let result = IndexResult {
        path: path.display().to_string(),
        services: services.len(),
        schema_urls_kept,
    };
    print_output(&result, output_format)?;

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn global(temp: &TempDir) -> GlobalArgs {
        GlobalArgs {
            config: None,
            root: Some(temp.path().to_path_buf()),
        }
    }

    #[test]
    fn test_carry_ignores_empty_urls_and_other_versions() {
        let previous = [
            Service::new("wql", "v1").with_schema_url(""),
            Service::new("staffing", "v6").with_schema_url("https://example.com/staffing-v6.json"),
        ];
        let mut services = vec![Service::new("wql", "v1"), Service::new("staffing", "v7")];
        assert_eq!(carry_schema_urls(&mut services, &previous), 0);
        assert!(services.iter().all(|s| s.schema_url.is_none()));
    }

    #[tokio::test]
    async fn test_index_keeps_discovered_urls() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("service-index.json");
        let previous = vec![Service::new("wql", "v1").with_schema_url("https://example.com/wql.json")];
        save_index(&path, &previous).unwrap();

        let code = run(&global(&temp), false, OutputFormat::Json).await.unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let services = load_index(&path).unwrap();
        assert_eq!(services.len(), curated_services().len());
        let wql = services.iter().find(|s| s.name.as_str() == "wql").unwrap();
        assert_eq!(wql.schema_url.as_deref(), Some("https://example.com/wql.json"));
    }

    #[tokio::test]
    async fn test_reset_replaces_unreadable_index() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("service-index.json");
        fs::write(&path, "not json").unwrap();

        assert!(run(&global(&temp), false, OutputFormat::Json).await.is_err());

        run(&global(&temp), true, OutputFormat::Json).await.unwrap();
        let services = load_index(&path).unwrap();
        assert!(services.iter().all(|s| s.schema_url.is_none()));
    }
}
