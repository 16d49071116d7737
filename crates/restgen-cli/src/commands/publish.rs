//! Publish command implementation.
//!
//! Makes the tool registry match the generated tools: stale generated tools
//! are deleted, new tools created and changed tools updated. With
//! `--dry-run` the registry is only listed and the plan is printed.

use super::common::{load_config, validate};
use crate::cli::GlobalArgs;
use crate::formatters::print_output;
use anyhow::{Context, Result};
use restgen_core::cli::{ExitCode, OutputFormat};
use restgen_publish::{
    LocalCatalog, PublishError, PublishPlan, PublishReport, Publisher, RegistryClient, ToolAction,
};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{error, info};

/// What a publish run would do.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlanSummary {
    /// Registry base URL
    pub registry: String,
    /// Remote tools that would be deleted
    pub delete: Vec<String>,
    /// Local tools that would be created
    pub create: Vec<String>,
    /// Local tools that would be updated
    pub update: Vec<String>,
    /// Local tools already up to date
    pub unchanged: usize,
}

impl PlanSummary {
    /// Summarizes a plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_cli::commands::publish::PlanSummary;
    /// use restgen_publish::{PublishPlan, ToolAction};
    ///
    /// let plan = PublishPlan {
    ///     deletions: vec![],
    ///     actions: vec![("Wql-Data-GET-getData".to_string(), ToolAction::Create)],
    /// };
    /// let summary = PlanSummary::from_plan(&plan, "http://localhost:3000");
    /// assert_eq!(summary.create, ["Wql-Data-GET-getData"]);
    /// ```
    #[must_use]
    pub fn from_plan(plan: &PublishPlan, registry: &str) -> Self {
        let mut summary = Self {
            registry: registry.to_string(),
            delete: plan.deletions.iter().map(|t| t.name.clone()).collect(),
            create: Vec::new(),
            update: Vec::new(),
            unchanged: 0,
        };
        for (name, action) in &plan.actions {
            match action {
                ToolAction::Create => summary.create.push(name.clone()),
                ToolAction::Update { .. } => summary.update.push(name.clone()),
                ToolAction::Unchanged { .. } => summary.unchanged += 1,
            }
        }
        summary
    }
}

/// Result of a publish run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PublishResult {
    registry: String,
    #[serde(flatten)]
    report: PublishReport,
}

/// Exit code for a finished run: a remote error if any registry operation
/// failed.
#[must_use]
pub const fn exit_code(report: &PublishReport) -> ExitCode {
    if report.is_clean() {
        ExitCode::SUCCESS
    } else {
        ExitCode::REMOTE_ERROR
    }
}

/// Runs the publish command.
///
/// Registry failures that stop the whole run (listing, unreachable host)
/// are logged and mapped to [`ExitCode::REMOTE_ERROR`].
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the tools directory is
/// missing, or the checkpoint cannot be read or written.
pub async fn run(
    global: &GlobalArgs,
    registry_url: Option<String>,
    api_key: Option<String>,
    keep: Vec<String>,
    dry_run: bool,
    output_format: OutputFormat,
) -> Result<ExitCode> {
    let mut config = load_config(global)?;
    if let Some(url) = registry_url {
        config.registry_url = url;
    }
    config.keep_tools.extend(keep);
    validate(&config)?;

    let catalog =
        LocalCatalog::scan(config.tools_path()).context("failed to read generated tools")?;
    let client = RegistryClient::new(config.registry_url.clone(), api_key.map(SecretString::from))
        .context("failed to create registry client")?;
    let publisher =
        Publisher::new(client, config.state_path()).with_keep_list(config.keep_tools.clone());

    info!(
        "Publishing {} tools to {}",
        catalog.tools.len(),
        config.registry_url
    );

    if dry_run {
        let plan = match publisher.plan(&catalog).await {
            Ok(plan) => plan,
            Err(e) => return remote_failure(e),
        };
        print_output(
            &PlanSummary::from_plan(&plan, &config.registry_url),
            output_format,
        )?;
        return Ok(ExitCode::SUCCESS);
    }

    let report = match publisher.publish(&catalog).await {
        Ok(report) => report,
        Err(e) => return remote_failure(e),
    };
    let code = exit_code(&report);

    print_output(
        &PublishResult {
            registry: config.registry_url,
            report,
        },
        output_format,
    )?;

    Ok(code)
}

fn remote_failure(err: PublishError) -> Result<ExitCode> {
    if err.is_remote() {
        error!("{err}");
        Ok(ExitCode::REMOTE_ERROR)
    } else {
        Err(err).context("publish failed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restgen_publish::RemoteTool;
    use restgen_publish::publisher::Failure;

    #[test]
    fn test_plan_summary_groups_actions() {
        let plan = PublishPlan {
            deletions: vec![RemoteTool {
                id: "9".to_string(),
                name: "Old-Tool-GET-gone".to_string(),
            }],
            actions: vec![
                ("A-B-GET-new".to_string(), ToolAction::Create),
                (
                    "A-B-GET-changed".to_string(),
                    ToolAction::Update {
                        id: "1".to_string(),
                    },
                ),
                (
                    "A-B-GET-same".to_string(),
                    ToolAction::Unchanged {
                        id: "2".to_string(),
                    },
                ),
            ],
        };

        let summary = PlanSummary::from_plan(&plan, "http://registry");
        assert_eq!(
            summary,
            PlanSummary {
                registry: "http://registry".to_string(),
                delete: vec!["Old-Tool-GET-gone".to_string()],
                create: vec!["A-B-GET-new".to_string()],
                update: vec!["A-B-GET-changed".to_string()],
                unchanged: 1,
            }
        );
    }

    #[test]
    fn test_exit_code_reflects_failures() {
        let mut report = PublishReport::default();
        assert_eq!(exit_code(&report), ExitCode::SUCCESS);

        report.delete_failures.push(Failure {
            name: "Old-Tool-GET-gone".to_string(),
            message: "HTTP 500".to_string(),
        });
        assert_eq!(exit_code(&report), ExitCode::REMOTE_ERROR);
    }

    #[test]
    fn test_remote_failure_mapping() {
        let remote = PublishError::Status {
            method: "GET".to_string(),
            url: "http://registry/api/v1/tools".to_string(),
            status: 401,
            body: "Unauthorized".to_string(),
        };
        assert_eq!(remote_failure(remote).unwrap(), ExitCode::REMOTE_ERROR);

        let local = PublishError::InvalidState {
            path: "publish-state.json".into(),
            message: "bad".to_string(),
        };
        assert!(remote_failure(local).is_err());
    }

    #[test]
    fn test_publish_result_is_flat() {
        let value = serde_json::to_value(PublishResult {
            registry: "http://registry".to_string(),
            report: PublishReport::default(),
        })
        .unwrap();
        assert_eq!(value["registry"], "http://registry");
        assert_eq!(value["created"], 0);
        assert_eq!(value["deleteFailures"], serde_json::json!([]));
    }
}
