//! Sequential registry synchronization.

use crate::error::Result;
use crate::local::{LocalCatalog, LocalTool};
use crate::plan::{PublishPlan, ToolAction, action_for, remote_id_map};
use crate::registry::{ToolPayload, ToolRegistry};
use crate::state::{PublishAction, PublishState};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;

/// Card colors, assigned to local tools in turn.
pub const COLORS: [&str; 8] = [
    "linear-gradient(rgb(66,165,245), rgb(38,166,154))",
    "linear-gradient(rgb(90,184,229), rgb(221,56,47))",
    "linear-gradient(rgb(156,39,176), rgb(233,30,99))",
    "linear-gradient(rgb(255,152,0), rgb(244,67,54))",
    "linear-gradient(rgb(76,175,80), rgb(139,195,74))",
    "linear-gradient(rgb(0,150,136), rgb(0,188,212))",
    "linear-gradient(rgb(63,81,181), rgb(100,181,246))",
    "linear-gradient(rgb(121,85,72), rgb(161,136,127))",
];

/// Id recorded when the registry does not report one on create.
pub const UNKNOWN_ID: &str = "unknown";

/// Returns the card color of the `index`-th local tool.
///
/// # Examples
///
/// ```
/// use restgen_publish::publisher::{COLORS, color_for};
///
/// assert_eq!(color_for(0), COLORS[0]);
/// assert_eq!(color_for(9), COLORS[1]);
/// ```
#[must_use]
pub const fn color_for(index: usize) -> &'static str {
    COLORS[index % COLORS.len()]
}

/// A registry operation that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Tool name
    pub name: String,
    /// Error message
    pub message: String,
}

/// Result of a publish run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishReport {
    /// Stale remote tools deleted
    pub deleted: usize,
    /// Tools created
    pub created: usize,
    /// Tools overwritten
    pub updated: usize,
    /// Tools left untouched because their content is current
    pub unchanged: usize,
    /// Manifest entries skipped because their file is missing
    pub skipped: usize,
    /// Failed deletions
    pub delete_failures: Vec<Failure>,
    /// Failed creates and updates
    pub failures: Vec<Failure>,
}

impl PublishReport {
    /// Returns true if every registry operation succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.delete_failures.is_empty() && self.failures.is_empty()
    }
}

/// Synchronizes local tools with a registry.
///
/// Operations run one at a time. The checkpoint is saved after every
/// successful mutation and once more at the end.
#[derive(Debug)]
pub struct Publisher<R> {
    registry: R,
    state_path: PathBuf,
    keep: HashSet<String>,
}

impl<R: ToolRegistry> Publisher<R> {
    /// Creates a publisher persisting its checkpoint at `state_path`.
    #[must_use]
    pub fn new(registry: R, state_path: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            state_path: state_path.into(),
            keep: HashSet::new(),
        }
    }

    /// Sets the remote tools that are never deleted.
    #[must_use]
    pub fn with_keep_list(mut self, keep: impl IntoIterator<Item = String>) -> Self {
        self.keep = keep.into_iter().collect();
        self
    }

    /// Returns the registry.
    pub const fn registry(&self) -> &R {
        &self.registry
    }

    /// Computes what a run would do without changing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be listed or the checkpoint
    /// is invalid.
    pub async fn plan(&self, catalog: &LocalCatalog) -> Result<PublishPlan> {
        let remote = self.registry.list_tools().await?;
        let state = PublishState::load(&self.state_path)?;
        Ok(PublishPlan::build(&catalog.tools, &remote, &state, &self.keep))
    }

    /// Runs the synchronization.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be listed, or the checkpoint
    /// cannot be read or written. Individual create, update and delete
    /// failures are collected in the report.
    pub async fn publish(&self, catalog: &LocalCatalog) -> Result<PublishReport> {
        let remote = self.registry.list_tools().await?;
        tracing::info!("Registry lists {} tools", remote.len());

        let mut state = PublishState::load(&self.state_path)?;
        let plan = PublishPlan::build(&catalog.tools, &remote, &state, &self.keep);
        let mut report = PublishReport {
            skipped: catalog.missing.len(),
            ..PublishReport::default()
        };

        if !plan.deletions.is_empty() {
            tracing::info!("Deleting {} stale tools", plan.deletions.len());
        }
        for tool in &plan.deletions {
            match self.registry.delete_tool(&tool.id).await {
                Ok(()) => {
                    tracing::debug!("Deleted {}", tool.name);
                    report.deleted += 1;
                    if state.forget(&tool.name).is_some() {
                        state.save(&self.state_path, Utc::now())?;
                    }
                }
                Err(e) => {
                    tracing::warn!("Failed to delete {}: {e}", tool.name);
                    report.delete_failures.push(Failure {
                        name: tool.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        let mut remote_ids = remote_id_map(&remote);
        for (index, tool) in catalog.tools.iter().enumerate() {
            let action = action_for(tool, &remote_ids, &state);
            let outcome = match action {
                ToolAction::Unchanged { .. } => {
                    tracing::debug!("Unchanged: {}", tool.name);
                    report.unchanged += 1;
                    continue;
                }
                ToolAction::Update { id } => {
                    let result = self.registry.update_tool(&id, &payload(tool, index)).await;
                    result.map(|()| (id, PublishAction::Updated))
                }
                ToolAction::Create => self
                    .registry
                    .create_tool(&payload(tool, index))
                    .await
                    .map(|id| {
                        (
                            id.unwrap_or_else(|| UNKNOWN_ID.to_string()),
                            PublishAction::Created,
                        )
                    }),
            };

            match outcome {
                Ok((id, action)) => {
                    match action {
                        PublishAction::Created => {
                            tracing::info!("Created {}", tool.name);
                            report.created += 1;
                            remote_ids.insert(tool.name.clone(), id.clone());
                        }
                        PublishAction::Updated => {
                            tracing::info!("Updated {}", tool.name);
                            report.updated += 1;
                        }
                    }
                    state.record(&tool.name, &id, action, &tool.checksum, Utc::now());
                    state.save(&self.state_path, Utc::now())?;
                }
                Err(e) => {
                    tracing::warn!("Failed to publish {}: {e}", tool.name);
                    report.failures.push(Failure {
                        name: tool.name.clone(),
                        message: e.to_string(),
                    });
                }
            }
        }

        state.save(&self.state_path, Utc::now())?;
        tracing::info!(
            "Publish complete: {} created, {} updated, {} unchanged, {} deleted, {} failed",
            report.created,
            report.updated,
            report.unchanged,
            report.deleted,
            report.failures.len() + report.delete_failures.len()
        );
        Ok(report)
    }
}

fn payload(tool: &LocalTool, index: usize) -> ToolPayload {
    ToolPayload {
        name: tool.name.clone(),
        description: tool.description.clone(),
        schema: tool.schema.clone(),
        func: tool.func.clone(),
        color: color_for(index).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_uses_palette_position() {
        let tool = LocalTool {
            service: "svc".to_string(),
            name: "A-B-GET-c".to_string(),
            description: "d".to_string(),
            schema: "[]".to_string(),
            func: "return 1;".to_string(),
            checksum: "blake3:00".to_string(),
        };
        assert_eq!(payload(&tool, 3).color, COLORS[3]);
        assert_eq!(payload(&tool, 8).color, COLORS[0]);
        assert_eq!(payload(&tool, 0).func, "return 1;");
    }

    #[test]
    fn test_report_is_clean() {
        let mut report = PublishReport::default();
        assert!(report.is_clean());
        report.failures.push(Failure {
            name: "x".to_string(),
            message: "HTTP 500".to_string(),
        });
        assert!(!report.is_clean());
    }
}
