//! Reconciliation between local tools and the registry.
//!
//! A plan is computed from the local catalog, the remote listing, the
//! checkpoint and a keep-list:
//! - remote tools with a generated-looking name that no local tool produces
//!   (and that are not kept) are deleted
//! - local tools without a remote counterpart are created
//! - local tools with a remote counterpart are updated, unless the
//!   checkpoint shows the remote copy already holds the same content

use crate::local::LocalTool;
use crate::registry::RemoteTool;
use crate::state::PublishState;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Minimum number of `-`-separated segments of a generated tool name.
pub const GENERATED_NAME_SEGMENTS: usize = 4;

/// Checks whether a remote tool name follows the generated
/// `{Area}-{Resource}-{METHOD}-{OpName}` pattern.
///
/// # Examples
///
/// ```
/// use restgen_publish::plan::is_generated_name;
///
/// assert!(is_generated_name("Procurement-Requisitions-GET-getRequisitions"));
/// assert!(!is_generated_name("get_workers"));
/// assert!(!is_generated_name("my-custom-tool"));
/// ```
#[must_use]
pub fn is_generated_name(name: &str) -> bool {
    name.split('-').count() >= GENERATED_NAME_SEGMENTS
}

/// What to do with one local tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ToolAction {
    /// No remote tool has this name
    Create,
    /// Overwrite remote tool `id`
    Update {
        /// Registry id
        id: String,
    },
    /// Remote tool `id` already holds this content
    Unchanged {
        /// Registry id
        id: String,
    },
}

/// Decides the action for a local tool given the remote name-to-id map.
#[must_use]
pub fn action_for(
    tool: &LocalTool,
    remote_ids: &HashMap<String, String>,
    state: &PublishState,
) -> ToolAction {
    match remote_ids.get(&tool.name) {
        None => ToolAction::Create,
        Some(id) if state.is_current(&tool.name, id, &tool.checksum) => {
            ToolAction::Unchanged { id: id.clone() }
        }
        Some(id) => ToolAction::Update { id: id.clone() },
    }
}

/// The full set of registry changes for a run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PublishPlan {
    /// Remote tools to delete
    pub deletions: Vec<RemoteTool>,
    /// `(tool name, action)` in local catalog order
    pub actions: Vec<(String, ToolAction)>,
}

impl PublishPlan {
    /// Builds a plan.
    ///
    /// When the registry lists several tools with the same name, the last
    /// one is the one updated. Deletions never touch a local tool's name, so
    /// actions are decided against the listing taken before deleting.
    #[must_use]
    pub fn build(
        local: &[LocalTool],
        remote: &[RemoteTool],
        state: &PublishState,
        keep: &HashSet<String>,
    ) -> Self {
        let local_names: HashSet<&str> = local.iter().map(|t| t.name.as_str()).collect();

        let deletions = remote
            .iter()
            .filter(|t| {
                is_generated_name(&t.name)
                    && !local_names.contains(t.name.as_str())
                    && !keep.contains(&t.name)
            })
            .cloned()
            .collect();

        let remote_ids = remote_id_map(remote);
        let actions = local
            .iter()
            .map(|tool| (tool.name.clone(), action_for(tool, &remote_ids, state)))
            .collect();

        Self { deletions, actions }
    }

    /// Counts actions of each kind as `(create, update, unchanged)`.
    #[must_use]
    pub fn counts(&self) -> (usize, usize, usize) {
        self.actions
            .iter()
            .fold((0, 0, 0), |(c, u, n), (_, action)| match action {
                ToolAction::Create => (c + 1, u, n),
                ToolAction::Update { .. } => (c, u + 1, n),
                ToolAction::Unchanged { .. } => (c, u, n + 1),
            })
    }
}

/// Maps tool names to registry ids; later duplicates win.
#[must_use]
pub fn remote_id_map(remote: &[RemoteTool]) -> HashMap<String, String> {
    remote
        .iter()
        .map(|t| (t.name.clone(), t.id.clone()))
        .collect()
}
