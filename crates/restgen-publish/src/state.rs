//! The publish checkpoint.
//!
//! Records, per tool name, the registry id and checksum of the last
//! successful create or update. The publisher saves it after every registry
//! mutation so an interrupted run loses at most one record.
//!
//! ```json
//! {
//!   "published": {
//!     "Procurement-Requisitions-GET-getRequisitions": {
//!       "id": "7f1c...",
//!       "action": "updated",
//!       "timestamp": "2026-03-01T12:00:00Z",
//!       "checksum": "blake3:..."
//!     }
//!   },
//!   "lastRun": "2026-03-01T12:00:03Z"
//! }
//! ```

use crate::error::{PublishError, Result};
use chrono::{DateTime, Utc};
use restgen_core::Error;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Last registry mutation for a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishAction {
    /// The tool was created
    Created,
    /// An existing tool was overwritten
    Updated,
}

/// Checkpoint record of one tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedTool {
    /// Registry id
    pub id: String,
    /// Last mutation
    pub action: PublishAction,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Checksum of the published content, absent in older checkpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Content of `publish-state.json`.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use restgen_publish::state::{PublishAction, PublishState};
///
/// # let temp = tempfile::tempdir().unwrap();
/// # let path = temp.path().join("publish-state.json");
/// let mut state = PublishState::load(&path).unwrap();
/// assert!(state.published.is_empty());
///
/// state.record("A-B-GET-getB", "id-1", PublishAction::Created, "blake3:00", Utc::now());
/// state.save(&path, Utc::now()).unwrap();
///
/// let reloaded = PublishState::load(&path).unwrap();
/// assert_eq!(reloaded.published["A-B-GET-getB"].id, "id-1");
/// assert!(reloaded.last_run.is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishState {
    /// Records keyed by tool name
    #[serde(default)]
    pub published: BTreeMap<String, PublishedTool>,
    /// End of the last save
    #[serde(default)]
    pub last_run: Option<DateTime<Utc>>,
}

impl PublishState {
    /// Loads the checkpoint, or an empty one if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::InvalidState`] if the file exists but is not a
    /// valid checkpoint.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        serde_json::from_str(&content).map_err(|e| PublishError::InvalidState {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Stamps `last_run` and writes the checkpoint atomically.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&mut self, path: impl AsRef<Path>, now: DateTime<Utc>) -> Result<()> {
        let path = path.as_ref();
        self.last_run = Some(now);

        let content = serde_json::to_string_pretty(self).map_err(Error::from)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        let temp_path = path.with_extension("json.tmp");
        let mut file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| Error::io(&temp_path, e))?;
        file.sync_all().map_err(|e| Error::io(&temp_path, e))?;
        fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;

        tracing::debug!("Saved publish state ({} tools)", self.published.len());
        Ok(())
    }

    /// Records a successful create or update.
    pub fn record(
        &mut self,
        name: &str,
        id: &str,
        action: PublishAction,
        checksum: &str,
        timestamp: DateTime<Utc>,
    ) {
        self.published.insert(
            name.to_string(),
            PublishedTool {
                id: id.to_string(),
                action,
                timestamp,
                checksum: Some(checksum.to_string()),
            },
        );
    }

    /// Drops the record of a deleted tool.
    pub fn forget(&mut self, name: &str) -> Option<PublishedTool> {
        self.published.remove(name)
    }

    /// Checks whether the remote tool `id` still holds content with
    /// `checksum`, as far as the checkpoint knows.
    #[must_use]
    pub fn is_current(&self, name: &str, id: &str, checksum: &str) -> bool {
        self.published
            .get(name)
            .is_some_and(|t| t.id == id && t.checksum.as_deref() == Some(checksum))
    }
}
