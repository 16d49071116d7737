//! Writing generated code to disk.
//!
//! All directories are created up front, then every file is written to a
//! temporary sibling and renamed into place. Inside each regenerated service
//! directory, `.js` files that the current run did not produce are removed,
//! so that renamed or deleted operations do not leave stale tools behind.
//!
//! # Examples
//!
//! ```
//! use restgen_codegen::output::export_generated;
//! use restgen_codegen::{GeneratedCode, GeneratedFile};
//! # use tempfile::TempDir;
//!
//! # let temp = TempDir::new().unwrap();
//! let mut code = GeneratedCode::new();
//! code.add_file(GeneratedFile {
//!     path: "widgets/manifest.json".to_string(),
//!     content: "[]".to_string(),
//! });
//!
//! let stats = export_generated(&code, temp.path()).unwrap();
//! assert_eq!(stats.written, 1);
//! assert!(temp.path().join("widgets/manifest.json").exists());
//! ```

use crate::types::GeneratedCode;
use restgen_core::{Error, Result};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// What an export did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    /// Files written
    pub written: usize,
    /// Stale `.js` files removed
    pub removed: usize,
}

/// Writes generated files below `base`.
///
/// # Errors
///
/// Returns an error if a path escapes `base`, or a directory or file cannot
/// be created, written or removed.
pub fn export_generated(code: &GeneratedCode, base: impl AsRef<Path>) -> Result<ExportStats> {
    let base = base.as_ref();
    let mut targets = Vec::with_capacity(code.file_count());
    let mut directories = BTreeSet::new();

    for file in code.files() {
        let relative = relative_path(&file.path)?;
        let target = base.join(&relative);
        if let Some(parent) = target.parent() {
            directories.insert(parent.to_path_buf());
        }
        targets.push((target, file.content.as_str()));
    }

    for dir in &directories {
        fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
    }

    let keep: HashSet<&Path> = targets.iter().map(|(path, _)| path.as_path()).collect();
    let mut removed = 0;
    for dir in directories.iter().filter(|d| d.as_path() != base) {
        removed += remove_stale_tools(dir, &keep)?;
    }

    for (target, content) in &targets {
        write_file_atomic(target, content)?;
    }

    tracing::info!(
        "Exported {} files to {} ({removed} stale removed)",
        targets.len(),
        base.display()
    );

    Ok(ExportStats {
        written: targets.len(),
        removed,
    })
}

/// Validates a generated relative path and converts it to a `PathBuf`.
fn relative_path(path: &str) -> Result<PathBuf> {
    let relative = PathBuf::from(path.trim_start_matches('/'));
    let escapes = relative.components().any(|c| {
        !matches!(c, std::path::Component::Normal(_))
    });
    if escapes || relative.as_os_str().is_empty() {
        return Err(Error::ValidationError {
            field: "path".to_string(),
            reason: format!("generated path '{path}' is not a plain relative path"),
        });
    }
    Ok(relative)
}

fn remove_stale_tools(dir: &Path, keep: &HashSet<&Path>) -> Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let path = entry.map_err(|e| Error::io(dir, e))?.path();
        let is_tool = path.extension().is_some_and(|ext| ext == "js");
        if is_tool && path.is_file() && !keep.contains(path.as_path()) {
            fs::remove_file(&path).map_err(|e| Error::io(&path, e))?;
            tracing::debug!("Removed stale tool {}", path.display());
            removed += 1;
        }
    }
    Ok(removed)
}

/// Writes to a temporary sibling, syncs and renames into place.
fn write_file_atomic(path: &Path, content: &str) -> Result<()> {
    let mut temp_name = path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    let mut file = fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::io(&temp_path, e))?;
    file.sync_all().map_err(|e| Error::io(&temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| Error::io(path, e))?;
    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
