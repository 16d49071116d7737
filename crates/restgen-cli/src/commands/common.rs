//! Configuration loading shared by all pipeline commands.

use crate::cli::GlobalArgs;
use anyhow::{Context, Result};
use restgen_core::PipelineConfig;
use std::path::{Path, PathBuf};

/// Configuration file looked up in the project root when `--config` is not
/// given.
pub const CONFIG_FILE: &str = "restgen.toml";

/// Builds the pipeline configuration from the global CLI options.
///
/// Precedence, lowest first: defaults, the configuration file, `--root`.
/// Command-specific flags are applied by each command afterwards, followed
/// by [`validate`].
///
/// A relative `root` inside a configuration file is resolved against the
/// file's directory.
///
/// # Errors
///
/// Returns an error if an explicitly given configuration file is missing,
/// or if a configuration file cannot be parsed.
///
/// # Examples
///
/// ```
/// use restgen_cli::GlobalArgs;
/// use restgen_cli::commands::common::load_config;
///
/// let temp = tempfile::tempdir()?;
/// let global = GlobalArgs {
///     config: None,
///     root: Some(temp.path().to_path_buf()),
/// };
///
/// let config = load_config(&global)?;
/// assert_eq!(config.tools_path(), temp.path().join("tools"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn load_config(global: &GlobalArgs) -> Result<PipelineConfig> {
    let mut config = match config_file(global) {
        Some(path) => {
            let mut config = PipelineConfig::load(&path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?;
            if config.root.is_relative() {
                let base = path.parent().unwrap_or_else(|| Path::new(""));
                config.root = base.join(&config.root);
            }
            config
        }
        None => PipelineConfig::default(),
    };

    if let Some(root) = &global.root {
        config.root.clone_from(root);
    }

    tracing::debug!("Project root: {}", config.root.display());
    Ok(config)
}

/// Validates the final configuration.
///
/// # Errors
///
/// Returns an error describing the first invalid setting.
pub fn validate(config: &PipelineConfig) -> Result<()> {
    config.validate().context("invalid configuration")
}

fn config_file(global: &GlobalArgs) -> Option<PathBuf> {
    if let Some(path) = &global.config {
        return Some(path.clone());
    }
    let root = global.root.as_deref().unwrap_or_else(|| Path::new("."));
    let candidate = root.join(CONFIG_FILE);
    candidate.is_file().then_some(candidate)
}
