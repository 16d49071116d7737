//! Configuration types for the restgen pipeline.
//!
//! [`PipelineConfig`] gathers every path and setting the pipeline stages
//! need. It can be built in code, loaded from a `restgen.toml` file, and is
//! then usually adjusted by CLI flags.
//!
//! # Examples
//!
//! ```
//! use restgen_core::PipelineConfig;
//! use std::time::Duration;
//!
//! let config = PipelineConfig::builder()
//!     .root("/srv/workday-tools")
//!     .download_delay(Duration::from_millis(500))
//!     .build();
//!
//! assert_eq!(config.tools_path().to_str(), Some("/srv/workday-tools/tools"));
//! assert!(config.validate().is_ok());
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default base URL of the public REST directory hosting schema documents.
pub const DEFAULT_DIRECTORY_URL: &str =
    "https://community.workday.com/sites/default/files/file-hosting/restapi";

/// Names the rendered functions use to reach their runtime context.
///
/// Every generated function reads the target host and a bearer credential
/// from the hosting runtime's `$vars` object at call time. Which variable
/// names to read, and how the remote API is called in messages, is part of
/// the generator's input: the renderer requires a `RuntimeBindings` value
/// and embeds these names literally.
///
/// # Examples
///
/// ```
/// use restgen_core::RuntimeBindings;
///
/// let bindings = RuntimeBindings::default();
/// assert_eq!(bindings.host_var, "suv_name");
/// assert_eq!(bindings.token_var, "beartoken");
/// assert!(bindings.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeBindings {
    /// Runtime variable holding the target hostname
    pub host_var: String,
    /// Runtime variable holding the bearer token
    pub token_var: String,
    /// Product name used in error messages, e.g. `Workday`
    pub api_label: String,
}

impl Default for RuntimeBindings {
    fn default() -> Self {
        Self {
            host_var: "suv_name".to_string(),
            token_var: "beartoken".to_string(),
            api_label: "Workday".to_string(),
        }
    }
}

impl RuntimeBindings {
    /// Validates the bindings.
    ///
    /// Variable names are emitted as JavaScript property accesses
    /// (`$vars?.name`), so they must be plain identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if a variable name is not an identifier
    /// or the API label is empty.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [("host_var", &self.host_var), ("token_var", &self.token_var)] {
            if !is_plain_identifier(value) {
                return Err(Error::ConfigError {
                    message: format!("{field} '{value}' is not a valid variable name"),
                });
            }
        }
        if self.api_label.trim().is_empty() {
            return Err(Error::ConfigError {
                message: "api_label cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn is_plain_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Pipeline configuration.
///
/// Relative paths are resolved against [`root`](Self::root).
///
/// # Examples
///
/// ```
/// use restgen_core::PipelineConfig;
///
/// let config = PipelineConfig::default();
/// assert_eq!(config.download_delay_ms, 1500);
/// assert_eq!(config.catalog_path().to_str(), Some("./service-index.json"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Project root all relative paths are resolved against.
    ///
    /// Default: `.`
    pub root: PathBuf,

    /// Service index file.
    ///
    /// Default: `service-index.json`
    pub catalog_file: PathBuf,

    /// Directory holding downloaded schema documents.
    ///
    /// Default: `schemas`
    pub schemas_dir: PathBuf,

    /// Directory receiving generated tools and manifests.
    ///
    /// Default: `tools`
    pub tools_dir: PathBuf,

    /// Publish checkpoint file.
    ///
    /// Default: `publish-state.json`
    pub state_file: PathBuf,

    /// Pause between two schema downloads in milliseconds.
    ///
    /// Default: 1500
    pub download_delay_ms: u64,

    /// Base URL of the REST directory schemas are downloaded from.
    pub directory_url: String,

    /// Base URL of the tool registry API.
    ///
    /// Default: `http://localhost:3000`
    pub registry_url: String,

    /// Remote tools the publisher must never delete.
    pub keep_tools: Vec<String>,

    /// Runtime variable names embedded in rendered functions.
    pub bindings: RuntimeBindings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            catalog_file: PathBuf::from("service-index.json"),
            schemas_dir: PathBuf::from("schemas"),
            tools_dir: PathBuf::from("tools"),
            state_file: PathBuf::from("publish-state.json"),
            download_delay_ms: 1500,
            directory_url: DEFAULT_DIRECTORY_URL.to_string(),
            registry_url: "http://localhost:3000".to_string(),
            keep_tools: vec!["get_workers".to_string(), "Retrieve_Requisitions".to_string()],
            bindings: RuntimeBindings::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }

    /// Loads configuration from a TOML file.
    ///
    /// Missing keys take their default values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this structure.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_core::PipelineConfig;
    /// # use std::io::Write;
    ///
    /// # let dir = tempfile::tempdir().unwrap();
    /// # let path = dir.path().join("restgen.toml");
    /// # std::fs::write(&path, "tools_dir = \"out\"\n[bindings]\napi_label = \"Acme\"\n").unwrap();
    /// let config = PipelineConfig::load(&path).unwrap();
    /// assert_eq!(config.tools_dir.to_str(), Some("out"));
    /// assert_eq!(config.bindings.api_label, "Acme");
    /// assert_eq!(config.bindings.host_var, "suv_name");
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = toml::from_str(&content).map_err(|e| Error::ConfigError {
            message: format!("invalid configuration file {}: {e}", path.display()),
        })?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A directory or file setting is empty
    /// - A URL does not use `http` or `https`
    /// - The runtime bindings are invalid
    pub fn validate(&self) -> Result<()> {
        for (field, path) in [
            ("catalog_file", &self.catalog_file),
            ("schemas_dir", &self.schemas_dir),
            ("tools_dir", &self.tools_dir),
            ("state_file", &self.state_file),
        ] {
            if path.as_os_str().is_empty() {
                return Err(Error::ConfigError {
                    message: format!("{field} cannot be empty"),
                });
            }
        }

        for (field, url) in [
            ("directory_url", &self.directory_url),
            ("registry_url", &self.registry_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(Error::ConfigError {
                    message: format!("{field} must be an http(s) URL, got '{url}'"),
                });
            }
        }

        self.bindings.validate()
    }

    /// Resolves a configured path against the root directory.
    #[must_use]
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Returns the resolved service index path.
    #[must_use]
    pub fn catalog_path(&self) -> PathBuf {
        self.resolve(&self.catalog_file)
    }

    /// Returns the resolved schema directory.
    #[must_use]
    pub fn schemas_path(&self) -> PathBuf {
        self.resolve(&self.schemas_dir)
    }

    /// Returns the resolved tools directory.
    #[must_use]
    pub fn tools_path(&self) -> PathBuf {
        self.resolve(&self.tools_dir)
    }

    /// Returns the resolved publish checkpoint path.
    #[must_use]
    pub fn state_path(&self) -> PathBuf {
        self.resolve(&self.state_file)
    }

    /// Returns the delay between schema downloads.
    #[must_use]
    pub const fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }
}

/// Builder for [`PipelineConfig`].
#[derive(Debug)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Starts from an existing configuration.
    #[must_use]
    pub const fn from_config(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Sets the root directory.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.root = root.into();
        self
    }

    /// Sets the service index file.
    #[must_use]
    pub fn catalog_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.catalog_file = path.into();
        self
    }

    /// Sets the schema directory.
    #[must_use]
    pub fn schemas_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.schemas_dir = path.into();
        self
    }

    /// Sets the tools directory.
    #[must_use]
    pub fn tools_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.tools_dir = path.into();
        self
    }

    /// Sets the publish checkpoint file.
    #[must_use]
    pub fn state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.state_file = path.into();
        self
    }

    /// Sets the delay between schema downloads.
    #[must_use]
    pub fn download_delay(mut self, delay: Duration) -> Self {
        self.config.download_delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the REST directory base URL.
    #[must_use]
    pub fn directory_url(mut self, url: impl Into<String>) -> Self {
        self.config.directory_url = url.into();
        self
    }

    /// Sets the tool registry base URL.
    #[must_use]
    pub fn registry_url(mut self, url: impl Into<String>) -> Self {
        self.config.registry_url = url.into();
        self
    }

    /// Sets the runtime bindings.
    #[must_use]
    pub fn bindings(mut self, bindings: RuntimeBindings) -> Self {
        self.config.bindings = bindings;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl Default for PipelineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
