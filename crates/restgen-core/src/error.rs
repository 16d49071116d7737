//! Error types for the restgen pipeline.
//!
//! Every library crate in the workspace reports failures through this
//! hierarchy. Input defects inside a schema document are not errors at all
//! (the normalizer skips them); the variants below cover the cases where a
//! stage genuinely cannot proceed.
//!
//! # Examples
//!
//! ```
//! use restgen_core::{Error, Result};
//!
//! fn check_root(path: &str) -> Result<()> {
//!     if path.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "root directory cannot be empty".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_root("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the restgen pipeline.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised when configuration is invalid, missing required fields,
    /// or contains contradictory settings.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Resource not found error.
    ///
    /// Occurs when a required input (service index, schema file, manifest)
    /// does not exist.
    #[error("Resource not found: {resource}")]
    ResourceNotFound {
        /// Identifier of the missing resource
        resource: String,
    },

    /// Serialization/deserialization error.
    ///
    /// Raised when JSON conversion or template rendering fails.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A schema document exists but cannot be read or parsed.
    ///
    /// The generation driver skips the affected service when it sees this.
    #[error("Schema document for '{service}' is unreadable: {reason}")]
    SchemaUnreadable {
        /// Service key (`{name}_{version}`)
        service: String,
        /// Why the document could not be used
        reason: String,
    },

    /// Validation error for domain types.
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },

    /// Rendering a tool function failed.
    #[error("Code generation failed for tool '{tool}': {message}")]
    GenerationError {
        /// The tool name that failed to render
        tool: String,
        /// Description of the generation failure
        message: String,
    },

    /// Remote endpoint failure (schema host or tool registry).
    #[error("Request to {url} failed: {message}")]
    HttpError {
        /// Target URL
        url: String,
        /// Description of the failure
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Filesystem error with the path that triggered it.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Wraps an I/O error together with the path it occurred on.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_core::Error;
    ///
    /// let err = Error::io("tools/manifest.json", std::io::Error::other("disk full"));
    /// assert!(err.to_string().contains("tools/manifest.json"));
    /// ```
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this is a configuration error.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a resource not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_core::Error;
    ///
    /// let err = Error::ResourceNotFound {
    ///     resource: "service-index.json".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    /// Returns `true` if a schema document could not be used.
    #[must_use]
    pub const fn is_schema_unreadable(&self) -> bool {
        matches!(self, Self::SchemaUnreadable { .. })
    }

    /// Returns `true` if this is a validation error.
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    /// Returns `true` if this error came from a remote endpoint.
    #[must_use]
    pub const fn is_http_error(&self) -> bool {
        matches!(self, Self::HttpError { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type alias for restgen operations.
pub type Result<T> = std::result::Result<T, Error>;
