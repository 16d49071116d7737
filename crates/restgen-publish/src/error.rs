//! Error types for publish operations.

use std::path::PathBuf;

/// Result type for publish operations.
pub type Result<T> = std::result::Result<T, PublishError>;

/// Errors that can occur while synchronizing tools with a registry.
#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    /// The registry could not be reached or the connection broke.
    #[error("Registry request {method} {url} failed: {source}")]
    Request {
        /// HTTP method
        method: String,
        /// Target URL
        url: String,
        /// Underlying client error
        #[source]
        source: reqwest::Error,
    },

    /// The registry answered with an unexpected status.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_publish::PublishError;
    ///
    /// let err = PublishError::Status {
    ///     method: "GET".to_string(),
    ///     url: "http://localhost:3000/api/v1/tools".to_string(),
    ///     status: 401,
    ///     body: "Unauthorized".to_string(),
    /// };
    /// assert!(err.is_remote());
    /// assert_eq!(err.status(), Some(401));
    /// ```
    #[error("Registry returned HTTP {status} for {method} {url}: {body}")]
    Status {
        /// HTTP method
        method: String,
        /// Target URL
        url: String,
        /// Response status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The registry answered with a body that could not be understood.
    #[error("Unexpected registry response from {url}: {message}")]
    InvalidResponse {
        /// Target URL
        url: String,
        /// What was wrong with the response
        message: String,
    },

    /// The publish checkpoint file exists but cannot be used.
    #[error("Invalid publish state {}: {message}", path.display())]
    InvalidState {
        /// State file path
        path: PathBuf,
        /// What was wrong with it
        message: String,
    },

    /// Failure in a shared pipeline component (I/O, manifests).
    #[error(transparent)]
    Core(#[from] restgen_core::Error),
}

impl PublishError {
    /// Returns true if the error came from the registry side.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::Request { .. } | Self::Status { .. } | Self::InvalidResponse { .. }
        )
    }

    /// Returns the HTTP status of a [`PublishError::Status`] error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_error_display() {
        let err = PublishError::InvalidState {
            path: PathBuf::from("publish-state.json"),
            message: "expected value at line 1 column 1".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("publish-state.json"));
        assert!(display.contains("line 1"));
        assert!(!err.is_remote());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: PublishError = restgen_core::Error::ResourceNotFound {
            resource: "tools directory".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Resource not found: tools directory");
    }
}
