//! The service record produced by the catalog step.

use crate::ServiceName;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One REST service/version pair.
///
/// `name` + `version` together form the service's unique key across the
/// whole pipeline. Serialized with camelCase keys to match the service index
/// file.
///
/// # Examples
///
/// ```
/// use restgen_core::Service;
///
/// let service = Service::new("absenceManagement", "v4")
///     .with_display_name("Absence Management");
///
/// assert_eq!(service.key(), "absenceManagement_v4");
/// assert_eq!(service.display_name(), Some("Absence Management"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service name, e.g. `procurement`
    pub name: ServiceName,
    /// Service version, e.g. `v5`
    pub version: String,
    /// Human-readable name, e.g. `Procurement`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Where the schema document was (or should be) downloaded from
    #[serde(default)]
    pub schema_url: Option<String>,
}

impl Service {
    /// Creates a service without display name or schema URL.
    #[must_use]
    pub fn new(name: impl Into<ServiceName>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            display_name: None,
            schema_url: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Sets the schema URL.
    #[must_use]
    pub fn with_schema_url(mut self, url: impl Into<String>) -> Self {
        self.schema_url = Some(url.into());
        self
    }

    /// Returns the `{name}_{version}` key schema documents are stored under.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}_{}", self.name, self.version)
    }

    /// Returns the display name when present and non-empty.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref().filter(|d| !d.trim().is_empty())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}
