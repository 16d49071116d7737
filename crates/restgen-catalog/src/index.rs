//! The service index file.
//!
//! A JSON array of [`Service`] records, written by `restgen index` and
//! updated by the downloader with the schema URLs it discovers.

use restgen_core::{Error, Result, Service};
use std::fs;
use std::path::Path;

/// Production services of the Workday REST directory, with their current
/// major versions.
const PRODUCTION_SERVICES: &[(&str, &str)] = &[
    ("absenceManagement", "v4"),
    ("accountsPayable", "v1"),
    ("asor", "v1"),
    ("attachments", "v1"),
    ("benefitEnrollmentEventOfferings", "v1"),
    ("benefitPartner", "v1"),
    ("budgets", "v1"),
    ("businessProcess", "v1"),
    ("common", "v1"),
    ("compensation", "v2"),
    ("connect", "v2"),
    ("contractCompliance", "v1"),
    ("coreAccounting", "v1"),
    ("customObjectData", "v2"),
    ("customObjectDefinition", "v1"),
    ("customerAccounts", "v1"),
    ("expense", "v1"),
    ("finTaxPublic", "v1"),
    ("globalPayroll", "v1"),
    ("graph", "v1"),
    ("helpArticle", "v1"),
    ("helpCase", "v4"),
    ("holiday", "v1"),
    ("journeys", "v1"),
    ("learning", "v1"),
    ("oauthClient", "v1"),
    ("payroll", "v2"),
    ("performanceEnablement", "v5"),
    ("person", "v4"),
    ("prismAnalytics", "v3"),
    ("privacy", "v1"),
    ("procurement", "v5"),
    ("projects", "v1"),
    ("recruiting", "v4"),
    ("request", "v2"),
    ("revenue", "v1"),
    ("staffing", "v7"),
    ("studentAcademicFoundation", "v1"),
    ("studentCore", "v1"),
    ("studentCurriculum", "v1"),
    ("studentEngagement", "v1"),
    ("studentFinance", "v1"),
    ("studentRecruiting", "v1"),
    ("systemMetrics", "v1"),
    ("talentManagement", "v2"),
    ("timeTracking", "v5"),
    ("worktag", "v1"),
    ("wql", "v1"),
];

/// Returns the curated list of production services.
///
/// Archived services are not included. None of the entries has a schema URL
/// yet; the downloader discovers them.
///
/// # Examples
///
/// ```
/// use restgen_catalog::curated_services;
///
/// let services = curated_services();
/// assert_eq!(services.len(), 48);
/// assert_eq!(services[0].key(), "absenceManagement_v4");
/// assert!(services.iter().all(|s| s.schema_url.is_none()));
/// ```
#[must_use]
pub fn curated_services() -> Vec<Service> {
    PRODUCTION_SERVICES
        .iter()
        .map(|(name, version)| Service::new(*name, *version))
        .collect()
}

/// Loads the service index.
///
/// # Errors
///
/// Returns [`Error::ResourceNotFound`] if the file does not exist, and a
/// serialization error if it is not a JSON array of services.
pub fn load_index(path: impl AsRef<Path>) -> Result<Vec<Service>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::ResourceNotFound {
            resource: format!(
                "service index {} (run `restgen index` first)",
                path.display()
            ),
        });
    }

    let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let services: Vec<Service> =
        serde_json::from_str(&content).map_err(|e| Error::SerializationError {
            message: format!("invalid service index {}", path.display()),
            source: Some(e),
        })?;

    tracing::debug!("Loaded {} services from {}", services.len(), path.display());
    Ok(services)
}

/// Writes the service index as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the parent directory cannot be created or the file
/// cannot be written.
pub fn save_index(path: impl AsRef<Path>, services: &[Service]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let content = serde_json::to_string_pretty(services)?;
    fs::write(path, content).map_err(|e| Error::io(path, e))?;

    tracing::info!("Wrote {} services to {}", services.len(), path.display());
    Ok(())
}
