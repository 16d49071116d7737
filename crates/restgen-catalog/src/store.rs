//! On-disk schema documents.
//!
//! One file per service, named `{name}_{version}.json`, inside a single
//! directory.
//!
//! # Directory Structure
//!
//! ```text
//! schemas/
//! ├── absenceManagement_v4.json
//! ├── procurement_v5.json
//! └── wql_v1.json
//! ```

use restgen_core::traits::SchemaSource;
use restgen_core::{Error, Result, Service};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Fields of which at least one must be set for a document to count as a
/// schema.
const SCHEMA_MARKERS: [&str; 4] = ["openapi", "swagger", "paths", "info"];

/// Checks whether a parsed document looks like an OpenAPI or Swagger schema.
///
/// The document must be an object with a non-empty `openapi`, `swagger`,
/// `paths` or `info` field.
///
/// # Examples
///
/// ```
/// use restgen_catalog::store::is_schema_document;
/// use serde_json::json;
///
/// assert!(is_schema_document(&json!({"openapi": "3.0.0"})));
/// assert!(is_schema_document(&json!({"paths": {}})));
/// assert!(!is_schema_document(&json!({"error": "not found"})));
/// assert!(!is_schema_document(&json!({"swagger": ""})));
/// assert!(!is_schema_document(&json!(["openapi"])));
/// ```
#[must_use]
pub fn is_schema_document(document: &Value) -> bool {
    SCHEMA_MARKERS
        .iter()
        .filter_map(|marker| document.get(marker))
        .any(is_set)
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        _ => true,
    }
}

/// Schema document directory.
///
/// # Examples
///
/// ```
/// use restgen_catalog::SchemaStore;
/// use restgen_core::Service;
/// use restgen_core::traits::SchemaSource;
/// use serde_json::json;
///
/// # let temp = tempfile::tempdir().unwrap();
/// let store = SchemaStore::new(temp.path());
/// let wql = Service::new("wql", "v1");
///
/// assert!(store.load(&wql).unwrap().is_none());
/// store.save(&wql, &json!({"openapi": "3.0.0", "paths": {}})).unwrap();
/// assert!(store.load(&wql).unwrap().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct SchemaStore {
    dir: PathBuf,
}

impl SchemaStore {
    /// Creates a store rooted at `dir`. The directory is created on first
    /// save.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the store directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file a service's document is stored in.
    #[must_use]
    pub fn path_for(&self, service: &Service) -> PathBuf {
        self.dir.join(format!("{}.json", service.key()))
    }

    /// Checks whether a usable document is already stored for a service.
    #[must_use]
    pub fn has_valid(&self, service: &Service) -> bool {
        matches!(self.load(service), Ok(Some(ref doc)) if is_schema_document(doc))
    }

    /// Stores a document as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the file
    /// cannot be written.
    pub fn save(&self, service: &Service, document: &Value) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|e| Error::io(&self.dir, e))?;

        let path = self.path_for(service);
        let content = serde_json::to_string_pretty(document)?;
        fs::write(&path, content).map_err(|e| Error::io(&path, e))?;

        tracing::debug!("Saved schema for {service} to {}", path.display());
        Ok(path)
    }
}

impl SchemaSource for SchemaStore {
    fn load(&self, service: &Service) -> Result<Option<Value>> {
        let path = self.path_for(service);
        if !path.is_file() {
            return Ok(None);
        }

        let unreadable = |reason: String| Error::SchemaUnreadable {
            service: service.key(),
            reason,
        };
        let content = fs::read_to_string(&path).map_err(|e| unreadable(e.to_string()))?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| unreadable(e.to_string()))
    }
}
