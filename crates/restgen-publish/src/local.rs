//! Locally generated tools, read back from the tools directory.
//!
//! Every service directory holding a `manifest.json` contributes its entries
//! in manifest order. Service directories are visited by name.

use crate::checksum::tool_checksum;
use crate::error::Result;
use restgen_codegen::ManifestEntry;
use restgen_codegen::driver::MANIFEST_FILE;
use restgen_core::Error;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// A generated tool ready to publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalTool {
    /// Service directory the tool came from
    pub service: String,
    /// Tool name
    pub name: String,
    /// One-line description
    pub description: String,
    /// Parameter schema as a JSON string
    pub schema: String,
    /// Function body
    #[serde(skip)]
    pub func: String,
    /// Checksum of description, schema and body
    pub checksum: String,
}

/// Everything found in the tools directory.
#[derive(Debug, Clone, Default)]
pub struct LocalCatalog {
    /// Publishable tools in directory then manifest order
    pub tools: Vec<LocalTool>,
    /// Manifest entries whose function file is missing
    pub missing: Vec<String>,
}

impl LocalCatalog {
    /// Scans a tools directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResourceNotFound`] if the directory does not exist,
    /// and an error if a manifest cannot be read or parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_publish::LocalCatalog;
    ///
    /// # let temp = tempfile::tempdir().unwrap();
    /// # let dir = temp.path().join("wql");
    /// # std::fs::create_dir_all(&dir).unwrap();
    /// # std::fs::write(dir.join("manifest.json"), r#"[{"name": "WQL-Data-GET-getData",
    /// #   "description": "[WQL] GET /data", "schema": [], "method": "GET", "path": "/data",
    /// #   "operationId": null, "file": "WQL-Data-GET-getData.js"}]"#).unwrap();
    /// # std::fs::write(dir.join("WQL-Data-GET-getData.js"), "return 1;").unwrap();
    /// let catalog = LocalCatalog::scan(temp.path()).unwrap();
    /// assert_eq!(catalog.tools[0].name, "WQL-Data-GET-getData");
    /// assert_eq!(catalog.tools[0].schema, "[]");
    /// ```
    pub fn scan(tools_dir: impl AsRef<Path>) -> Result<Self> {
        let tools_dir = tools_dir.as_ref();
        if !tools_dir.is_dir() {
            return Err(Error::ResourceNotFound {
                resource: format!(
                    "tools directory {} (run `restgen generate` first)",
                    tools_dir.display()
                ),
            }
            .into());
        }

        let mut catalog = Self::default();
        let manifests = WalkDir::new(tools_dir)
            .min_depth(2)
            .max_depth(2)
            .sort_by_file_name()
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file() && entry.file_name() == MANIFEST_FILE);

        for manifest in manifests {
            let path = manifest.path();
            let Some(service_dir) = path.parent() else {
                continue;
            };
            let service = service_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
            let entries: Vec<ManifestEntry> =
                serde_json::from_str(&content).map_err(|e| Error::SerializationError {
                    message: format!("invalid manifest {}", path.display()),
                    source: Some(e),
                })?;

            tracing::debug!("{service}: {} manifest entries", entries.len());
            for entry in entries {
                let file = service_dir.join(&entry.file);
                let Ok(func) = fs::read_to_string(&file) else {
                    tracing::warn!("Skipping {}: {} not found", entry.name, file.display());
                    catalog.missing.push(entry.name.into_inner());
                    continue;
                };

                let schema = serde_json::to_string(&entry.schema).map_err(Error::from)?;
                catalog.tools.push(LocalTool {
                    service: service.clone(),
                    checksum: tool_checksum(&entry.description, &schema, &func),
                    name: entry.name.into_inner(),
                    description: entry.description,
                    schema,
                    func,
                });
            }
        }

        tracing::info!(
            "Found {} local tools ({} missing files)",
            catalog.tools.len(),
            catalog.missing.len()
        );
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PublishError;
    use tempfile::TempDir;

    fn write_service(root: &Path, service: &str, tools: &[(&str, bool)]) {
        let dir = root.join(service);
        fs::create_dir_all(&dir).unwrap();
        let entries: Vec<_> = tools
            .iter()
            .map(|(name, _)| {
                serde_json::json!({
                    "name": name,
                    "description": format!("[X] GET /{name}"),
                    "schema": [{"name": "id", "type": "string", "description": "id", "required": true}],
                    "method": "GET",
                    "path": format!("/{name}"),
                    "operationId": null,
                    "file": format!("{name}.js"),
                })
            })
            .collect();
        fs::write(dir.join(MANIFEST_FILE), serde_json::to_string(&entries).unwrap()).unwrap();
        for (name, exists) in tools {
            if *exists {
                fs::write(dir.join(format!("{name}.js")), format!("// {name}")).unwrap();
            }
        }
    }

    #[test]
    fn test_scan_orders_services_by_name() {
        let temp = TempDir::new().unwrap();
        write_service(temp.path(), "zeta", &[("Z-A-GET-a", true)]);
        write_service(temp.path(), "alpha", &[("A-B-GET-b", true), ("A-B-GET-c", true)]);
        fs::write(temp.path().join("generation-summary.json"), "{}").unwrap();

        let catalog = LocalCatalog::scan(temp.path()).unwrap();
        let names: Vec<_> = catalog.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["A-B-GET-b", "A-B-GET-c", "Z-A-GET-a"]);
        assert_eq!(catalog.tools[0].service, "alpha");
        assert!(catalog.tools[0].schema.starts_with("[{\"name\":\"id\""));
        assert_eq!(catalog.tools[0].func, "// A-B-GET-b");
    }

    #[test]
    fn test_missing_function_files_are_reported() {
        let temp = TempDir::new().unwrap();
        write_service(temp.path(), "svc", &[("S-A-GET-a", false), ("S-A-GET-b", true)]);

        let catalog = LocalCatalog::scan(temp.path()).unwrap();
        assert_eq!(catalog.missing, ["S-A-GET-a"]);
        assert_eq!(catalog.tools.len(), 1);
    }

    #[test]
    fn test_missing_tools_dir() {
        let temp = TempDir::new().unwrap();
        let err = LocalCatalog::scan(temp.path().join("tools")).unwrap_err();
        assert!(matches!(err, PublishError::Core(ref e) if e.is_not_found()));
    }

    #[test]
    fn test_checksum_tracks_function_body() {
        let temp = TempDir::new().unwrap();
        write_service(temp.path(), "svc", &[("S-A-GET-a", true)]);
        let before = LocalCatalog::scan(temp.path()).unwrap().tools[0].checksum.clone();

        fs::write(temp.path().join("svc/S-A-GET-a.js"), "// changed").unwrap();
        let after = LocalCatalog::scan(temp.path()).unwrap().tools[0].checksum.clone();
        assert_ne!(before, after);
    }
}
