//! Types flowing through the code generator.
//!
//! A schema document is normalized into [`Operation`]s, each operation is
//! rendered into a [`RenderedTool`], and the driver collects everything into
//! [`GeneratedCode`] plus a [`GenerationSummary`].
//!
//! # Examples
//!
//! ```
//! use restgen_codegen::{GeneratedCode, GeneratedFile};
//!
//! let mut code = GeneratedCode::new();
//! code.add_file(GeneratedFile {
//!     path: "widgets/manifest.json".to_string(),
//!     content: "[]".to_string(),
//! });
//!
//! assert_eq!(code.file_count(), 1);
//! ```

use chrono::{DateTime, Utc};
use restgen_core::{HttpMethod, ParamType, ServiceName, ToolName};
use serde::{Deserialize, Serialize};

/// One input parameter of an operation.
///
/// Serialized exactly as it appears in a manifest's `schema` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Coarse type
    #[serde(rename = "type")]
    pub param_type: ParamType,
    /// Human-readable description
    pub description: String,
    /// Whether the caller must supply it
    pub required: bool,
}

impl Parameter {
    /// Creates the parameter used for a path placeholder nobody declared.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_codegen::Parameter;
    ///
    /// let param = Parameter::synthesized_path("ID");
    /// assert!(param.required);
    /// assert_eq!(param.description, "path parameter: ID");
    /// ```
    #[must_use]
    pub fn synthesized_path(name: &str) -> Self {
        Self {
            name: name.to_string(),
            param_type: ParamType::String,
            description: format!("path parameter: {name}"),
            required: true,
        }
    }
}

/// A single HTTP operation, normalized across schema dialects.
///
/// `path_params` always matches the `{...}` placeholders of `path` one to
/// one, in placeholder order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Derived, sanitized tool name (unique per service once deduplicated)
    pub tool_name: ToolName,
    /// Owning service
    pub service_name: ServiceName,
    /// Display name of the owning service
    pub display_name: Option<String>,
    /// HTTP method
    pub method: HttpMethod,
    /// Path template relative to the base path, e.g. `/widgets/{id}`
    pub path: String,
    /// Declared operation id
    pub operation_id: Option<String>,
    /// Short summary, possibly empty
    pub summary: String,
    /// Long description, falls back to the summary
    pub description: String,
    /// Path parameters in placeholder order
    pub path_params: Vec<Parameter>,
    /// Query parameters in declaration order
    pub query_params: Vec<Parameter>,
    /// Whether the operation declares a request body
    pub has_request_body: bool,
    /// Description of the request body, empty when there is none
    pub request_body_description: String,
    /// Version-independent base path, e.g. `/ccx/api/procurement/v5/super`
    pub api_base_path: String,
}

impl Operation {
    /// Returns the label used in manifest descriptions.
    #[must_use]
    pub fn area_label(&self) -> String {
        self.display_name
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .map_or_else(|| self.service_name.functional_area(), ToString::to_string)
    }

    /// Builds the one-line description stored in the manifest.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_codegen::normalize;
    /// use restgen_core::ServiceName;
    /// use serde_json::json;
    ///
    /// let doc = json!({
    ///     "openapi": "3.0.0",
    ///     "paths": {"/widgets": {"get": {"summary": "List widgets"}}}
    /// });
    /// let ops = normalize(&doc, &ServiceName::new("widgets"), None);
    /// assert_eq!(ops[0].manifest_description(), "[Widgets] GET /widgets - List widgets");
    /// ```
    #[must_use]
    pub fn manifest_description(&self) -> String {
        let mut text = format!("[{}] {} {}", self.area_label(), self.method, self.path);
        if !self.summary.is_empty() {
            text.push_str(" - ");
            text.push_str(&self.summary);
        } else if !self.description.is_empty() {
            text.push_str(" - ");
            text.extend(self.description.chars().take(200));
        }
        text
    }
}

/// The output of rendering one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTool {
    /// JavaScript function body
    pub source: String,
    /// Parameter schema, one entry per input binding
    pub schema: Vec<Parameter>,
}

/// One entry of a service's `manifest.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Tool name
    pub name: ToolName,
    /// One-line description
    pub description: String,
    /// Parameter schema
    pub schema: Vec<Parameter>,
    /// HTTP method
    pub method: HttpMethod,
    /// Path template
    pub path: String,
    /// Declared operation id
    pub operation_id: Option<String>,
    /// File name of the rendered function, relative to the manifest
    pub file: String,
}

/// Per-service line of the generation summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceSummary {
    /// Service name
    pub name: ServiceName,
    /// Service version
    pub version: String,
    /// Number of tools generated
    pub tools: usize,
}

/// Content of `generation-summary.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    /// When the run happened
    pub generated_at: DateTime<Utc>,
    /// Services with at least one generated tool
    pub total_services: usize,
    /// Tools generated across all services
    pub total_tools: usize,
    /// Per-service counts in catalog order
    pub services: Vec<ServiceSummary>,
}

/// Result of code generation containing all generated files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneratedCode {
    /// Generated files with paths relative to the tools directory
    pub files: Vec<GeneratedFile>,
}

impl GeneratedCode {
    /// Creates a new empty container.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Adds a generated file.
    pub fn add_file(&mut self, file: GeneratedFile) {
        self.files.push(file);
    }

    /// Returns the number of generated files.
    #[inline]
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Returns an iterator over the generated files.
    #[inline]
    pub fn files(&self) -> impl Iterator<Item = &GeneratedFile> {
        self.files.iter()
    }

    /// Looks up a file by its relative path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }
}

/// A single generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    /// Relative path, `/`-separated
    pub path: String,
    /// File content
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn operation(summary: &str, description: &str) -> Operation {
        Operation {
            tool_name: ToolName::new("Widgets-Widgets-GET-listWidgets"),
            service_name: ServiceName::new("widgets"),
            display_name: None,
            method: HttpMethod::Get,
            path: "/widgets".to_string(),
            operation_id: Some("listWidgets".to_string()),
            summary: summary.to_string(),
            description: description.to_string(),
            path_params: vec![],
            query_params: vec![],
            has_request_body: false,
            request_body_description: String::new(),
            api_base_path: "/ccx/api/widgets/v1/super".to_string(),
        }
    }

    #[test]
    fn test_manifest_description_prefers_summary() {
        let op = operation("List widgets", "Long text");
        assert_eq!(op.manifest_description(), "[Widgets] GET /widgets - List widgets");
    }

    #[test]
    fn test_manifest_description_truncates_description() {
        let long = "x".repeat(500);
        let op = operation("", &long);
        let text = op.manifest_description();
        assert_eq!(text, format!("[Widgets] GET /widgets - {}", "x".repeat(200)));
    }

    #[test]
    fn test_manifest_description_without_text() {
        let op = operation("", "");
        assert_eq!(op.manifest_description(), "[Widgets] GET /widgets");
    }

    #[test]
    fn test_manifest_description_uses_display_name() {
        let mut op = operation("List", "");
        op.display_name = Some("Widget Catalog".to_string());
        assert_eq!(op.manifest_description(), "[Widget Catalog] GET /widgets - List");
    }

    #[test]
    fn test_blank_display_name_falls_back_to_service_name() {
        let mut op = operation("List", "");
        op.display_name = Some("   ".to_string());
        assert_eq!(op.area_label(), "Widgets");
    }

    #[test]
    fn test_parameter_serializes_type_key() {
        let param = Parameter::synthesized_path("id");
        let value = serde_json::to_value(&param).unwrap();
        assert_eq!(value["type"], "string");
        assert_eq!(value["required"], true);
    }

    #[test]
    fn test_manifest_entry_keeps_null_operation_id() {
        let entry = ManifestEntry {
            name: ToolName::new("A-B-GET-getB"),
            description: "[A] GET /b".to_string(),
            schema: vec![],
            method: HttpMethod::Get,
            path: "/b".to_string(),
            operation_id: None,
            file: "A-B-GET-getB.js".to_string(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"operationId\":null"));
        assert!(json.contains("\"method\":\"GET\""));
    }

    #[test]
    fn test_generated_code_lookup() {
        let mut code = GeneratedCode::new();
        code.add_file(GeneratedFile {
            path: "a/b.js".to_string(),
            content: "x".to_string(),
        });
        assert!(code.get("a/b.js").is_some());
        assert!(code.get("a/c.js").is_none());
        assert_eq!(code.files().count(), 1);
    }
}
