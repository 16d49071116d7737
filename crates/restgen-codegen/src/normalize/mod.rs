//! Schema normalization.
//!
//! Turns a raw OpenAPI 3.x or Swagger 2.0 document into a flat list of
//! [`Operation`]s with a version-independent base path and resolved
//! parameters. Malformed parts of the document are skipped, never fatal.
//!
//! # Examples
//!
//! ```
//! use restgen_codegen::normalize;
//! use restgen_core::ServiceName;
//! use serde_json::json;
//!
//! let doc = json!({
//!     "openapi": "3.0.0",
//!     "servers": [{"url": "https://{host}/ccx/api/widgets/v1/{tenant}"}],
//!     "paths": {
//!         "/widgets/{id}": {
//!             "get": {
//!                 "operationId": "getWidget",
//!                 "parameters": [{"name": "filter", "in": "query"}]
//!             }
//!         }
//!     }
//! });
//!
//! let ops = normalize(&doc, &ServiceName::new("widgets"), None);
//! assert_eq!(ops.len(), 1);
//! assert_eq!(ops[0].api_base_path, "/ccx/api/widgets/v1/super");
//! assert_eq!(ops[0].path_params[0].name, "id");
//! assert_eq!(ops[0].tool_name.as_str(), "Widgets-Widgets-GET-getWidget");
//! ```

mod dialect;
mod params;
mod refs;

pub use dialect::{Dialect, TENANT_SEGMENT};
pub use params::placeholders;
pub(crate) use params::PATH_PLACEHOLDER;
pub use refs::MAX_REF_DEPTH;

use crate::naming::{derive_name, sanitize_tool_name};
use crate::types::Operation;
use dialect::non_empty_str;
use restgen_core::{HttpMethod, ServiceName};
use serde_json::Value;

/// Extracts every supported operation of a document.
///
/// Paths are visited in document order and, within a path, methods in the
/// order get, post, put, patch, delete. Tool names are derived and sanitized
/// but not yet deduplicated.
#[must_use]
pub fn normalize(
    document: &Value,
    service: &ServiceName,
    display_name: Option<&str>,
) -> Vec<Operation> {
    let dialect = Dialect::detect(document);
    let api_base_path = dialect.base_path(document, service);

    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        tracing::debug!("Document for {service} has no paths object");
        return Vec::new();
    };

    let context = DocumentContext {
        document,
        dialect,
        service,
        display_name,
        api_base_path: &api_base_path,
    };

    let mut operations = Vec::new();
    for (path, raw_item) in paths {
        let Some(path_item) = refs::resolve(document, raw_item).filter(|v| v.is_object()) else {
            tracing::debug!("Skipping unusable path item {path}");
            continue;
        };

        for method in HttpMethod::ALL {
            let Some(operation) = path_item
                .get(method.as_lowercase())
                .filter(|v| v.is_object())
            else {
                continue;
            };

            operations.push(context.build_operation(path, path_item, method, operation));
        }
    }

    tracing::debug!(
        "Normalized {} operations for {service} ({dialect:?}, base {api_base_path})",
        operations.len()
    );
    operations
}

/// Document-wide values shared by every operation.
struct DocumentContext<'a> {
    document: &'a Value,
    dialect: Dialect,
    service: &'a ServiceName,
    display_name: Option<&'a str>,
    api_base_path: &'a str,
}

impl DocumentContext<'_> {
    fn build_operation(
        &self,
        path: &str,
        path_item: &Value,
        method: HttpMethod,
        operation: &Value,
    ) -> Operation {
        let operation_id = non_empty_str(operation.get("operationId"));
        let summary = non_empty_str(operation.get("summary")).unwrap_or_default();
        let description =
            non_empty_str(operation.get("description")).unwrap_or_else(|| summary.clone());

        let collected = params::collect(self.document, self.dialect, path_item, operation);
        let body = self
            .dialect
            .request_body(self.document, operation)
            .or(collected.body);

        let tool_name = sanitize_tool_name(&derive_name(
            self.service,
            method,
            operation_id.as_deref(),
            path,
            self.display_name,
        ));

        Operation {
            tool_name,
            service_name: self.service.clone(),
            display_name: self.display_name.map(str::to_string),
            method,
            path: path.to_string(),
            operation_id,
            summary,
            description,
            path_params: params::reconcile_path_params(path, collected.path),
            query_params: collected.query,
            has_request_body: body.is_some(),
            request_body_description: body.unwrap_or_default(),
            api_base_path: self.api_base_path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use restgen_core::ParamType;
    use serde_json::json;

    fn svc() -> ServiceName {
        ServiceName::new("widgets")
    }

    #[test]
    fn test_method_order_within_path() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {
                "/items": {
                    "delete": {}, "patch": {}, "put": {}, "post": {}, "get": {},
                    "head": {}, "options": {}, "parameters": []
                }
            }
        });
        let methods: Vec<_> = normalize(&doc, &svc(), None)
            .into_iter()
            .map(|op| op.method)
            .collect();
        assert_eq!(methods, HttpMethod::ALL.to_vec());
    }

    #[test]
    fn test_paths_keep_document_order() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {"/zeta": {"get": {}}, "/alpha": {"get": {}}, "/mid": {"get": {}}}
        });
        let paths: Vec<_> = normalize(&doc, &svc(), None)
            .into_iter()
            .map(|op| op.path)
            .collect();
        assert_eq!(paths, vec!["/zeta", "/alpha", "/mid"]);
    }

    #[test]
    fn test_n_placeholders_give_n_required_path_params() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {
                "/a/{one}/b/{two}/c/{three}": {
                    "parameters": [{"name": "two", "in": "path", "schema": {"type": "integer"}}],
                    "get": {"parameters": [{"name": "ghost", "in": "path"}]}
                }
            }
        });
        let ops = normalize(&doc, &svc(), None);
        let params = &ops[0].path_params;
        let names: Vec<_> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["one", "two", "three"]);
        assert!(params.iter().all(|p| p.required));
        assert_eq!(params[1].param_type, ParamType::Number);
    }

    #[test]
    fn test_description_falls_back_to_summary() {
        let doc = json!({
            "openapi": "3.0.0",
            "paths": {"/a": {"get": {"summary": "Get A", "description": ""}}}
        });
        let op = &normalize(&doc, &svc(), None)[0];
        assert_eq!(op.description, "Get A");
        assert_eq!(op.operation_id, None);
    }

    #[test]
    fn test_request_body_detection_per_dialect() {
        let openapi = json!({
            "openapi": "3.0.0",
            "paths": {"/a": {"post": {"requestBody": {"description": "The A"}}}}
        });
        let op = &normalize(&openapi, &svc(), None)[0];
        assert!(op.has_request_body);
        assert_eq!(op.request_body_description, "The A");

        let swagger = json!({
            "swagger": "2.0",
            "paths": {"/a": {"post": {"parameters": [{"name": "a", "in": "body"}]}}}
        });
        let op = &normalize(&swagger, &svc(), None)[0];
        assert!(op.has_request_body);
        assert_eq!(op.request_body_description, "JSON request body.");

        let none = json!({"openapi": "3.0.0", "paths": {"/a": {"get": {}}}});
        let op = &normalize(&none, &svc(), None)[0];
        assert!(!op.has_request_body);
        assert_eq!(op.request_body_description, "");
    }

    #[test]
    fn test_path_item_reference() {
        let doc = json!({
            "openapi": "3.1.0",
            "components": {"pathItems": {"Shared": {"get": {"operationId": "shared"}}}},
            "paths": {"/shared": {"$ref": "#/components/pathItems/Shared"}}
        });
        let ops = normalize(&doc, &svc(), None);
        assert_eq!(ops[0].operation_id.as_deref(), Some("shared"));
    }

    #[test]
    fn test_malformed_documents_yield_nothing() {
        assert!(normalize(&json!({}), &svc(), None).is_empty());
        assert!(normalize(&json!({"paths": []}), &svc(), None).is_empty());
        assert!(normalize(&json!({"paths": {"/a": "nope", "/b": {"get": 1}}}), &svc(), None).is_empty());
    }

    #[test]
    fn test_display_name_flows_into_tool_name() {
        let doc = json!({"openapi": "3.0.0", "paths": {"/workers": {"get": {"operationId": "getWorkers"}}}});
        let op = &normalize(&doc, &ServiceName::new("staffing"), Some("Human Resources (HR)"))[0];
        assert_eq!(op.tool_name.as_str(), "HumanResourcesHR-Workers-GET-getWorkers");
        assert_eq!(op.display_name.as_deref(), Some("Human Resources (HR)"));
    }
}
