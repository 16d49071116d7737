//! Schema dialect detection and dialect-specific lookups.
//!
//! Documents are either OpenAPI 3.x or Swagger 2.0. The dialect is resolved
//! once per document; everything that differs between the two (base path,
//! parameter types, request bodies) goes through [`Dialect`].

use super::refs;
use regex::Regex;
use restgen_core::{ParamType, ServiceName};
use serde_json::Value;
use std::sync::LazyLock;

static TENANT_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\{[^}]*tenant[^}]*\}").expect("valid regex"));

/// Tenant placeholders in base paths are replaced with this segment.
pub const TENANT_SEGMENT: &str = "super";

/// Schema document dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// OpenAPI 3.x (`openapi` field, or anything that is not Swagger)
    OpenApi3,
    /// Swagger 2.0 (`swagger` field)
    Swagger2,
}

impl Dialect {
    /// Detects the dialect of a document.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_codegen::normalize::Dialect;
    /// use serde_json::json;
    ///
    /// assert_eq!(Dialect::detect(&json!({"swagger": "2.0"})), Dialect::Swagger2);
    /// assert_eq!(Dialect::detect(&json!({"openapi": "3.1.0"})), Dialect::OpenApi3);
    /// assert_eq!(Dialect::detect(&json!({"paths": {}})), Dialect::OpenApi3);
    /// ```
    #[must_use]
    pub fn detect(document: &Value) -> Self {
        if document.get("swagger").is_some() {
            Self::Swagger2
        } else {
            Self::OpenApi3
        }
    }

    /// Computes the version-independent base path all operation paths are
    /// appended to.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_codegen::normalize::Dialect;
    /// use restgen_core::ServiceName;
    /// use serde_json::json;
    ///
    /// let doc = json!({
    ///     "openapi": "3.0.0",
    ///     "servers": [{"url": "https://{host}.example.com/ccx/api/widgets/v2/{tenant}/"}]
    /// });
    /// let base = Dialect::OpenApi3.base_path(&doc, &ServiceName::new("widgets"));
    /// assert_eq!(base, "/ccx/api/widgets/v2/super");
    /// ```
    #[must_use]
    pub fn base_path(self, document: &Value, service: &ServiceName) -> String {
        let declared = match self {
            Self::OpenApi3 => openapi_server_path(document),
            Self::Swagger2 => document
                .get("basePath")
                .and_then(Value::as_str)
                .map(|base| substitute_tenant(base).into_owned()),
        };

        let trimmed = declared
            .as_deref()
            .map(|path| path.trim_end_matches('/'))
            .unwrap_or_default();

        if trimmed.is_empty() {
            synthesized_base_path(document, service)
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        }
    }

    /// Maps a resolved parameter object to its coarse type.
    ///
    /// OpenAPI 3.x reads `schema.type` (following a `$ref` schema), falling
    /// back to the parameter's own `type`; Swagger 2.0 reads the parameter's
    /// own `type`.
    #[must_use]
    pub fn param_type(self, document: &Value, param: &Value) -> ParamType {
        let type_of = |v: &Value| v.get("type").and_then(Value::as_str).map(str::to_string);
        let schema_type = match self {
            Self::OpenApi3 => param
                .get("schema")
                .and_then(|schema| refs::resolve(document, schema))
                .and_then(type_of)
                .or_else(|| type_of(param)),
            Self::Swagger2 => type_of(param),
        };
        ParamType::from_schema_type(schema_type.as_deref())
    }

    /// Default request body description when the document gives none.
    #[must_use]
    pub const fn default_body_description(self) -> &'static str {
        match self {
            Self::OpenApi3 => "JSON request body for this operation.",
            Self::Swagger2 => "JSON request body.",
        }
    }

    /// Returns the request body description of an OpenAPI 3.x operation, if
    /// it declares a body.
    ///
    /// Swagger 2.0 bodies are `in: body` parameters and are picked up while
    /// collecting parameters.
    #[must_use]
    pub fn request_body(self, document: &Value, operation: &Value) -> Option<String> {
        match self {
            Self::OpenApi3 => {
                let body = operation.get("requestBody")?;
                let resolved = refs::resolve(document, body).unwrap_or(body);
                Some(
                    non_empty_str(resolved.get("description"))
                        .unwrap_or_else(|| self.default_body_description().to_string()),
                )
            }
            Self::Swagger2 => None,
        }
    }
}

/// Extracts a non-empty string value.
pub fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn openapi_server_path(document: &Value) -> Option<String> {
    let server = document.get("servers")?.as_array()?.first()?;
    let url = server.get("url")?.as_str()?;
    Some(substitute_tenant(url_path(url)).into_owned())
}

/// Returns the path component of a server URL.
///
/// Split textually because the authority may itself be templated.
fn url_path(url: &str) -> &str {
    let without_suffix = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();

    without_suffix.find("://").map_or(without_suffix, |scheme_end| {
        let rest = &without_suffix[scheme_end + 3..];
        rest.find('/').map_or("", |slash| &rest[slash..])
    })
}

fn substitute_tenant(path: &str) -> std::borrow::Cow<'_, str> {
    TENANT_PLACEHOLDER.replace_all(path, TENANT_SEGMENT)
}

fn synthesized_base_path(document: &Value, service: &ServiceName) -> String {
    let version = document
        .pointer("/info/version")
        .and_then(Value::as_str)
        .filter(|v| !v.is_empty())
        .map_or_else(
            || "v1".to_string(),
            |v| {
                if v.starts_with(|c: char| c.is_ascii_digit()) {
                    format!("v{v}")
                } else {
                    v.to_string()
                }
            },
        );
    format!("/ccx/api/{service}/{version}/{TENANT_SEGMENT}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base(doc: &Value) -> String {
        Dialect::detect(doc).base_path(doc, &ServiceName::new("widgets"))
    }

    #[test]
    fn test_absolute_server_url_keeps_path_only() {
        let doc = json!({
            "openapi": "3.0.0",
            "servers": [{"url": "https://api.example.com/ccx/api/widgets/v2/{tenant}"}]
        });
        assert_eq!(base(&doc), "/ccx/api/widgets/v2/super");
    }

    #[test]
    fn test_relative_server_url() {
        let doc = json!({"openapi": "3.0.0", "servers": [{"url": "/api/{Tenant_Name}/"}]});
        assert_eq!(base(&doc), "/api/super");
    }

    #[test]
    fn test_server_url_without_leading_slash() {
        let doc = json!({"openapi": "3.0.0", "servers": [{"url": "api/v1"}]});
        assert_eq!(base(&doc), "/api/v1");
    }

    #[test]
    fn test_only_tenant_placeholders_are_replaced() {
        let doc = json!({
            "openapi": "3.0.0",
            "servers": [{
                "url": "https://{host}/ccx/api/{service}/{version}/{tenant}",
                "variables": {
                    "service": {"default": "absenceManagement"},
                    "version": {"default": "v4"},
                    "tenant": {"default": "acme"}
                }
            }]
        });
        assert_eq!(base(&doc), "/ccx/api/{service}/{version}/super");
    }

    #[test]
    fn test_query_and_fragment_are_dropped() {
        let doc = json!({
            "openapi": "3.0.0",
            "servers": [{"url": "https://h.example.com/base/?x=1#frag"}]
        });
        assert_eq!(base(&doc), "/base");
    }

    #[test]
    fn test_host_only_url_falls_back() {
        let doc = json!({
            "openapi": "3.0.0",
            "info": {"version": "3"},
            "servers": [{"url": "https://h.example.com"}]
        });
        assert_eq!(base(&doc), "/ccx/api/widgets/v3/super");
    }

    #[test]
    fn test_swagger_base_path() {
        let doc = json!({"swagger": "2.0", "basePath": "/ccx/api/v1/{tenant}"});
        assert_eq!(base(&doc), "/ccx/api/v1/super");
    }

    #[test]
    fn test_lone_slash_falls_back() {
        let doc = json!({"swagger": "2.0", "basePath": "/", "info": {"version": "v9"}});
        assert_eq!(base(&doc), "/ccx/api/widgets/v9/super");
    }

    #[test]
    fn test_missing_version_defaults_to_v1() {
        let doc = json!({"openapi": "3.0.0"});
        assert_eq!(base(&doc), "/ccx/api/widgets/v1/super");
    }

    #[test]
    fn test_swagger_ignores_servers() {
        let doc = json!({"swagger": "2.0", "servers": [{"url": "/ignored"}]});
        assert_eq!(base(&doc), "/ccx/api/widgets/v1/super");
    }

    #[test]
    fn test_param_type_by_dialect() {
        let doc = json!({"components": {"schemas": {"Count": {"type": "integer"}}}});
        let openapi_param = json!({"schema": {"$ref": "#/components/schemas/Count"}});
        assert_eq!(Dialect::OpenApi3.param_type(&doc, &openapi_param), ParamType::Number);

        let swagger_param = json!({"type": "boolean"});
        assert_eq!(Dialect::Swagger2.param_type(&doc, &swagger_param), ParamType::Boolean);
        assert_eq!(Dialect::OpenApi3.param_type(&doc, &swagger_param), ParamType::Boolean);
        assert_eq!(Dialect::OpenApi3.param_type(&doc, &json!({})), ParamType::String);
    }

    #[test]
    fn test_request_body_detection() {
        let doc = json!({
            "components": {"requestBodies": {"Widget": {"description": "A widget"}}}
        });
        let op = json!({"requestBody": {"$ref": "#/components/requestBodies/Widget"}});
        assert_eq!(
            Dialect::OpenApi3.request_body(&doc, &op).as_deref(),
            Some("A widget")
        );

        let bare = json!({"requestBody": {"content": {}}});
        assert_eq!(
            Dialect::OpenApi3.request_body(&doc, &bare).as_deref(),
            Some("JSON request body for this operation.")
        );
        assert!(Dialect::OpenApi3.request_body(&doc, &json!({})).is_none());
        assert!(Dialect::Swagger2.request_body(&doc, &op).is_none());
    }
}
