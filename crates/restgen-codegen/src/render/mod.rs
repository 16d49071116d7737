//! Function rendering.
//!
//! [`FunctionRenderer`] turns one normalized [`Operation`] into the source of
//! a standalone JavaScript function body plus its parameter schema. The
//! function reads the host and bearer token from the runtime's `$vars`
//! object, performs exactly one HTTPS request and always resolves with a
//! string: the raw body on success, a descriptive message otherwise.
//!
//! # Examples
//!
//! ```
//! use restgen_codegen::normalize;
//! use restgen_codegen::render::FunctionRenderer;
//! use restgen_core::{RuntimeBindings, ServiceName};
//! use serde_json::json;
//!
//! let doc = json!({
//!     "openapi": "3.0.0",
//!     "paths": {"/widgets/{id}": {"get": {"operationId": "getWidget"}}}
//! });
//! let op = &normalize(&doc, &ServiceName::new("widgets"), None)[0];
//!
//! let renderer = FunctionRenderer::new(RuntimeBindings::default()).unwrap();
//! let tool = renderer.render(op).unwrap();
//!
//! assert!(tool.source.contains("$vars?.suv_name"));
//! assert!(tool.source.contains("`/ccx/api/widgets/v1/super/widgets/${id}`"));
//! assert_eq!(tool.schema[0].name, "id");
//! ```

mod error_table;
mod js;

pub use error_table::{ErrorEntry, error_table};
pub use js::{BindingScope, escape_template_literal, js_identifier};

use crate::normalize::PATH_PLACEHOLDER;
use crate::template_engine::{TOOL_TEMPLATE, TemplateEngine};
use crate::types::{Operation, Parameter, RenderedTool};
use js::string_literal;
use restgen_core::{Error, ParamType, Result, RuntimeBindings};
use serde::Serialize;
use std::collections::HashMap;

/// Default description of the synthetic `requestBody` input.
pub const DEFAULT_BODY_DESCRIPTION: &str = "JSON request body.";

/// Renders operations into JavaScript function bodies.
///
/// Rendering is pure: the same operation and bindings always produce
/// byte-identical output.
#[derive(Debug)]
pub struct FunctionRenderer<'a> {
    engine: TemplateEngine<'a>,
    bindings: RuntimeBindings,
}

#[derive(Serialize)]
struct InputBinding {
    public: String,
    local: String,
}

#[derive(Serialize)]
struct QueryBinding {
    local: String,
    key: String,
}

#[derive(Serialize)]
struct ErrorRow {
    status: u16,
    message: String,
}

#[derive(Serialize)]
struct ToolContext<'a> {
    host_var: &'a str,
    token_var: &'a str,
    config_error: String,
    bindings: Vec<InputBinding>,
    path_expr: String,
    has_query: bool,
    query: Vec<QueryBinding>,
    send_body: bool,
    body_local: String,
    body_error: String,
    method: &'static str,
    error_map: Vec<ErrorRow>,
    api_error_prefix: String,
    transport_prefix: String,
    transport_hint: String,
}

impl FunctionRenderer<'_> {
    /// Creates a renderer for the given runtime bindings.
    ///
    /// # Errors
    ///
    /// Returns an error if the bindings are invalid or the template engine
    /// cannot be initialized.
    pub fn new(bindings: RuntimeBindings) -> Result<Self> {
        bindings.validate()?;
        Ok(Self {
            engine: TemplateEngine::new()?,
            bindings,
        })
    }

    /// Returns the runtime bindings embedded in rendered functions.
    #[must_use]
    pub const fn bindings(&self) -> &RuntimeBindings {
        &self.bindings
    }

    /// Renders one operation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::GenerationError`] if the template fails to render.
    pub fn render(&self, operation: &Operation) -> Result<RenderedTool> {
        let mut scope = BindingScope::new();
        let mut bindings = Vec::new();
        let mut schema = Vec::new();

        let mut path_locals = HashMap::new();
        for param in &operation.path_params {
            let (public, local) = scope.bind(&param.name);
            path_locals.insert(param.name.as_str(), local.clone());
            schema.push(Parameter {
                name: public.clone(),
                param_type: param.param_type,
                description: param.description.clone(),
                required: true,
            });
            bindings.push(InputBinding { public, local });
        }

        let mut query = Vec::new();
        for param in &operation.query_params {
            let (public, local) = scope.bind(&param.name);
            schema.push(Parameter {
                name: public.clone(),
                param_type: param.param_type,
                description: param.description.clone(),
                required: param.required,
            });
            query.push(QueryBinding {
                local: local.clone(),
                key: string_literal(&param.name),
            });
            bindings.push(InputBinding { public, local });
        }

        let mut body_local = String::new();
        if operation.has_request_body {
            let (public, local) = scope.bind("requestBody");
            let description = if operation.request_body_description.is_empty() {
                DEFAULT_BODY_DESCRIPTION.to_string()
            } else {
                operation.request_body_description.clone()
            };
            schema.push(Parameter {
                name: public.clone(),
                param_type: ParamType::String,
                description,
                required: false,
            });
            body_local.clone_from(&local);
            bindings.push(InputBinding { public, local });
        }

        let RuntimeBindings {
            host_var,
            token_var,
            api_label,
        } = &self.bindings;

        let context = ToolContext {
            host_var,
            token_var,
            config_error: string_literal(&format!(
                "Error: {api_label} connection not configured. \
                 Set the '{host_var}' and '{token_var}' variables."
            )),
            bindings,
            path_expr: path_expression(operation, &path_locals),
            has_query: !query.is_empty(),
            query,
            send_body: operation.has_request_body && operation.method.permits_body(),
            body_local,
            body_error: string_literal("Error: requestBody could not be serialized: "),
            method: operation.method.as_str(),
            error_map: error_table(&operation.service_name.functional_area(), &self.bindings)
                .into_iter()
                .map(|entry| ErrorRow {
                    status: entry.status,
                    message: string_literal(&entry.message),
                })
                .collect(),
            api_error_prefix: string_literal(&format!("{api_label} API error ")),
            transport_prefix: string_literal("Request failed: "),
            transport_hint: string_literal(&format!(
                ". Verify the '{host_var}' variable contains a valid {api_label} hostname."
            )),
        };

        let source = self
            .engine
            .render(TOOL_TEMPLATE, &context)
            .map_err(|e| Error::GenerationError {
                tool: operation.tool_name.to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(
            "Rendered {} ({} inputs, {} bytes)",
            operation.tool_name,
            schema.len(),
            source.len()
        );

        Ok(RenderedTool { source, schema })
    }
}

/// Builds the JavaScript expression for the request path.
///
/// A plain string literal without path parameters, otherwise a template
/// literal interpolating the bound path values.
fn path_expression(operation: &Operation, path_locals: &HashMap<&str, String>) -> String {
    let full = format!("{}{}", operation.api_base_path, operation.path);
    if operation.path_params.is_empty() {
        return string_literal(&full);
    }

    let mut out = String::from("`");
    out.push_str(&escape_template_literal(&operation.api_base_path));

    let mut last = 0;
    for caps in PATH_PLACEHOLDER.captures_iter(&operation.path) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&escape_template_literal(&operation.path[last..whole.start()]));
        match path_locals.get(name.as_str()) {
            Some(local) => {
                out.push_str("${");
                out.push_str(local);
                out.push('}');
            }
            None => out.push_str(&escape_template_literal(whole.as_str())),
        }
        last = whole.end();
    }
    out.push_str(&escape_template_literal(&operation.path[last..]));
    out.push('`');
    out
}
