//! Template engine for code generation using Handlebars.
//!
//! Wraps Handlebars with the built-in tool function template registered.
//! Output is JavaScript, so HTML escaping is disabled: every value handed to
//! a template is either a vetted identifier or an already-quoted literal.
//!
//! # Examples
//!
//! ```
//! use restgen_codegen::template_engine::TemplateEngine;
//! use serde_json::json;
//!
//! let mut engine = TemplateEngine::new().unwrap();
//! engine.register_template_string("greeting", "const x = {{value}};").unwrap();
//! let out = engine.render("greeting", &json!({"value": "\"<a & b>\""})).unwrap();
//! assert_eq!(out, "const x = \"<a & b>\";");
//! ```

use handlebars::Handlebars;
use restgen_core::{Error, Result};
use serde::Serialize;

/// Name of the built-in tool function template.
pub const TOOL_TEMPLATE: &str = "tool";

/// Template engine for code generation.
///
/// This type is `Send` and `Sync`.
#[derive(Debug)]
pub struct TemplateEngine<'a> {
    handlebars: Handlebars<'a>,
}

impl<'a> TemplateEngine<'a> {
    /// Creates a new template engine with the built-in templates.
    ///
    /// # Errors
    ///
    /// Returns error if template registration fails (should not happen
    /// with valid built-in templates).
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();

        // Strict mode: fail on missing variables
        handlebars.set_strict_mode(true);
        handlebars.register_escape_fn(handlebars::no_escape);

        handlebars
            .register_template_string(TOOL_TEMPLATE, include_str!("../templates/tool.js.hbs"))
            .map_err(|e| Error::SerializationError {
                message: format!("Failed to register tool template: {e}"),
                source: None,
            })?;

        Ok(Self { handlebars })
    }

    /// Renders a template with the given context.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Template name is not registered
    /// - Context cannot be serialized
    /// - Template rendering fails
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        self.handlebars
            .render(template_name, context)
            .map_err(|e| Error::SerializationError {
                message: format!("Template rendering failed: {e}"),
                source: None,
            })
    }

    /// Registers a custom template.
    ///
    /// # Errors
    ///
    /// Returns error if template string is invalid.
    pub fn register_template_string(&mut self, name: &str, template: &str) -> Result<()> {
        self.handlebars
            .register_template_string(name, template)
            .map_err(|e| Error::SerializationError {
                message: format!("Failed to register template '{name}': {e}"),
                source: None,
            })
    }
}
