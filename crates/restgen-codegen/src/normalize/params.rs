//! Parameter collection and path placeholder reconciliation.

use super::dialect::{Dialect, non_empty_str};
use super::refs;
use crate::types::Parameter;
use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;
use std::sync::LazyLock;

pub(crate) static PATH_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^}]+)\}").expect("valid regex"));

/// Parameters of one operation, classified by location.
#[derive(Debug, Default)]
pub struct ParameterSet {
    /// Declared path parameters (not yet reconciled with the template)
    pub path: Vec<Parameter>,
    /// Query parameters in declaration order
    pub query: Vec<Parameter>,
    /// Description of a Swagger 2.0 `in: body` parameter
    pub body: Option<String>,
}

/// Collects path-item-level then operation-level parameters.
///
/// `$ref`s are resolved; entries without a string `name` and `in` are
/// skipped; a repeated `(in, name)` pair keeps its first declaration.
pub fn collect(
    document: &Value,
    dialect: Dialect,
    path_item: &Value,
    operation: &Value,
) -> ParameterSet {
    let declared = [path_item, operation]
        .into_iter()
        .filter_map(|owner| owner.get("parameters").and_then(Value::as_array))
        .flatten();

    let mut seen = HashSet::new();
    let mut set = ParameterSet::default();

    for raw in declared {
        let Some(param) = refs::resolve(document, raw) else {
            tracing::debug!("Dropping unresolvable parameter reference {raw}");
            continue;
        };
        let (Some(name), Some(location)) = (
            param.get("name").and_then(Value::as_str),
            param.get("in").and_then(Value::as_str),
        ) else {
            tracing::debug!("Skipping parameter without name or location");
            continue;
        };
        if !seen.insert((location.to_string(), name.to_string())) {
            continue;
        }

        let description = non_empty_str(param.get("description"))
            .unwrap_or_else(|| format!("{location} parameter: {name}"));

        match location {
            "path" => set.path.push(Parameter {
                name: name.to_string(),
                param_type: dialect.param_type(document, param),
                description,
                required: true,
            }),
            "query" => set.query.push(Parameter {
                name: name.to_string(),
                param_type: dialect.param_type(document, param),
                description,
                required: param
                    .get("required")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }),
            "body" if dialect == Dialect::Swagger2 && set.body.is_none() => {
                set.body = Some(
                    non_empty_str(param.get("description"))
                        .unwrap_or_else(|| dialect.default_body_description().to_string()),
                );
            }
            _ => {}
        }
    }

    set
}

/// Returns the distinct placeholder names of a path template in order.
///
/// # Examples
///
/// ```
/// use restgen_codegen::normalize::placeholders;
///
/// assert_eq!(placeholders("/a/{id}/b/{sub}/{id}"), vec!["id", "sub"]);
/// ```
#[must_use]
pub fn placeholders(path: &str) -> Vec<&str> {
    let mut seen = HashSet::new();
    PATH_PLACEHOLDER
        .captures_iter(path)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Orders declared path parameters by placeholder, synthesizing missing
/// ones and dropping those with no placeholder.
pub fn reconcile_path_params(path: &str, mut declared: Vec<Parameter>) -> Vec<Parameter> {
    let names = placeholders(path);

    for orphan in declared.iter().filter(|p| !names.contains(&p.name.as_str())) {
        tracing::debug!(
            "Dropping path parameter '{}' with no placeholder in {path}",
            orphan.name
        );
    }

    names
        .into_iter()
        .map(|name| {
            declared
                .iter()
                .position(|p| p.name == name)
                .map_or_else(|| Parameter::synthesized_path(name), |i| declared.swap_remove(i))
        })
        .collect()
}
