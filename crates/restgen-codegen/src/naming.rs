//! Tool name derivation.
//!
//! Names follow `{Area}-{Resource}-{METHOD}-{OpName}`, e.g.
//! `AbsenceManagement-Workers-GET-getWorkers`. They are sanitized to
//! `[A-Za-z0-9_-]` and deduplicated per service by appending `_N`.
//!
//! # Examples
//!
//! ```
//! use restgen_codegen::naming::{derive_name, sanitize_tool_name};
//! use restgen_core::{HttpMethod, ServiceName};
//!
//! let name = derive_name(
//!     &ServiceName::new("absenceManagement"),
//!     HttpMethod::Get,
//!     None,
//!     "/workers/{ID}/leavesOfAbsence",
//!     Some("Absence Management"),
//! );
//! assert_eq!(name, "AbsenceManagement-Workers-GET-getLeavesOfAbsence");
//! assert_eq!(sanitize_tool_name(&name).as_str(), name);
//! ```

use restgen_core::{HttpMethod, ServiceName, ToolName};
use std::collections::{HashMap, HashSet};

/// Derives the unsanitized tool name of an operation.
#[must_use]
pub fn derive_name(
    service: &ServiceName,
    method: HttpMethod,
    operation_id: Option<&str>,
    path: &str,
    display_name: Option<&str>,
) -> String {
    let area = display_name
        .map(display_name_to_area)
        .filter(|area| !area.is_empty())
        .unwrap_or_else(|| service.functional_area());

    let op_name = operation_id
        .map(|id| {
            id.chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
                .collect::<String>()
        })
        .filter(|id| !id.is_empty())
        .unwrap_or_else(|| derived_operation_name(method, path));

    format!("{area}-{}-{method}-{op_name}", extract_resource(path))
}

/// Replaces every character outside `[A-Za-z0-9_-]` with `_`.
///
/// # Examples
///
/// ```
/// use restgen_codegen::naming::sanitize_tool_name;
///
/// assert_eq!(sanitize_tool_name("A-B.c d").as_str(), "A-B_c_d");
/// ```
#[must_use]
pub fn sanitize_tool_name(name: &str) -> ToolName {
    let sanitized: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    ToolName::new(sanitized)
}

/// Compacts a display name into an area label.
///
/// Parentheses are removed, hyphens split words, and each word is
/// capitalized unless it is an all-uppercase acronym.
///
/// # Examples
///
/// ```
/// use restgen_codegen::naming::display_name_to_area;
///
/// assert_eq!(display_name_to_area("Absence Management"), "AbsenceManagement");
/// assert_eq!(display_name_to_area("ASOR"), "ASOR");
/// assert_eq!(
///     display_name_to_area("Custom Object Data (multi-instance)"),
///     "CustomObjectDataMultiInstance"
/// );
/// ```
#[must_use]
pub fn display_name_to_area(display_name: &str) -> String {
    display_name
        .replace(['(', ')'], "")
        .replace('-', " ")
        .split_whitespace()
        .map(|word| {
            if word.chars().count() > 1 && word == word.to_uppercase() {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect()
}

/// Returns the first non-placeholder path segment, capitalized, or `Root`.
///
/// # Examples
///
/// ```
/// use restgen_codegen::naming::extract_resource;
///
/// assert_eq!(extract_resource("/workers/{ID}/leavesOfAbsence"), "Workers");
/// assert_eq!(extract_resource("/{ID}"), "Root");
/// ```
#[must_use]
pub fn extract_resource(path: &str) -> String {
    path.split('/')
        .find(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .map_or_else(|| "Root".to_string(), capitalize)
}

/// Lowercase method followed by the last non-placeholder segment.
fn derived_operation_name(method: HttpMethod, path: &str) -> String {
    let last = path
        .split('/')
        .map(strip_placeholders)
        .rev()
        .find(|segment| !segment.is_empty())
        .unwrap_or_else(|| "root".to_string());
    format!("{}{}", method.as_lowercase(), capitalize(&last))
}

fn strip_placeholders(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;
    while let Some(open) = rest.find('{') {
        match rest[open..].find('}') {
            Some(close) if close > 1 => {
                out.push_str(&rest[..open]);
                rest = &rest[open + close + 1..];
            }
            _ => break,
        }
    }
    out.push_str(rest);
    out
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

/// Makes tool names unique within one service.
///
/// The first occurrence keeps its name; later ones get `_1`, `_2`, ... from a
/// per-name counter. A suffixed candidate that is already taken advances the
/// counter again.
///
/// # Examples
///
/// ```
/// use restgen_codegen::naming::NameDeduplicator;
/// use restgen_core::ToolName;
///
/// let mut dedup = NameDeduplicator::new();
/// let names: Vec<_> = ["A", "A", "B", "A"]
///     .into_iter()
///     .map(|n| dedup.claim(ToolName::new(n)).into_inner())
///     .collect();
/// assert_eq!(names, ["A", "A_1", "B", "A_2"]);
/// ```
#[derive(Debug, Default)]
pub struct NameDeduplicator {
    taken: HashSet<String>,
    counters: HashMap<String, usize>,
}

impl NameDeduplicator {
    /// Creates an empty deduplicator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `name` or the next free suffixed variant of it.
    pub fn claim(&mut self, name: ToolName) -> ToolName {
        let base = name.into_inner();
        if self.taken.insert(base.clone()) {
            return ToolName::new(base);
        }

        let counter = self.counters.entry(base.clone()).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{base}_{counter}");
            if self.taken.insert(candidate.clone()) {
                return ToolName::new(candidate);
            }
        }
    }
}

/// Deduplicates a list of names in order.
#[must_use]
pub fn deduplicate_names(names: impl IntoIterator<Item = ToolName>) -> Vec<ToolName> {
    let mut dedup = NameDeduplicator::new();
    names.into_iter().map(|n| dedup.claim(n)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(raw: &[&str]) -> Vec<ToolName> {
        raw.iter().map(|n| ToolName::new(*n)).collect()
    }

    #[test]
    fn test_derive_name_with_operation_id() {
        let name = derive_name(
            &ServiceName::new("procurement"),
            HttpMethod::Post,
            Some("create-Requisition.v2"),
            "/requisitions",
            None,
        );
        assert_eq!(name, "Procurement-Requisitions-POST-createRequisitionv2");
    }

    #[test]
    fn test_derive_name_without_operation_id() {
        let name = derive_name(
            &ServiceName::new("staffing"),
            HttpMethod::Delete,
            None,
            "/workers/{ID}",
            None,
        );
        assert_eq!(name, "Staffing-Workers-DELETE-deleteWorkers");
    }

    #[test]
    fn test_operation_id_stripped_to_nothing_falls_back() {
        let name = derive_name(
            &ServiceName::new("wql"),
            HttpMethod::Get,
            Some("---"),
            "/data",
            Some("WQL"),
        );
        assert_eq!(name, "WQL-Data-GET-getData");
    }

    #[test]
    fn test_root_path() {
        let name = derive_name(&ServiceName::new("graph"), HttpMethod::Get, None, "/", None);
        assert_eq!(name, "Graph-Root-GET-getRoot");
    }

    #[test]
    fn test_blank_display_name_falls_back_to_service() {
        let name = derive_name(
            &ServiceName::new("payroll"),
            HttpMethod::Get,
            Some("getPay"),
            "/pay",
            Some("()"),
        );
        assert!(name.starts_with("Payroll-"));
    }

    #[test]
    fn test_display_name_to_area_mixed_words() {
        assert_eq!(display_name_to_area("Student Finance"), "StudentFinance");
        assert_eq!(display_name_to_area("Person - WQL"), "PersonWQL");
        assert_eq!(display_name_to_area("a"), "A");
        assert_eq!(display_name_to_area(""), "");
    }

    #[test]
    fn test_derived_name_strips_inline_placeholders() {
        let name = derive_name(
            &ServiceName::new("files"),
            HttpMethod::Get,
            None,
            "/files/{id}.json",
            None,
        );
        assert_eq!(name, "Files-Files-GET-get.json");
        assert_eq!(sanitize_tool_name(&name).as_str(), "Files-Files-GET-get_json");
    }

    #[test]
    fn test_sanitized_names_match_charset() {
        let sanitized = sanitize_tool_name("Ünïcode Area/x-GET-op$1");
        assert!(
            sanitized
                .as_str()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        );
    }

    #[test]
    fn test_deduplicate_basic() {
        let out = deduplicate_names(names(&["A", "A", "B", "A"]));
        assert_eq!(out, names(&["A", "A_1", "B", "A_2"]));
    }

    #[test]
    fn test_deduplicate_skips_taken_suffix() {
        let out = deduplicate_names(names(&["A_1", "A", "A"]));
        assert_eq!(out, names(&["A_1", "A", "A_2"]));
    }

    #[test]
    fn test_deduplicate_suffixed_original_collides() {
        let out = deduplicate_names(names(&["A", "A", "A_1"]));
        assert_eq!(out, names(&["A", "A_1", "A_1_1"]));
    }

    #[test]
    fn test_deduplicate_is_deterministic() {
        let input = names(&["X", "Y", "X", "X", "Y"]);
        assert_eq!(deduplicate_names(input.clone()), deduplicate_names(input));
    }
}
