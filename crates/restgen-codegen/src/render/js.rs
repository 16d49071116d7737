//! JavaScript lexical helpers used by the renderer.

use std::collections::HashSet;

/// Names that cannot be used as a `const` binding.
const RESERVED_WORDS: &[&str] = &[
    "await", "break", "case", "catch", "class", "const", "continue", "debugger", "default",
    "delete", "do", "else", "enum", "export", "extends", "false", "finally", "for", "function",
    "if", "implements", "import", "in", "instanceof", "interface", "let", "new", "null",
    "package", "private", "protected", "public", "return", "static", "super", "switch", "this",
    "throw", "true", "try", "typeof", "undefined", "var", "void", "while", "with", "yield",
    "arguments", "eval", "NaN", "Infinity",
];

/// Identifiers the function template declares itself.
const TEMPLATE_LOCALS: &[&str] = &[
    "https", "hostname", "accessToken", "apiPath", "qParts", "queryString", "bodyData",
    "options", "ERROR_MAP", "req", "res", "body", "chunk", "hint", "detail", "parsed", "err",
    "resolve", "require", "Buffer", "JSON", "Promise", "encodeURIComponent",
];

/// Runtime context objects. An input named after one would read it as `$name`.
const RUNTIME_OBJECTS: &[&str] = &["vars", "flow"];

/// Turns a parameter name into a valid identifier.
///
/// Characters outside `[A-Za-z0-9_$]` become `_`; a leading digit gets a
/// `_` prefix.
///
/// # Examples
///
/// ```
/// use restgen_codegen::render::js_identifier;
///
/// assert_eq!(js_identifier("Workday-ID"), "Workday_ID");
/// assert_eq!(js_identifier("2fa"), "_2fa");
/// assert_eq!(js_identifier(""), "_");
/// ```
#[must_use]
pub fn js_identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// Allocates collision-free names for one function.
///
/// Each input gets a public name (the parameter schema entry, read from the
/// runtime as `$name`) and a local `const` identifier. A public name that
/// starts with `$` or names a runtime context object takes the `_N` suffix
/// like any other collision. Locals never contain `$`, so they
/// cannot shadow a runtime input. They also avoid reserved words and the
/// template's own declarations by taking a `_` suffix.
#[derive(Debug, Default)]
pub struct BindingScope {
    public: HashSet<String>,
    locals: HashSet<String>,
}

impl BindingScope {
    /// Creates an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `(public_name, local_identifier)` for a raw parameter name.
    pub fn bind(&mut self, raw: &str) -> (String, String) {
        let base = js_identifier(raw);
        let mut public = base.clone();
        let mut n = 1;
        while (n == 1 && is_runtime_name(&public)) || !self.public.insert(public.clone()) {
            n += 1;
            public = format!("{base}_{n}");
        }

        let mut local = public.replace('$', "_");
        if RESERVED_WORDS.contains(&local.as_str()) || TEMPLATE_LOCALS.contains(&local.as_str()) {
            local.push('_');
        }
        while !self.locals.insert(local.clone()) {
            local.push('_');
        }
        (public, local)
    }
}

fn is_runtime_name(public: &str) -> bool {
    public.starts_with('$') || RUNTIME_OBJECTS.contains(&public)
}

/// Escapes text for use inside a template literal.
///
/// Every `$` is escaped so that no `${` can form across adjacent pieces.
///
/// # Examples
///
/// ```
/// use restgen_codegen::render::escape_template_literal;
///
/// assert_eq!(escape_template_literal("/a`b${c}\\d"), "/a\\`b\\${c}\\\\d");
/// ```
#[must_use]
pub fn escape_template_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace('$', "\\$")
}

/// Renders a string as a double-quoted literal.
pub fn string_literal(text: &str) -> String {
    serde_json::Value::String(text.to_string()).to_string()
}
