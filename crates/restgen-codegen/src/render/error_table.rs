//! The status-code table embedded in every rendered function.
//!
//! Each function carries its own copy so that it has no shared runtime
//! dependency. The table is a pure function of the functional area and the
//! runtime bindings.

use restgen_core::RuntimeBindings;

/// One row of the error table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEntry {
    /// HTTP status code
    pub status: u16,
    /// Hint shown to the caller
    pub message: String,
}

/// Builds the error table for a functional area.
///
/// # Examples
///
/// ```
/// use restgen_codegen::render::error_table;
/// use restgen_core::RuntimeBindings;
///
/// let table = error_table("Procurement", &RuntimeBindings::default());
/// let forbidden = table.iter().find(|e| e.status == 403).unwrap();
/// assert!(forbidden.message.contains("Procurement domain"));
/// ```
#[must_use]
pub fn error_table(area: &str, bindings: &RuntimeBindings) -> Vec<ErrorEntry> {
    let label = &bindings.api_label;
    let token_var = &bindings.token_var;
    [
        (
            400,
            "Bad Request: The request is malformed or contains invalid parameters.".to_string(),
        ),
        (
            401,
            format!(
                "Unauthorized: The OAuth 2.0 access token is expired or invalid. \
                 Refresh the token and update the {token_var} variable."
            ),
        ),
        (
            403,
            format!(
                "Forbidden: The Integration System User (ISU) lacks required domain security \
                 policies. Verify the Security Group has permissions on the {area} domain."
            ),
        ),
        (
            404,
            "Not Found: The requested resource or endpoint does not exist. \
             Verify the ID and API path."
                .to_string(),
        ),
        (
            409,
            format!("Conflict: The request conflicts with a {label} business rule or constraint."),
        ),
        (
            500,
            format!(
                "Internal Server Error: A server-side error occurred in {label}. \
                 Retry or check service status."
            ),
        ),
        (
            503,
            format!(
                "Service Unavailable: The {label} tenant is temporarily unavailable or under \
                 maintenance. Retry later."
            ),
        ),
    ]
    .into_iter()
    .map(|(status, message)| ErrorEntry { status, message })
    .collect()
}
