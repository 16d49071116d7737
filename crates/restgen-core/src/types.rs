//! Strong domain types for the restgen pipeline.
//!
//! Newtypes keep service names and tool names from being mixed up with
//! arbitrary strings, and small enums replace stringly-typed HTTP methods and
//! parameter types.
//!
//! # Examples
//!
//! ```
//! use restgen_core::{HttpMethod, ParamType, ServiceName, ToolName};
//!
//! let service = ServiceName::new("procurement");
//! let tool = ToolName::new("Procurement-Requisitions-GET-getRequisitions");
//! assert_eq!(HttpMethod::Post.as_str(), "POST");
//! assert_eq!(ParamType::from_schema_type(Some("integer")), ParamType::Number);
//! # let _ = (service, tool);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service name (newtype over String).
///
/// The `name` half of a service's `name` + `version` key, e.g.
/// `absenceManagement`. It doubles as the directory name of the service's
/// generated tools, hence [`is_safe_directory_name`](Self::is_safe_directory_name).
///
/// # Examples
///
/// ```
/// use restgen_core::ServiceName;
///
/// let name = ServiceName::new("absenceManagement");
/// assert_eq!(name.as_str(), "absenceManagement");
/// assert_eq!(name.functional_area(), "AbsenceManagement");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceName(String);

impl ServiceName {
    /// Creates a new service name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the service name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ServiceName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the service name with its first character uppercased.
    ///
    /// This is the functional area used in tool names and error hints when no
    /// display name is available.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_core::ServiceName;
    ///
    /// assert_eq!(ServiceName::new("wql").functional_area(), "Wql");
    /// assert_eq!(ServiceName::new("").functional_area(), "");
    /// ```
    #[must_use]
    pub fn functional_area(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            None => String::new(),
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        }
    }

    /// Checks that the name can be used as a single directory component.
    ///
    /// Rejects empty names, path separators, `.`/`..` and control characters.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_core::ServiceName;
    ///
    /// assert!(ServiceName::new("procurement").is_safe_directory_name());
    /// assert!(!ServiceName::new("../etc").is_safe_directory_name());
    /// assert!(!ServiceName::new("").is_safe_directory_name());
    /// ```
    #[must_use]
    pub fn is_safe_directory_name(&self) -> bool {
        let name = self.0.as_str();
        !name.is_empty()
            && name != "."
            && name != ".."
            && !name
                .chars()
                .any(|c| c == '/' || c == '\\' || c == ':' || c.is_control())
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ServiceName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ServiceName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Tool name (newtype over String).
///
/// A derived, sanitized and deduplicated identifier such as
/// `Procurement-Requisitions-GET-getRequisitions`. Tool names are used as
/// file stems and as function-calling tool names, so they only ever contain
/// `[A-Za-z0-9_-]`.
///
/// # Examples
///
/// ```
/// use restgen_core::ToolName;
///
/// let tool = ToolName::new("Widgets-Items-GET-getItems");
/// assert_eq!(tool.file_name(), "Widgets-Items-GET-getItems.js");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolName(String);

impl ToolName {
    /// Creates a new tool name.
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the tool name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `ToolName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the file name of the rendered function source.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.js", self.0)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ToolName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ToolName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// HTTP methods the generator emits tools for.
///
/// # Examples
///
/// ```
/// use restgen_core::HttpMethod;
///
/// let method: HttpMethod = "patch".parse().unwrap();
/// assert_eq!(method, HttpMethod::Patch);
/// assert!(method.permits_body());
/// assert!(!HttpMethod::Delete.permits_body());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

impl HttpMethod {
    /// Supported methods in the order operations are extracted from a path item.
    pub const ALL: [Self; 5] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
    ];

    /// Returns the uppercase method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    /// Returns the lowercase method name, which is also the path item key.
    #[must_use]
    pub const fn as_lowercase(&self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
        }
    }

    /// Returns `true` for methods whose rendered function may send a body.
    #[must_use]
    pub const fn permits_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(Self::Get),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            _ => Err(crate::Error::ValidationError {
                field: "method".to_string(),
                reason: format!("unsupported HTTP method '{s}'"),
            }),
        }
    }
}

/// Coarse parameter type understood by the tool registry.
///
/// Arrays, objects and unknown types all collapse to [`ParamType::String`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    /// Free-form text (also used for arrays and objects)
    #[default]
    String,
    /// `integer` or `number`
    Number,
    /// `boolean`
    Boolean,
}

impl ParamType {
    /// Maps a JSON Schema `type` keyword to a coarse parameter type.
    ///
    /// # Examples
    ///
    /// ```
    /// use restgen_core::ParamType;
    ///
    /// assert_eq!(ParamType::from_schema_type(Some("number")), ParamType::Number);
    /// assert_eq!(ParamType::from_schema_type(Some("boolean")), ParamType::Boolean);
    /// assert_eq!(ParamType::from_schema_type(Some("array")), ParamType::String);
    /// assert_eq!(ParamType::from_schema_type(None), ParamType::String);
    /// ```
    #[must_use]
    pub fn from_schema_type(schema_type: Option<&str>) -> Self {
        match schema_type {
            Some("integer" | "number") => Self::Number,
            Some("boolean") => Self::Boolean,
            _ => Self::String,
        }
    }

    /// Returns the lowercase type name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
