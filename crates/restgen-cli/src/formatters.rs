//! Output formatters for CLI commands.
//!
//! Every command builds a serializable result and hands it to
//! [`format_output`]:
//! - `json`: pretty JSON
//! - `text`: one `path=value` line per scalar, for scripts
//! - `pretty`: indented, colorized outline for terminals

use anyhow::Result;
use colored::Colorize;
use restgen_core::cli::OutputFormat;
use serde::Serialize;
use serde_json::Value;

/// Formats data according to the specified output format.
///
/// # Errors
///
/// Returns an error if the data cannot be serialized.
///
/// # Examples
///
/// ```
/// use restgen_cli::formatters::format_output;
/// use restgen_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     services: usize,
///     tools: usize,
/// }
///
/// let summary = Summary { services: 2, tools: 14 };
///
/// let json = format_output(&summary, OutputFormat::Json)?;
/// assert!(json.contains("\"tools\": 14"));
///
/// let text = format_output(&summary, OutputFormat::Text)?;
/// assert_eq!(text, "services=2\ntools=14");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// Prints a formatted result to stdout.
///
/// # Errors
///
/// Returns an error if the data cannot be serialized.
pub fn print_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    println!("{}", format_output(data, format)?);
    Ok(())
}

/// `path=value` output.
pub mod text {
    use super::{Result, Serialize, Value};

    /// Flattens data into `path=value` lines.
    ///
    /// Object keys are joined with `.`, array positions are written as
    /// `[i]`. Strings are written unquoted.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten(&value, "", &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(value: &Value, path: &str, lines: &mut Vec<String>) {
        match value {
            Value::Object(obj) if !obj.is_empty() => {
                for (key, val) in obj {
                    let child = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{path}.{key}")
                    };
                    flatten(val, &child, lines);
                }
            }
            Value::Array(arr) if !arr.is_empty() => {
                for (i, val) in arr.iter().enumerate() {
                    flatten(val, &format!("{path}[{i}]"), lines);
                }
            }
            Value::Object(_) => lines.push(format!("{path}={{}}")),
            Value::Array(_) => lines.push(format!("{path}=[]")),
            Value::String(s) => lines.push(format!("{path}={s}")),
            other => lines.push(format!("{path}={other}")),
        }
    }
}

/// Human-readable output.
pub mod pretty {
    use super::{Colorize, Result, Serialize, Value};
    use std::fmt::Write;

    /// Formats data as an indented outline with colored values.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut out = String::new();
        match &value {
            Value::Object(_) | Value::Array(_) => write_value(&mut out, &value, 0)?,
            scalar => out.push_str(&scalar_text(scalar)),
        }
        Ok(out.trim_end().to_string())
    }

    fn write_value(out: &mut String, value: &Value, indent: usize) -> Result<()> {
        let pad = "  ".repeat(indent);
        match value {
            Value::Object(obj) => {
                for (key, val) in obj {
                    match val {
                        Value::Object(inner) if !inner.is_empty() => {
                            writeln!(out, "{pad}{}:", key.blue().bold())?;
                            write_value(out, val, indent + 1)?;
                        }
                        Value::Array(items) if !items.is_empty() => {
                            writeln!(
                                out,
                                "{pad}{} {}:",
                                key.blue().bold(),
                                format!("({})", items.len()).dimmed()
                            )?;
                            write_value(out, val, indent + 1)?;
                        }
                        scalar => {
                            writeln!(out, "{pad}{}: {}", key.blue().bold(), scalar_text(scalar))?;
                        }
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    match item {
                        Value::Object(_) | Value::Array(_) => {
                            writeln!(out, "{pad}-")?;
                            write_value(out, item, indent + 1)?;
                        }
                        scalar => writeln!(out, "{pad}- {}", scalar_text(scalar))?,
                    }
                }
            }
            scalar => writeln!(out, "{pad}{}", scalar_text(scalar))?,
        }
        Ok(())
    }

    fn scalar_text(value: &Value) -> String {
        match value {
            Value::Null => "none".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => s.green().to_string(),
            Value::Array(_) => "[]".dimmed().to_string(),
            Value::Object(_) => "{}".dimmed().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_format() {
        let output = format_output(&json!({"created": 3}), OutputFormat::Json).unwrap();
        assert_eq!(output, "{\n  \"created\": 3\n}");
    }

    #[test]
    fn test_text_format_flattens_nested_values() {
        let data = json!({
            "summary": {"totalTools": 2, "generatedAt": "2026-03-01T12:00:00Z"},
            "skipped": [{"name": "wql", "reason": "missingSchema"}],
            "failures": [],
            "note": null
        });
        let output = text::format(&data).unwrap();
        assert_eq!(
            output.lines().collect::<Vec<_>>(),
            [
                "summary.totalTools=2",
                "summary.generatedAt=2026-03-01T12:00:00Z",
                "skipped[0].name=wql",
                "skipped[0].reason=missingSchema",
                "failures=[]",
                "note=null",
            ]
        );
    }

    #[test]
    fn test_pretty_format_outline() {
        colored::control::set_override(false);
        let data = json!({
            "created": 1,
            "services": ["wql", "staffing"],
            "report": {"dryRun": true}
        });
        let output = pretty::format(&data).unwrap();
        assert_eq!(
            output,
            "created: 1\nservices (2):\n  - wql\n  - staffing\nreport:\n  dryRun: true"
        );
    }

    #[test]
    fn test_pretty_format_scalar() {
        colored::control::set_override(false);
        assert_eq!(pretty::format(&"done").unwrap(), "done");
    }
}
