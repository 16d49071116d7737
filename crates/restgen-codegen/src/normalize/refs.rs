//! Internal `$ref` resolution.

use serde_json::Value;

/// Maximum number of `$ref` hops followed before giving up.
pub const MAX_REF_DEPTH: usize = 16;

/// Follows `$ref` chains starting at `value`.
///
/// Only internal references (`#/...`) are supported. Returns `None` for
/// external, dangling or cyclic references.
pub fn resolve<'a>(document: &'a Value, value: &'a Value) -> Option<&'a Value> {
    let mut current = value;
    for _ in 0..=MAX_REF_DEPTH {
        match current.get("$ref") {
            None => return Some(current),
            Some(reference) => {
                let pointer = reference.as_str()?.strip_prefix('#')?;
                if !pointer.is_empty() && !pointer.starts_with('/') {
                    return None;
                }
                current = document.pointer(pointer)?;
            }
        }
    }
    tracing::debug!("Giving up on $ref chain longer than {MAX_REF_DEPTH}");
    None
}
