//! Blake3 checksums for change detection.
//!
//! A tool's checksum covers everything that is sent to the registry except
//! its card color. Checksums use the `"blake3:<hex>"` format.

/// Calculates the checksum of a tool's published content.
///
/// The three parts are hashed with separators, so moving text from one part
/// to another changes the checksum.
///
/// # Examples
///
/// ```
/// use restgen_publish::checksum::tool_checksum;
///
/// let a = tool_checksum("List widgets", "[]", "return 1;");
/// assert!(a.starts_with("blake3:"));
/// assert_eq!(a.len(), 71);
/// assert_eq!(a, tool_checksum("List widgets", "[]", "return 1;"));
/// assert_ne!(a, tool_checksum("List widgets", "[]", "return 2;"));
/// ```
#[must_use]
pub fn tool_checksum(description: &str, schema: &str, source: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in [description, schema, source] {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    format!("blake3:{}", hasher.finalize().to_hex())
}
