//! MIME type detection utilities
//!
//! Content types are sniffed from magic numbers (via `infer`) for in-memory
//! data and looked up by extension (via `mime_guess`) for file-backed values.
//! Detection is only a fallback: an explicit or declared content type always
//! wins.

use crate::types::FileValue;

/// Content type used when nothing better is known.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Guess MIME by inspecting bytes (magic numbers)
pub fn guess_mime_from_bytes(bytes: &[u8]) -> Option<String> {
    infer::get(bytes).map(|k| k.mime_type().to_string())
}

/// Guess MIME by file path or URL (extension-based)
pub fn guess_mime_from_path_or_url(path_or_url: &str) -> Option<String> {
    mime_guess::from_path(path_or_url)
        .first_raw()
        .map(|s| s.to_string())
}

/// Determine the content type of a file value, or `None` if it cannot be told.
///
/// Opaque streams have neither bytes nor a path, so they always yield `None`.
pub fn detect_content_type(value: &FileValue) -> Option<String> {
    match value {
        FileValue::File(path) => path.to_str().and_then(guess_mime_from_path_or_url),
        FileValue::Bytes(bytes) => guess_mime_from_bytes(bytes),
        FileValue::Text(text) => guess_mime_from_bytes(text.as_bytes()),
        FileValue::Stream(_) => None,
    }
}
