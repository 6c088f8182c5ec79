//! MIME type detection based on file extensions.

use std::path::Path;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_HTML: &str = "text/html";

/// Guesses the content type from the extension of `path`.
///
/// Paths without a recognised extension (directories, `Makefile`, ...) fall
/// back to `text/plain`.
pub fn guess(path: impl AsRef<Path>) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| TEXT_PLAIN.to_string())
}
