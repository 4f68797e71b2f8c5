//! File-name verification for CLI-provided directory and manifest names.

use crate::error::{Error, Result};

/// Characters forbidden in directory/manifest names taken from the CLI.
const FORBIDDEN: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '\0'];

/// Verify that a user-supplied name is a plain file name.
///
/// Names are resolved against the updates root, so anything that could
/// escape it (separators, `.`/`..`) or that common filesystems reject is
/// refused. Returns the name unchanged on success.
pub fn verify_file_name(name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(Error::invalid_file_name(name, "empty name"));
    }

    if name == "." || name == ".." {
        return Err(Error::invalid_file_name(name, "relative path component"));
    }

    if let Some(bad) = name.chars().find(|c| FORBIDDEN.contains(c)) {
        return Err(Error::invalid_file_name(
            name,
            format!("forbidden character {:?}", bad),
        ));
    }

    if name.len() > 255 {
        return Err(Error::invalid_file_name(
            name,
            format!("name too long: {} bytes (max 255)", name.len()),
        ));
    }

    Ok(name)
}
