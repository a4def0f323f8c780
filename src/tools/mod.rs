//! Invocation builders and output parsers for the external collaborators

pub mod probe;
pub mod recognize;
pub mod tag;
pub mod trim;

use std::ffi::OsString;
use std::path::Path;

/// A path as a command argument, bytes unchanged
pub(crate) fn path_arg(path: &Path) -> OsString {
    path.as_os_str().to_os_string()
}

/// Lowercased extension of `path`, if it has a UTF-8 one
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}
