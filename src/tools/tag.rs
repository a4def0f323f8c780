//! Tag writer invocation (kid3-cli command language)
//!
//! kid3-cli parses each `-c` argument itself, so values still need quoting
//! for its own syntax even though no shell is involved.

use std::ffi::OsString;
use std::path::Path;

use super::path_arg;
use crate::runner::Invocation;

/// Escape a value for use inside a single-quoted kid3-cli parameter
pub fn escape_single_quoted(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if c == '\\' || c == '\'' {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Set each `(frame, value)` pair on `file` and save it
pub fn tag_invocation(tagger: &str, file: &Path, fields: &[(&str, &str)]) -> Invocation {
    let mut args: Vec<OsString> = Vec::with_capacity(fields.len() * 2 + 3);
    for (name, value) in fields {
        args.push("-c".into());
        args.push(format!("set {} '{}'", name, escape_single_quoted(value)).into());
    }
    args.push("-c".into());
    args.push("save".into());
    args.push(path_arg(file));
    Invocation::new(tagger, args)
}
