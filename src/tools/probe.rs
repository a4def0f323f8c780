use std::path::Path;

use super::path_arg;
use crate::runner::Invocation;

pub fn duration_invocation(ffprobe: &str, file: &Path) -> Invocation {
    Invocation::new(
        ffprobe,
        vec![
            "-v".into(),
            "error".into(),
            "-show_entries".into(),
            "format=duration".into(),
            "-of".into(),
            "default=noprint_wrappers=1:nokey=1".into(),
            path_arg(file),
        ],
    )
}

/// Seconds from the probe's stdout. `None` for `N/A`, empty or negative
/// values.
pub fn parse_duration(output: &str) -> Option<f64> {
    output
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<f64>().ok())
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
}
