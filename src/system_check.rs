use crate::config::ProcessorConfig;

/// Configured programs that cannot be found on PATH.
/// The trimmer and probe only matter when trimming is on, the tag writer
/// only when tags are written.
pub fn missing_tools(config: &ProcessorConfig, write_tags: bool) -> Vec<String> {
    let tools = &config.tools;
    let mut required = vec![&tools.recognizer];
    if config.trim_enabled {
        required.push(&tools.ffmpeg);
        required.push(&tools.ffprobe);
    }
    if write_tags {
        required.push(&tools.tagger);
    }

    required
        .into_iter()
        .filter(|program| which::which(program.as_str()).is_err())
        .cloned()
        .collect()
}
