use std::path::Path;

use super::path_arg;
use crate::runner::Invocation;

/// Cut `length` seconds starting at `start` out of `source` into
/// `destination`, copying the audio stream without re-encoding.
///
/// `-n` refuses to overwrite an existing destination.
pub fn trim_invocation(
    ffmpeg: &str,
    source: &Path,
    destination: &Path,
    start: u32,
    length: u32,
) -> Invocation {
    let args = vec![
        "-hide_banner".into(),
        "-loglevel".into(),
        "error".into(),
        "-nostdin".into(),
        "-n".into(),
        "-ss".into(),
        start.to_string().into(),
        "-t".into(),
        length.to_string().into(),
        "-i".into(),
        path_arg(source),
        "-map".into(),
        "0:a".into(),
        "-c".into(),
        "copy".into(),
        path_arg(destination),
    ];
    Invocation::new(ffmpeg, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::Capture;

    #[test]
    fn test_trim_uses_stream_copy_and_window() {
        let inv = trim_invocation(
            "ffmpeg",
            Path::new("/music/it's a song.mp3"),
            Path::new("/tmp/songtag-1.mp3"),
            55,
            45,
        );
        assert_eq!(inv.program, "ffmpeg");
        assert_eq!(inv.capture, Capture::Text);

        let pos = |flag: &str| inv.args.iter().position(|a| a == flag).unwrap();
        assert_eq!(inv.args[pos("-ss") + 1], "55");
        assert_eq!(inv.args[pos("-t") + 1], "45");
        assert_eq!(inv.args[pos("-i") + 1], "/music/it's a song.mp3");
        assert_eq!(inv.args[pos("-c") + 1], "copy");
        assert_eq!(inv.args.last().unwrap(), "/tmp/songtag-1.mp3");
    }
}
