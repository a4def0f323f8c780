//! Recognition tool contract
//!
//! The tool's stdout is captured as base64 (`Capture::Base64`) so
//! non-ASCII titles survive the capture channel untouched. The payload is
//! decoded here before being parsed as JSON.

use base64::prelude::*;
use serde::Deserialize;
use std::path::Path;

use super::path_arg;
use crate::error::StageFailure;
use crate::models::RecognizedData;
use crate::runner::{Capture, Invocation};

#[derive(Debug, Deserialize)]
struct RecognitionResponse {
    track: Option<RecognizedTrack>,
}

#[derive(Debug, Deserialize)]
struct RecognizedTrack {
    title: String,
    subtitle: String,
}

pub fn recognize_invocation(recognizer: &str, file: &Path) -> Invocation {
    Invocation::new(
        recognizer,
        vec!["audio-file-to-recognized-song".into(), path_arg(file)],
    )
    .with_capture(Capture::Base64)
}

/// Decode and parse a base64 recognition payload
pub(crate) fn parse_payload(payload: &str) -> Result<RecognizedData, StageFailure> {
    let compact: String = payload.split_whitespace().collect();
    let bytes = BASE64_STANDARD.decode(compact.as_bytes())?;
    let response: RecognitionResponse = serde_json::from_slice(&bytes)?;
    let track = response.track.ok_or(StageFailure::NoMatch)?;
    Ok(RecognizedData {
        artist: track.subtitle,
        title: track.title,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(json: &str) -> String {
        BASE64_STANDARD.encode(json.as_bytes())
    }

    #[test]
    fn test_parse_track() {
        let payload = encode(
            r#"{"matches":[{"id":"1"}],"track":{"title":"Imagine","subtitle":"John Lennon","key":"123"}}"#,
        );
        let data = parse_payload(&payload).unwrap();
        assert_eq!(data.artist, "John Lennon");
        assert_eq!(data.title, "Imagine");
    }

    #[test]
    fn test_non_ascii_and_wrapped_payload() {
        let mut payload = encode(r#"{"track":{"title":"Fête","subtitle":"Björk"}}"#);
        payload.insert(8, '\n');
        payload.push('\n');
        let data = parse_payload(&payload).unwrap();
        assert_eq!(data.artist, "Björk");
        assert_eq!(data.title, "Fête");
    }

    #[test]
    fn test_missing_track_is_no_match() {
        let payload = encode(r#"{"matches":[],"timestamp":1700000000}"#);
        assert!(matches!(parse_payload(&payload), Err(StageFailure::NoMatch)));
    }

    #[test]
    fn test_bad_encoding_and_json() {
        assert!(matches!(parse_payload("%%%"), Err(StageFailure::Decode(_))));
        assert!(matches!(
            parse_payload(&encode("not json")),
            Err(StageFailure::Parse(_))
        ));
        assert!(matches!(
            parse_payload(&encode(r#"{"track":{"title":"Imagine"}}"#)),
            Err(StageFailure::Parse(_))
        ));
    }

    #[test]
    fn test_invocation_requests_base64_capture() {
        let inv = recognize_invocation("songrec", Path::new("/tmp/clip.mp3"));
        assert_eq!(inv.capture, Capture::Base64);
        assert_eq!(
            inv.args,
            vec!["audio-file-to-recognized-song", "/tmp/clip.mp3"]
        );
    }
}
