//! Error types for the song processing pipeline
//!
//! `ProcessError` is what callers see. The diagnostic enums below it are
//! only ever logged at stage boundaries.

use std::path::PathBuf;
use thiserror::Error;

/// Coarse, per-file failure kinds returned by `SongProcessor` stages
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ProcessError {
    /// File extension is not in the configured allow-list
    #[error("unsupported audio format")]
    UnsupportedFormat,

    /// Trimming the analysis window failed
    #[error("failed to prepare audio for recognition")]
    PreprocessFailure,

    /// Recognize was called before a required Preprocess
    #[error("audio has not been preprocessed")]
    NotPreprocessed,

    /// The recognition tool failed or found no match
    #[error("song could not be recognized")]
    RecognitionFailure,

    /// WriteMetadata was called without recognized data
    #[error("no recognized metadata available")]
    NoMetadataAvailable,

    /// The tag writer failed
    #[error("failed to write metadata tags")]
    TaggingFailure,
}

/// Failure of a single external command
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Underlying reason a stage failed, logged but never returned
#[derive(Debug, Error)]
pub(crate) enum StageFailure {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("trimmed file was not created: {0}")]
    MissingOutput(PathBuf),

    #[error("could not read duration from probe output {0:?}")]
    UnreadableDuration(String),

    #[error("trimmed audio is {actual:.2}s, expected at least {expected}s")]
    TooShort { expected: u32, actual: f64 },

    #[error("recognition payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("recognition payload is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("recognition returned no track")]
    NoMatch,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
