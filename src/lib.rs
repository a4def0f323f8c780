//! Recognize the song in an audio file and write its artist/title tags.
//!
//! FFmpeg trims the analysis window, songrec identifies the song and
//! kid3-cli writes the tags; this crate sequences them per file.

pub mod config;
pub mod error;
pub mod fs_scan;
pub mod models;
pub mod processing;
pub mod processor;
pub mod runner;
pub mod system_check;
pub mod tools;

pub use config::{ProcessorConfig, ToolPaths};
pub use error::{ProcessError, ToolError};
pub use models::{BatchOptions, FileResult, RecognizedData};
pub use processor::{SongProcessor, Stage};
pub use runner::{Capture, CommandRunner, Invocation, SystemRunner, ToolOutput};
