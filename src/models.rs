use std::path::PathBuf;

use crate::error::ProcessError;

/// Artist and title returned by the recognition tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizedData {
    pub artist: String,
    pub title: String,
}

/// Outcome of running the pipeline over one file
#[derive(Debug, Clone)]
pub struct FileResult {
    pub file_path: PathBuf,
    pub recognized: Option<RecognizedData>,
    pub tagged: bool,
    pub error: Option<ProcessError>,
}

impl FileResult {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Options for a batch run
#[derive(Debug, Clone, Copy)]
pub struct BatchOptions {
    /// Recognize only, leave tags untouched
    pub dry_run: bool,
    /// Files processed at the same time
    pub concurrency: usize,
}
