use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::ProcessorConfig;
use crate::tools::extension_of;

/// Expand the given paths into the files to process.
///
/// Files are passed through as given so unsupported ones get reported by
/// the pipeline. Directories are walked recursively and only files with a
/// supported extension are kept, sorted.
pub fn collect_audio_files(paths: &[PathBuf], config: &ProcessorConfig) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found = scan_directory(path, config)?;
            found.sort();
            files.extend(found);
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(format!("path does not exist: {}", path.display()));
        }
    }

    Ok(files)
}

fn scan_directory(dir: &Path, config: &ProcessorConfig) -> Result<Vec<PathBuf>, String> {
    let mut audio_files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry
            .map_err(|e| format!("failed to read directory {}: {}", dir.display(), e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let supported = extension_of(entry.path())
            .map(|ext| config.is_supported_extension(&ext))
            .unwrap_or(false);
        if supported {
            audio_files.push(entry.into_path());
        }
    }

    Ok(audio_files)
}
