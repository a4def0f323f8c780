//! Processor configuration
//!
//! Built once from the environment and shared read-only by every
//! `SongProcessor`.

use std::path::PathBuf;

pub const DEFAULT_TRIM_START: u32 = 55;
pub const DEFAULT_TRIM_LENGTH: u32 = 45;
pub const DEFAULT_FORMATS: [&str; 2] = ["mp3", "m4a"];

/// Program names for the external collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Trimming tool (stream copy of a time window)
    pub ffmpeg: String,
    /// Duration probe
    pub ffprobe: String,
    /// Fingerprint recognition tool
    pub recognizer: String,
    /// Tag writer
    pub tagger: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
            recognizer: "songrec".to_string(),
            tagger: "kid3-cli".to_string(),
        }
    }
}

/// Immutable settings for one processing run
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorConfig {
    /// Where temporary trimmed copies are written
    pub scratch_dir: PathBuf,

    /// Trim to an analysis window before recognition
    pub trim_enabled: bool,

    /// Offset of the analysis window, in seconds
    pub trim_start: u32,

    /// Length of the analysis window, in seconds
    pub trim_length: u32,

    /// Lowercase extensions accepted by Preprocess
    pub supported_formats: Vec<String>,

    pub tools: ToolPaths,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            scratch_dir: std::env::temp_dir(),
            trim_enabled: true,
            trim_start: DEFAULT_TRIM_START,
            trim_length: DEFAULT_TRIM_LENGTH,
            supported_formats: DEFAULT_FORMATS.iter().map(|f| f.to_string()).collect(),
            tools: ToolPaths::default(),
        }
    }
}

impl ProcessorConfig {
    /// Read configuration from `SONGTAG_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    /// Unparsable values fall back to their defaults with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let scratch_dir = get("SONGTAG_TMP_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.scratch_dir);

        let trim_enabled = match get("SONGTAG_TRIM") {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                log::warn!("Ignoring invalid SONGTAG_TRIM value {:?}", raw);
                defaults.trim_enabled
            }),
            None => defaults.trim_enabled,
        };

        let trim_start = parse_seconds(get("SONGTAG_TRIM_START"), "SONGTAG_TRIM_START", false)
            .unwrap_or(defaults.trim_start);
        let trim_length = parse_seconds(get("SONGTAG_TRIM_LENGTH"), "SONGTAG_TRIM_LENGTH", true)
            .unwrap_or(defaults.trim_length);

        let supported_formats = get("SONGTAG_FORMATS")
            .map(|raw| {
                raw.split(',')
                    .map(|f| f.trim().trim_start_matches('.').to_ascii_lowercase())
                    .filter(|f| !f.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|formats| !formats.is_empty())
            .unwrap_or(defaults.supported_formats);

        let tools = ToolPaths {
            ffmpeg: get("SONGTAG_FFMPEG").unwrap_or(defaults.tools.ffmpeg),
            ffprobe: get("SONGTAG_FFPROBE").unwrap_or(defaults.tools.ffprobe),
            recognizer: get("SONGTAG_RECOGNIZER").unwrap_or(defaults.tools.recognizer),
            tagger: get("SONGTAG_TAGGER").unwrap_or(defaults.tools.tagger),
        };

        Self {
            scratch_dir,
            trim_enabled,
            trim_start,
            trim_length,
            supported_formats,
            tools,
        }
    }

    pub fn with_trim(mut self, enabled: bool) -> Self {
        self.trim_enabled = enabled;
        self
    }

    pub fn with_trim_window(mut self, start: u32, length: u32) -> Self {
        self.trim_start = start;
        self.trim_length = length;
        self
    }

    pub fn with_scratch_dir(mut self, dir: PathBuf) -> Self {
        self.scratch_dir = dir;
        self
    }

    pub fn with_tools(mut self, tools: ToolPaths) -> Self {
        self.tools = tools;
        self
    }

    /// Whether `ext` (any case, no leading dot) is an accepted input format
    pub fn is_supported_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.supported_formats.iter().any(|f| *f == ext)
    }
}

/// Batch concurrency from `SONGTAG_CONCURRENCY`, clamped to 1..=64.
/// Defaults to the core count clamped to 2..=8.
pub fn concurrency_from_env() -> usize {
    let cpu_cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);
    let default_concurrency = cpu_cores.clamp(2, 8);
    std::env::var("SONGTAG_CONCURRENCY")
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .map(|v| v.clamp(1, 64))
        .unwrap_or(default_concurrency)
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn parse_seconds(raw: Option<String>, key: &str, non_zero: bool) -> Option<u32> {
    let raw = raw?;
    match raw.parse::<u32>() {
        Ok(0) if non_zero => {
            log::warn!("Ignoring {}=0, a zero-length window cannot be recognized", key);
            None
        }
        Ok(seconds) => Some(seconds),
        Err(_) => {
            log::warn!("Ignoring invalid {} value {:?}", key, raw);
            None
        }
    }
}
