//! Per-file recognition pipeline
//!
//! `SongProcessor` owns one source file and, while it exists, the trimmed
//! copy made from it. Stages are called explicitly and in order:
//! `preprocess`, `recognize`, `write_metadata`, then `cleanup`, which the
//! caller must run even after a failed stage.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::ProcessorConfig;
use crate::error::{ProcessError, StageFailure};
use crate::models::RecognizedData;
use crate::runner::{CommandRunner, SystemRunner};
use crate::tools::{self, probe, recognize, tag, trim};

/// Pipeline position of a `SongProcessor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Created,
    Preprocessed,
    Recognized,
    Tagged,
}

pub struct SongProcessor<R = SystemRunner> {
    source_path: PathBuf,
    config: Arc<ProcessorConfig>,
    runner: R,
    stage: Stage,
    temp_path: Option<PathBuf>,
    /// `temp_path` holds a trim that passed the duration check
    trimmed: bool,
    recognized: Option<RecognizedData>,
}

impl SongProcessor<SystemRunner> {
    pub fn new(source_path: impl Into<PathBuf>, config: Arc<ProcessorConfig>) -> Self {
        Self::with_runner(source_path, config, SystemRunner)
    }
}

impl<R: CommandRunner> SongProcessor<R> {
    pub fn with_runner(
        source_path: impl Into<PathBuf>,
        config: Arc<ProcessorConfig>,
        runner: R,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            config,
            runner,
            stage: Stage::Created,
            temp_path: None,
            trimmed: false,
            recognized: None,
        }
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Trimmed copy currently owned by this processor
    pub fn temp_path(&self) -> Option<&Path> {
        self.temp_path.as_deref()
    }

    pub fn recognized(&self) -> Option<&RecognizedData> {
        self.recognized.as_ref()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Check the format and, when trimming is enabled, cut the analysis
    /// window into a temporary copy.
    pub async fn preprocess(&mut self) -> Result<(), ProcessError> {
        let ext = tools::extension_of(&self.source_path)
            .filter(|ext| self.config.is_supported_extension(ext))
            .ok_or_else(|| {
                log::warn!("Unsupported audio format: {}", self.source_path.display());
                ProcessError::UnsupportedFormat
            })?;

        if !self.config.trim_enabled {
            self.stage = self.stage.max(Stage::Preprocessed);
            return Ok(());
        }

        if self.trimmed && self.temp_path.is_some() {
            return Ok(());
        }
        // Drops a copy left behind by an earlier failed attempt.
        self.cleanup().await;
        if let Some(stale) = &self.temp_path {
            log::error!(
                "Preprocessing failed for {}: previous copy {} could not be removed",
                self.source_path.display(),
                stale.display()
            );
            return Err(ProcessError::PreprocessFailure);
        }

        let temp_path = self
            .config
            .scratch_dir
            .join(format!("songtag-{}.{}", uuid::Uuid::new_v4(), ext));
        // Owned before ffmpeg runs so partial output is still cleaned up.
        self.temp_path = Some(temp_path.clone());

        log::debug!(
            "Trimming {} ({}s from {}s) to {}",
            self.source_path.display(),
            self.config.trim_length,
            self.config.trim_start,
            temp_path.display()
        );

        match self.trim_to(&temp_path).await {
            Ok(duration) => {
                log::debug!(
                    "Trimmed {} to {:.2}s",
                    self.source_path.display(),
                    duration
                );
                self.trimmed = true;
                self.stage = self.stage.max(Stage::Preprocessed);
                Ok(())
            }
            Err(failure) => {
                log::error!(
                    "Preprocessing failed for {}: {}",
                    self.source_path.display(),
                    failure
                );
                Err(ProcessError::PreprocessFailure)
            }
        }
    }

    async fn trim_to(&self, temp_path: &Path) -> Result<f64, StageFailure> {
        let tools = &self.config.tools;
        let invocation = trim::trim_invocation(
            &tools.ffmpeg,
            &self.source_path,
            temp_path,
            self.config.trim_start,
            self.config.trim_length,
        );
        self.runner.run(&invocation).await?.into_stdout(&tools.ffmpeg)?;

        if !tokio::fs::try_exists(temp_path).await? {
            return Err(StageFailure::MissingOutput(temp_path.to_path_buf()));
        }

        let invocation = probe::duration_invocation(&tools.ffprobe, temp_path);
        let stdout = self
            .runner
            .run(&invocation)
            .await?
            .into_stdout(&tools.ffprobe)?;
        let duration = probe::parse_duration(&stdout)
            .ok_or_else(|| StageFailure::UnreadableDuration(stdout.trim().to_string()))?;

        // Catches sources shorter than start + length as well as
        // trims that exit cleanly but stop early.
        if duration.ceil() < f64::from(self.config.trim_length) {
            return Err(StageFailure::TooShort {
                expected: self.config.trim_length,
                actual: duration,
            });
        }

        Ok(duration)
    }

    /// Run the recognition tool and keep its artist/title
    pub async fn recognize(&mut self) -> Result<RecognizedData, ProcessError> {
        let target = self.analysis_path()?.to_path_buf();

        log::debug!("Recognizing {}", target.display());

        match self.fetch_recognition(&target).await {
            Ok(data) => {
                log::debug!(
                    "Recognized {} as {} - {}",
                    self.source_path.display(),
                    data.artist,
                    data.title
                );
                self.recognized = Some(data.clone());
                self.stage = Stage::Recognized;
                Ok(data)
            }
            Err(failure) => {
                log::error!(
                    "Recognition failed for {}: {}",
                    self.source_path.display(),
                    failure
                );
                Err(ProcessError::RecognitionFailure)
            }
        }
    }

    async fn fetch_recognition(&self, target: &Path) -> Result<RecognizedData, StageFailure> {
        let recognizer = &self.config.tools.recognizer;
        let invocation = recognize::recognize_invocation(recognizer, target);
        let payload = self.runner.run(&invocation).await?.into_stdout(recognizer)?;
        recognize::parse_payload(&payload)
    }

    fn analysis_path(&self) -> Result<&Path, ProcessError> {
        if !self.config.trim_enabled {
            return Ok(&self.source_path);
        }
        match &self.temp_path {
            Some(path) if self.trimmed => Ok(path),
            _ => Err(ProcessError::NotPreprocessed),
        }
    }

    /// Write the recognized artist/title into the source file's tags
    pub async fn write_metadata(&mut self) -> Result<(), ProcessError> {
        let data = self
            .recognized
            .as_ref()
            .ok_or(ProcessError::NoMetadataAvailable)?;
        let tagger = &self.config.tools.tagger;

        let invocation = tag::tag_invocation(
            tagger,
            &self.source_path,
            &[("artist", data.artist.as_str()), ("title", data.title.as_str())],
        );

        let result = self
            .runner
            .run(&invocation)
            .await
            .and_then(|output| output.into_stdout(tagger));

        match result {
            Ok(_) => {
                log::debug!("Tagged {}", self.source_path.display());
                self.stage = Stage::Tagged;
                Ok(())
            }
            Err(err) => {
                log::error!(
                    "Writing tags failed for {}: {}",
                    self.source_path.display(),
                    err
                );
                Err(ProcessError::TaggingFailure)
            }
        }
    }

    /// Delete the trimmed copy if one is owned. Safe to call repeatedly.
    pub async fn cleanup(&mut self) {
        let Some(path) = self.temp_path.take() else {
            return;
        };
        self.trimmed = false;

        match tokio::fs::remove_file(&path).await {
            Ok(()) => log::debug!("Removed temporary file {}", path.display()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                log::warn!(
                    "Failed to remove temporary file {}: {}",
                    path.display(),
                    err
                );
                self.temp_path = Some(path);
            }
        }
    }
}
