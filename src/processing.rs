use futures::{stream, StreamExt};
use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use crate::config::ProcessorConfig;
use crate::error::ProcessError;
use crate::models::{BatchOptions, FileResult};
use crate::processor::SongProcessor;
use crate::runner::CommandRunner;

/// Run the pipeline over every file, `options.concurrency` at a time.
/// Results come back in input order.
pub async fn process_files<R>(
    file_paths: Vec<PathBuf>,
    config: Arc<ProcessorConfig>,
    runner: R,
    options: BatchOptions,
) -> Vec<FileResult>
where
    R: CommandRunner + Clone,
{
    let total = file_paths.len();
    let completed = Arc::new(AtomicUsize::new(0));

    stream::iter(file_paths)
        .map(|file_path| {
            let config = Arc::clone(&config);
            let runner = runner.clone();
            let completed = Arc::clone(&completed);
            async move {
                let result = process_file(file_path, config, runner, options.dry_run).await;
                let finished = completed.fetch_add(1, Ordering::SeqCst) + 1;
                match (&result.error, &result.recognized) {
                    (None, Some(data)) => log::info!(
                        "[{}/{}] {}: {} - {}",
                        finished,
                        total,
                        result.file_path.display(),
                        data.artist,
                        data.title
                    ),
                    (Some(error), _) => log::info!(
                        "[{}/{}] {}: {}",
                        finished,
                        total,
                        result.file_path.display(),
                        error
                    ),
                    (None, None) => {}
                }
                result
            }
        })
        .buffered(options.concurrency.max(1))
        .collect()
        .await
}

/// Preprocess, recognize and (unless `dry_run`) tag one file.
/// Cleanup always runs, whichever stage failed.
pub async fn process_file<R: CommandRunner>(
    file_path: PathBuf,
    config: Arc<ProcessorConfig>,
    runner: R,
    dry_run: bool,
) -> FileResult {
    let mut processor = SongProcessor::with_runner(file_path.clone(), config, runner);
    let outcome = run_stages(&mut processor, dry_run).await;
    processor.cleanup().await;

    let recognized = processor.recognized().cloned();
    match outcome {
        Ok(tagged) => FileResult {
            file_path,
            recognized,
            tagged,
            error: None,
        },
        Err(error) => FileResult {
            file_path,
            recognized,
            tagged: false,
            error: Some(error),
        },
    }
}

async fn run_stages<R: CommandRunner>(
    processor: &mut SongProcessor<R>,
    dry_run: bool,
) -> Result<bool, ProcessError> {
    processor.preprocess().await?;
    processor.recognize().await?;
    if dry_run {
        return Ok(false);
    }
    processor.write_metadata().await?;
    Ok(true)
}
