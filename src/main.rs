use anyhow::{anyhow, bail, Result};
use clap::Parser;
use songtag_lib::config::concurrency_from_env;
use songtag_lib::processing::process_files;
use songtag_lib::{fs_scan, system_check, BatchOptions, ProcessorConfig, SystemRunner};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "songtag")]
#[command(about = "Recognize songs and write artist/title tags", long_about = None)]
struct Args {
    /// Audio files or directories to process
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Send the whole file to the recognizer instead of a trimmed window
    #[arg(long)]
    no_trim: bool,

    /// Start of the analysis window in seconds (default: SONGTAG_TRIM_START or 55)
    #[arg(long)]
    trim_start: Option<u32>,

    /// Length of the analysis window in seconds (default: SONGTAG_TRIM_LENGTH or 45)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    trim_length: Option<u32>,

    /// Directory for temporary trimmed copies
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Recognize only, don't write tags
    #[arg(long)]
    dry_run: bool,

    /// Files processed at the same time (default: SONGTAG_CONCURRENCY or CPU based)
    #[arg(short = 'j', long, value_parser = clap::value_parser!(u32).range(1..=64))]
    concurrency: Option<u32>,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let mut config = ProcessorConfig::from_env();
    if args.no_trim {
        config = config.with_trim(false);
    }
    if args.trim_start.is_some() || args.trim_length.is_some() {
        let start = args.trim_start.unwrap_or(config.trim_start);
        let length = args.trim_length.unwrap_or(config.trim_length);
        config = config.with_trim_window(start, length);
    }
    if let Some(dir) = args.scratch_dir {
        config = config.with_scratch_dir(dir);
    }

    let missing = system_check::missing_tools(&config, !args.dry_run);
    if !missing.is_empty() {
        bail!("required tools not found on PATH: {}", missing.join(", "));
    }

    if config.trim_enabled {
        std::fs::create_dir_all(&config.scratch_dir)?;
        log::debug!(
            "Trimming {}s from {}s into {}",
            config.trim_length,
            config.trim_start,
            config.scratch_dir.display()
        );
    }

    let files = fs_scan::collect_audio_files(&args.paths, &config).map_err(|e| anyhow!(e))?;
    if files.is_empty() {
        log::info!("No supported audio files found");
        return Ok(());
    }

    let options = BatchOptions {
        dry_run: args.dry_run,
        concurrency: args
            .concurrency
            .map(|n| n as usize)
            .unwrap_or_else(concurrency_from_env),
    };
    log::info!("Processing {} file(s)", files.len());

    let results = process_files(files, Arc::new(config), SystemRunner, options).await;

    let failed = results.iter().filter(|r| !r.is_success()).count();
    let tagged = results.iter().filter(|r| r.tagged).count();
    log::info!(
        "Done: {} recognized, {} tagged, {} failed",
        results.len() - failed,
        tagged,
        failed
    );

    if failed > 0 {
        bail!("{} of {} file(s) failed", failed, results.len());
    }
    Ok(())
}
