//! Subcommand implementations.

use anyhow::{ensure, Context, Result};
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

use harbinger_core::{
    hash_files, render_hashes, BatchConfig, BatchCoordinator, BatchReport, BatchRequest, Config,
    Encoder, FlacEncoder, FlacParams, HashRenderOptions, OpusEncoder, OpusParams, Toolbox,
};

use crate::cli::{BatchArgs, FlacArgs, HashArgs, OpusArgs};

pub async fn opus(args: OpusArgs, config: &Config) -> Result<ExitCode> {
    let params = OpusParams {
        bitrate: args.bitrate.or(config.opus.bitrate),
    };
    let request = batch_request(args.batch, &config.opus.patterns, &config.batch, params)?;
    let encoder = OpusEncoder::new(toolbox(config));
    encode(encoder, request).await
}

pub async fn flac(args: FlacArgs, config: &Config) -> Result<ExitCode> {
    let params = FlacParams::new(
        args.compression.unwrap_or(config.flac.compression),
        config.flac.wipe_metadata && !args.no_wipe_metadata,
    );
    let request = batch_request(args.batch, &config.flac.patterns, &config.batch, params)?;
    let encoder = FlacEncoder::new(toolbox(config));
    encode(encoder, request).await
}

pub async fn hash(args: HashArgs) -> Result<ExitCode> {
    for file in &args.files {
        ensure!(file.is_file(), "Not a file: {}", file.display());
    }
    let files = args
        .files
        .iter()
        .map(|f| absolute(f))
        .collect::<Result<Vec<_>>>()?;

    let hashes = hash_files(&files).await.context("Failed to hash files")?;
    let options = HashRenderOptions {
        check: !args.no_check,
        table: !args.no_table,
        fullpath: args.fullpath,
    };

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(render_hashes(&hashes, options).as_bytes())?;
    Ok(ExitCode::SUCCESS)
}

fn toolbox(config: &Config) -> Toolbox {
    Toolbox::system().with_names(config.tools.clone())
}

/// Merges command-line arguments over configured defaults.
fn batch_request<P>(
    args: BatchArgs,
    default_patterns: &[String],
    batch: &BatchConfig,
    params: P,
) -> Result<BatchRequest<P>> {
    ensure!(args.src.exists(), "Source not found: {}", args.src.display());
    let src = std::fs::canonicalize(&args.src)
        .with_context(|| format!("Failed to resolve {}", args.src.display()))?;

    let patterns = if args.glob.is_empty() {
        default_patterns.to_vec()
    } else {
        args.glob
    };

    let mut request = BatchRequest::new(src, params)
        .with_patterns(patterns)
        .recursive(args.recursive || batch.recursive);
    if let Some(dst) = args.dst {
        request = request.with_destination(absolute(&dst)?);
    }
    if let Some(threads) = args.threads.or(batch.threads) {
        request = request.with_threads(threads);
    }
    Ok(request)
}

fn absolute(path: &Path) -> Result<PathBuf> {
    std::path::absolute(path).with_context(|| format!("Failed to resolve {}", path.display()))
}

async fn encode<E: Encoder + 'static>(
    encoder: E,
    request: BatchRequest<E::Params>,
) -> Result<ExitCode> {
    let coordinator = BatchCoordinator::new(encoder);
    let report = coordinator.run(request).await.context("Batch failed")?;
    print_report(&report)
}

fn print_report(report: &BatchReport) -> Result<ExitCode> {
    for source in report.duplicate_sources() {
        warn!(
            "{} matched more than one pattern and was encoded more than once",
            source.display()
        );
    }

    for skipped in report.skipped() {
        warn!("Skipped {}", error_chain(skipped));
    }

    let mut stdout = std::io::stdout().lock();
    for outcome in report.outcomes() {
        match &outcome.result {
            Ok(destination) => writeln!(stdout, "{}", destination.display())?,
            Err(e) => error!("{}: {}", outcome.source.display(), error_chain(e)),
        }
    }

    if report.failed() > 0 {
        error!("{} of {} files failed", report.failed(), report.len());
        return Ok(ExitCode::FAILURE);
    }
    info!("Encoded {} files", report.succeeded());
    Ok(ExitCode::SUCCESS)
}

/// Formats an error and its sources on one line.
fn error_chain(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(source) = current {
        message.push_str(": ");
        message.push_str(&source.to_string());
        current = source.source();
    }
    message
}
