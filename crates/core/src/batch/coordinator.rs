//! Fans encode jobs out over a bounded worker pool.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::error::BatchError;
use super::types::{BatchReport, BatchRequest, JobOutcome};
use crate::discovery::{discover, DiscoveryError};
use crate::encoder::{EncodeError, EncodeJob, Encoder};

type DiscoveredEntry = Result<PathBuf, DiscoveryError>;

/// Runs one encoder over a file or a directory of files.
///
/// A directory is searched with the request's patterns and every match
/// becomes one job. The search runs on a blocking thread and feeds the pool
/// as it goes. At most `threads` jobs run at once; each one spends nearly all
/// its time waiting on external processes. Outcomes are collected in the
/// order jobs finish, and the pool is always drained before returning.
pub struct BatchCoordinator<E: Encoder> {
    encoder: Arc<E>,
}

impl<E: Encoder + 'static> BatchCoordinator<E> {
    /// Creates a coordinator for `encoder`.
    pub fn new(encoder: E) -> Self {
        Self {
            encoder: Arc::new(encoder),
        }
    }

    /// Encodes everything the request selects.
    ///
    /// Failed jobs are reported in the returned [`BatchReport`] rather than
    /// as an error, and so are directory entries that could not be read. An
    /// error is returned only when the directory cannot be searched at all.
    pub async fn run(&self, request: BatchRequest<E::Params>) -> Result<BatchReport, BatchError> {
        let threads = request.pool_size()?;

        let metadata =
            tokio::fs::metadata(&request.root)
                .await
                .map_err(|_| BatchError::RootNotFound {
                    path: request.root.clone(),
                })?;

        if !metadata.is_dir() {
            info!("Encoding {} with {}", request.root.display(), self.encoder.name());
            let job = EncodeJob {
                source: request.root.clone(),
                destination: request.destination.clone(),
                params: request.params,
            };
            let result = finish(self.encoder.encode(job).await).await;
            let outcome = JobOutcome {
                source: request.root,
                result,
            };
            log_outcome(&outcome);
            return Ok(BatchReport::new(vec![outcome]));
        }

        info!(
            "Encoding {} ({}) with {} using {} workers",
            request.root.display(),
            request.patterns.join(", "),
            self.encoder.name(),
            threads
        );

        let (sender, entries) = mpsc::channel(threads);
        let root = request.root.clone();
        let patterns = request.patterns.clone();
        let recursive = request.recursive;
        let walker =
            tokio::task::spawn_blocking(move || walk(&root, &patterns, recursive, sender));

        let pooled = self.pool(entries, &request, threads).await;

        match walker.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(e.into()),
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(_) => return Err(BatchError::DiscoveryCancelled),
        }

        let report = pooled?;
        info!(
            "Batch finished: {} succeeded, {} failed, {} skipped",
            report.succeeded(),
            report.failed(),
            report.skipped().len()
        );
        Ok(report)
    }

    /// Queues every discovered entry on the pool until `entries` closes,
    /// then waits for all queued jobs.
    async fn pool(
        &self,
        mut entries: mpsc::Receiver<DiscoveredEntry>,
        request: &BatchRequest<E::Params>,
        threads: usize,
    ) -> Result<BatchReport, BatchError> {
        let semaphore = Arc::new(Semaphore::new(threads));
        let mut tasks = JoinSet::new();
        let mut skipped = Vec::new();

        while let Some(entry) = entries.recv().await {
            let source = match entry {
                Ok(source) => source,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    skipped.push(e);
                    continue;
                }
            };
            debug!("Queueing {}", source.display());

            let encoder = Arc::clone(&self.encoder);
            let semaphore = Arc::clone(&semaphore);
            let job = EncodeJob {
                source: source.clone(),
                destination: request.destination.clone(),
                params: request.params.clone(),
            };

            tasks.spawn(async move {
                // The semaphore is never closed, so this always holds a permit.
                let _permit = semaphore.acquire().await.ok();
                let result = finish(encoder.encode(job).await).await;
                JobOutcome { source, result }
            });
        }

        let mut outcomes = Vec::with_capacity(tasks.len());
        let mut cancelled = 0;
        let mut panic = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(outcome) => {
                    log_outcome(&outcome);
                    outcomes.push(outcome);
                }
                Err(e) if e.is_panic() => {
                    warn!("Encode task panicked");
                    if panic.is_none() {
                        panic = Some(e.into_panic());
                    }
                }
                Err(e) => {
                    warn!("Encode task cancelled: {}", e);
                    cancelled += 1;
                }
            }
        }

        if let Some(payload) = panic {
            std::panic::resume_unwind(payload);
        }
        if cancelled > 0 {
            return Err(BatchError::Cancelled { count: cancelled });
        }

        Ok(BatchReport::new(outcomes).with_skipped(skipped))
    }
}

/// Searches `root` and forwards every entry to the pool. Runs on a blocking
/// thread since both the walk and canonicalization hit the filesystem.
fn walk(
    root: &Path,
    patterns: &[String],
    recursive: bool,
    sender: mpsc::Sender<DiscoveredEntry>,
) -> Result<(), DiscoveryError> {
    let discovery = discover(root, patterns, recursive)?;
    debug!("Searching {}", discovery.root().display());

    for entry in discovery {
        if sender.blocking_send(entry).is_err() {
            break;
        }
    }
    Ok(())
}

/// Makes a successful destination absolute and symlink-free.
async fn finish(result: Result<PathBuf, EncodeError>) -> Result<PathBuf, EncodeError> {
    let destination = result?;
    Ok(tokio::fs::canonicalize(&destination)
        .await
        .unwrap_or(destination))
}

fn log_outcome(outcome: &JobOutcome) {
    match &outcome.result {
        Ok(destination) => debug!("{} -> {}", outcome.source.display(), destination.display()),
        Err(e) => warn!("Failed to encode {}: {}", outcome.source.display(), e),
    }
}
