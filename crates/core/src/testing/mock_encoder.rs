//! Mock encoder for testing.

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::destination::{resolve_destination, OutputExtensions};
use crate::encoder::{EncodeError, EncodeJob, Encoder};
use crate::tools::ToolError;

/// Extensions written by [`MockEncoder`].
pub const MOCK_EXTENSIONS: OutputExtensions = OutputExtensions::new("mock", &[]);

/// Mock implementation of the Encoder trait.
///
/// Provides controllable behavior for testing:
/// - Track submitted jobs for assertions
/// - Fail selected files by name
/// - Panic on selected files by name
/// - Hold each job for a fixed delay
/// - Report the highest number of jobs that ran at once
///
/// Successful jobs write `<stem>.mock` according to the usual destination
/// rules, containing the source path.
///
/// # Example
///
/// ```rust,ignore
/// use harbinger_core::testing::MockEncoder;
///
/// let encoder = MockEncoder::new();
/// encoder.fail_for("broken.wav").await;
/// encoder.set_delay(Duration::from_millis(20)).await;
///
/// let report = BatchCoordinator::new(encoder.clone()).run(request).await?;
/// assert_eq!(encoder.job_count().await, 3);
/// ```
#[derive(Debug, Clone)]
pub struct MockEncoder {
    /// Submitted jobs, in start order.
    jobs: Arc<RwLock<Vec<EncodeJob<()>>>>,
    /// File names that fail.
    failing: Arc<RwLock<HashSet<String>>>,
    /// File names that panic as soon as their job starts.
    panicking: Arc<RwLock<HashSet<String>>>,
    /// Time each job takes.
    delay: Arc<RwLock<Duration>>,
    active: Arc<AtomicUsize>,
    peak: Arc<AtomicUsize>,
}

impl Default for MockEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEncoder {
    /// Create a new mock encoder.
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(RwLock::new(Vec::new())),
            failing: Arc::new(RwLock::new(HashSet::new())),
            panicking: Arc::new(RwLock::new(HashSet::new())),
            delay: Arc::new(RwLock::new(Duration::ZERO)),
            active: Arc::new(AtomicUsize::new(0)),
            peak: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get all recorded jobs.
    pub async fn recorded_jobs(&self) -> Vec<EncodeJob<()>> {
        self.jobs.read().await.clone()
    }

    /// Get the number of jobs started.
    pub async fn job_count(&self) -> usize {
        self.jobs.read().await.len()
    }

    /// Make jobs whose source file name is `name` fail.
    pub async fn fail_for(&self, name: impl Into<String>) {
        self.failing.write().await.insert(name.into());
    }

    /// Make jobs whose source file name is `name` panic.
    pub async fn panic_for(&self, name: impl Into<String>) {
        self.panicking.write().await.insert(name.into());
    }

    /// Set how long each job takes.
    pub async fn set_delay(&self, delay: Duration) {
        *self.delay.write().await = delay;
    }

    /// Highest number of jobs observed running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn process(&self, job: EncodeJob<()>) -> Result<PathBuf, EncodeError> {
        self.jobs.write().await.push(job.clone());

        let name = job
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.panicking.read().await.contains(&name) {
            panic!("mock encoder panicked on {name}");
        }

        let delay = *self.delay.read().await;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        if self.failing.read().await.contains(&name) {
            return Err(ToolError::process_failure("mock", Some(1), format!("refused {name}")).into());
        }

        let destination =
            resolve_destination(&job.source, job.destination.as_deref(), self.extensions()).await?;
        tokio::fs::write(&destination, job.source.to_string_lossy().as_bytes())
            .await
            .map_err(ToolError::from)?;
        Ok(destination)
    }
}

#[async_trait]
impl Encoder for MockEncoder {
    type Params = ();

    fn name(&self) -> &str {
        "mock"
    }

    fn extensions(&self) -> OutputExtensions {
        MOCK_EXTENSIONS
    }

    async fn encode(&self, job: EncodeJob<()>) -> Result<PathBuf, EncodeError> {
        let running = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        let result = self.process(job).await;

        self.active.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
