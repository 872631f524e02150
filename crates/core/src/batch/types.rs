//! Request and result types for batch runs.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use super::config::default_pool_size;
use super::error::BatchError;
use crate::discovery::DiscoveryError;
use crate::encoder::EncodeError;

/// A file or directory to encode.
#[derive(Debug, Clone)]
pub struct BatchRequest<P> {
    /// A single file, or a directory to search.
    pub root: PathBuf,
    /// Output file or directory hint, shared by every job.
    pub destination: Option<PathBuf>,
    /// Glob patterns selecting files under a directory root.
    pub patterns: Vec<String>,
    /// Search subdirectories too.
    pub recursive: bool,
    /// Concurrent jobs. `None` uses the number of logical CPUs.
    pub threads: Option<usize>,
    /// Codec settings applied to every job.
    pub params: P,
}

impl<P> BatchRequest<P> {
    /// Creates a non-recursive request with no patterns.
    pub fn new(root: impl Into<PathBuf>, params: P) -> Self {
        Self {
            root: root.into(),
            destination: None,
            patterns: Vec::new(),
            recursive: false,
            threads: None,
            params,
        }
    }

    /// Sets the destination hint.
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// Sets the file patterns.
    pub fn with_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.patterns = patterns.into_iter().map(Into::into).collect();
        self
    }

    /// Sets whether to search subdirectories.
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Sets the pool size.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Validated pool size.
    pub fn pool_size(&self) -> Result<usize, BatchError> {
        match self.threads {
            Some(0) => Err(BatchError::InvalidThreads),
            Some(threads) => Ok(threads),
            None => Ok(default_pool_size()),
        }
    }
}

/// What happened to one source file.
#[derive(Debug)]
pub struct JobOutcome {
    /// Input file.
    pub source: PathBuf,
    /// Output path, or why there is none.
    pub result: Result<PathBuf, EncodeError>,
}

impl JobOutcome {
    /// Whether the job produced an output.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Output path of a successful job.
    pub fn destination(&self) -> Option<&Path> {
        self.result.as_deref().ok()
    }

    /// Error of a failed job.
    pub fn error(&self) -> Option<&EncodeError> {
        self.result.as_ref().err()
    }
}

/// Every job of a batch, in completion order, plus the directory entries
/// that could not be listed.
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<JobOutcome>,
    skipped: Vec<DiscoveryError>,
}

impl BatchReport {
    /// Wraps outcomes in completion order.
    pub fn new(outcomes: Vec<JobOutcome>) -> Self {
        Self {
            outcomes,
            skipped: Vec::new(),
        }
    }

    /// Attaches the entries discovery had to skip.
    pub fn with_skipped(mut self, skipped: Vec<DiscoveryError>) -> Self {
        self.skipped = skipped;
        self
    }

    /// All outcomes.
    pub fn outcomes(&self) -> &[JobOutcome] {
        &self.outcomes
    }

    /// Entries that were skipped because they could not be read.
    pub fn skipped(&self) -> &[DiscoveryError] {
        &self.skipped
    }

    /// Number of jobs run.
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    /// Whether no job ran.
    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Outputs of the successful jobs.
    pub fn destinations(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(JobOutcome::destination)
            .collect()
    }

    /// Failed jobs.
    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    /// Count of successful jobs.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    /// Count of failed jobs.
    pub fn failed(&self) -> usize {
        self.len() - self.succeeded()
    }

    /// Sources that were queued more than once, in first-seen order.
    pub fn duplicate_sources(&self) -> Vec<&Path> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        self.outcomes
            .iter()
            .map(|o| o.source.as_path())
            .filter(|source| !seen.insert(*source) && reported.insert(*source))
            .collect()
    }

    /// All outputs, or the first failure in completion order.
    pub fn into_destinations(self) -> Result<Vec<PathBuf>, BatchError> {
        self.outcomes
            .into_iter()
            .map(|outcome| {
                outcome.result.map_err(|error| BatchError::JobFailed {
                    file: outcome.source,
                    error,
                })
            })
            .collect()
    }
}
