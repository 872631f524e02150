//! Error types for the batch module.

use std::path::PathBuf;
use thiserror::Error;

use crate::discovery::DiscoveryError;
use crate::encoder::EncodeError;

/// Errors that abort or fail a batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The batch root does not exist.
    #[error("Source not found: {path}")]
    RootNotFound { path: PathBuf },

    /// A worker pool needs at least one worker.
    #[error("Thread count must be at least 1")]
    InvalidThreads,

    /// The source directory could not be searched at all. Unreadable entries
    /// found during the search are skipped instead, see
    /// [`BatchReport::skipped`](super::BatchReport::skipped).
    #[error("File discovery failed: {0}")]
    Discovery(#[from] DiscoveryError),

    /// The background directory walk stopped without finishing.
    #[error("File discovery was cancelled")]
    DiscoveryCancelled,

    /// A job failed and the caller asked for all-or-nothing results.
    #[error("Failed to encode {file}")]
    JobFailed {
        file: PathBuf,
        #[source]
        error: EncodeError,
    },

    /// Some jobs were cancelled before they finished.
    #[error("{count} encode tasks were cancelled")]
    Cancelled { count: usize },
}
