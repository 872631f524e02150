//! Error types for the hash module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while hashing files.
#[derive(Debug, Error)]
pub enum HashError {
    /// The file could not be opened or read.
    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
