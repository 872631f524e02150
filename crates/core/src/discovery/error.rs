//! Error types for the discovery module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while expanding file patterns.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No patterns were supplied.
    #[error("At least one file pattern is required")]
    NoPatterns,

    /// A pattern could not be compiled.
    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// The root is missing or is not a directory.
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Walking the directory tree failed.
    #[error("Failed to traverse {path}")]
    Traversal {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// A matched path could not be made absolute.
    #[error("Failed to resolve {path}")]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DiscoveryError {
    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            reason: reason.into(),
        }
    }
}
