//! Error types for the destination module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while working out where an encoded file goes.
///
/// Every variant except `DirectoryCreationFailed` is a layout conflict: the
/// requested destination clashes with what is already on disk.
#[derive(Debug, Error)]
pub enum DestinationError {
    /// An explicit output file path is an existing directory.
    #[error("Destination {path} is a directory, expected an output file path")]
    FileIsDirectory { path: PathBuf },

    /// A path that must be a directory exists as something else.
    #[error("Destination {path} exists and is not a directory")]
    NotADirectory { path: PathBuf },

    /// The directory to create has no parent on disk.
    #[error("Cannot create {path}: its parent directory does not exist")]
    MissingParent { path: PathBuf },

    /// The source path has no file stem to name the output after.
    #[error("Cannot derive an output name from {path}")]
    UnnamedSource { path: PathBuf },

    /// Creating the output directory failed for another reason.
    #[error("Failed to create directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DestinationError {
    /// Whether the destination clashes with existing filesystem entries.
    pub fn is_layout_conflict(&self) -> bool {
        !matches!(self, Self::DirectoryCreationFailed { .. })
    }
}
