//! Error types for the encoder module.

use std::path::PathBuf;
use thiserror::Error;

use crate::destination::DestinationError;
use crate::tools::ToolError;

/// Errors that can occur while encoding a single file.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// A tool was missing, failed to start, or exited unsuccessfully.
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// The destination clashes with the filesystem.
    #[error("Invalid destination layout: {0}")]
    InvalidDestinationLayout(#[from] DestinationError),

    /// The scratch directory for an intermediate could not be created.
    #[error("Failed to create scratch directory in {path}")]
    Scratch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EncodeError {
    /// Whether a required tool is missing.
    pub fn is_missing_executable(&self) -> bool {
        matches!(self, Self::Tool(e) if e.is_missing_executable())
    }

    /// Name of the tool whose non-zero exit caused this error, if any.
    pub fn failed_tool(&self) -> Option<&str> {
        match self {
            Self::Tool(ToolError::ExternalProcessFailure { tool, .. }) => Some(tool),
            _ => None,
        }
    }
}
