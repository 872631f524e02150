//! Error types for the tools module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or running an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The tool could not be located on the search path.
    #[error("Executable not found on search path: {name}")]
    ExecutableNotFound { name: String },

    /// The tool ran but exited unsuccessfully.
    #[error("{tool} exited with code {code:?}: {stderr}")]
    ExternalProcessFailure {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    /// The tool could not be started.
    #[error("Failed to spawn {path}")]
    SpawnFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A pipe between two processes could not be set up.
    #[error("Failed to connect {producer} to {consumer}")]
    PipeFailed {
        producer: String,
        consumer: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O error while talking to a running process.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Creates a process failure error.
    pub fn process_failure(tool: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::ExternalProcessFailure {
            tool: tool.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Whether this error means a required tool is missing.
    pub fn is_missing_executable(&self) -> bool {
        matches!(self, Self::ExecutableNotFound { .. })
    }
}
