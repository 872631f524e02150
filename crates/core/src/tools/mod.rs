//! External tool plumbing.
//!
//! Every codec operation is delegated to a separate program. This module
//! locates those programs on the search path and runs them, reporting a
//! non-zero exit as a [`ProcessOutcome::Rejected`] value rather than an error
//! so callers can tell "this input is not supported" apart from a real
//! failure.

mod config;
mod error;
mod process;
mod resolver;
mod toolbox;

pub use config::ToolNames;
pub use error::ToolError;
pub use process::{run, run_piped, ProcessOutcome};
pub use resolver::{ToolHandle, ToolResolver};
pub use toolbox::{Tool, Toolbox};
