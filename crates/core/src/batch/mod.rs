//! Batch encoding.
//!
//! Turns a file or a directory into encode jobs and runs them on a bounded
//! pool of tokio tasks. Every job's outcome is kept, so one bad file does not
//! hide the results of the others.

mod config;
mod coordinator;
mod error;
mod types;

pub use config::{default_pool_size, BatchConfig};
pub use coordinator::BatchCoordinator;
pub use error::BatchError;
pub use types::{BatchReport, BatchRequest, JobOutcome};
