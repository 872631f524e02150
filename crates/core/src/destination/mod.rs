//! Destination policy.
//!
//! Decides the output file for each encode from the source path and an
//! optional destination argument, which may name either an output file or an
//! output directory.

mod error;
mod policy;

pub use error::DestinationError;
pub use policy::{resolve_destination, OutputExtensions};
