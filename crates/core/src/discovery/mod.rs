//! File discovery.
//!
//! Expands a root directory plus shell-style patterns (`*.wav`, `*.flac`)
//! into the files to encode, optionally descending into subdirectories.

mod error;
mod pattern;
mod scanner;

pub use error::DiscoveryError;
pub use pattern::GlobPattern;
pub use scanner::{discover, Discovery};
