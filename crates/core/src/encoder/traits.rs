//! Trait definitions for the encoder module.

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::PathBuf;

use super::error::EncodeError;
use super::types::EncodeJob;
use crate::destination::OutputExtensions;

/// A codec that turns one source file into one output file.
#[async_trait]
pub trait Encoder: Send + Sync {
    /// Codec-specific job settings.
    type Params: Clone + Send + Sync + Debug + 'static;

    /// Returns the name of this encoder.
    fn name(&self) -> &str;

    /// Extensions this encoder writes.
    fn extensions(&self) -> OutputExtensions;

    /// Encodes one file and returns the path written.
    async fn encode(&self, job: EncodeJob<Self::Params>) -> Result<PathBuf, EncodeError>;
}
