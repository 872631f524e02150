//! Lossless encoding through the reference `flac` tool.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use super::args;
use super::error::EncodeError;
use super::traits::Encoder;
use super::types::{EncodeJob, FlacParams};
use crate::destination::{resolve_destination, OutputExtensions};
use crate::tools::{run, ProcessOutcome, Tool, ToolHandle, Toolbox};

/// Extensions written by [`FlacEncoder`].
pub const FLAC_EXTENSIONS: OutputExtensions = OutputExtensions::new("flac", &[]);

/// Prefix of the per-job scratch directories.
const SCRATCH_PREFIX: &str = "harbinger-";

/// FLAC encoder with an FFmpeg fallback for inputs `flac` cannot read.
///
/// The native encoder is tried first. If it rejects the input, FFmpeg
/// decodes it into a fast-compressed FLAC intermediate inside a scratch
/// directory and the native encoder is run again on that. Outputs produced
/// this way may carry tags FFmpeg copied over, so they are stripped when
/// [`FlacParams::wipe_metadata`] is set.
#[derive(Debug, Clone)]
pub struct FlacEncoder {
    toolbox: Toolbox,
}

impl FlacEncoder {
    /// Creates an encoder over the given tools.
    pub fn new(toolbox: Toolbox) -> Self {
        Self { toolbox }
    }

    /// Decodes `source` through FFmpeg, then encodes the intermediate.
    async fn encode_via_intermediate(
        &self,
        flac: &ToolHandle,
        source: &Path,
        destination: &Path,
        level: u8,
    ) -> Result<(), EncodeError> {
        let ffmpeg = self.toolbox.resolve(Tool::Ffmpeg)?;

        let scratch_error = |source: std::io::Error| EncodeError::Scratch {
            path: std::env::temp_dir(),
            source,
        };
        let scratch = tokio::task::spawn_blocking(|| {
            tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()
        })
        .await
        .map_err(|e| scratch_error(std::io::Error::other(e)))?
        .map_err(scratch_error)?;

        let mut name: OsString = source
            .file_stem()
            .map(|stem| stem.to_os_string())
            .unwrap_or_else(|| OsString::from("intermediate"));
        name.push(".flac");
        let intermediate = scratch.path().join(name);

        let result: Result<(), EncodeError> = async {
            run(&ffmpeg, &args::ffmpeg_to_file(source, &intermediate))
                .await?
                .into_result(&ffmpeg)?;
            run(flac, &args::flac_encode(level, &intermediate, destination))
                .await?
                .into_result(flac)?;
            Ok(())
        }
        .await;

        // If the blocking task never runs, dropping the directory still removes it.
        if let Ok(Err(e)) = tokio::task::spawn_blocking(move || scratch.close()).await {
            warn!("Failed to remove scratch directory: {}", e);
        }

        result
    }
}

#[async_trait]
impl Encoder for FlacEncoder {
    type Params = FlacParams;

    fn name(&self) -> &str {
        "flac"
    }

    fn extensions(&self) -> OutputExtensions {
        FLAC_EXTENSIONS
    }

    async fn encode(&self, job: EncodeJob<FlacParams>) -> Result<PathBuf, EncodeError> {
        let source = job.source.as_path();
        let level = job.params.compression;
        info!("Encoding {} to FLAC (level {})", source.display(), level);

        let destination =
            resolve_destination(source, job.destination.as_deref(), self.extensions()).await?;

        let flac = self.toolbox.resolve(Tool::Flac)?;
        let native = args::flac_encode(level, source, &destination);
        let used_fallback = match run(&flac, &native).await? {
            ProcessOutcome::Success { .. } => false,
            ProcessOutcome::Rejected { code, stderr } => {
                warn!(
                    "flac rejected {} (exit {:?}: {}), decoding through ffmpeg",
                    source.display(),
                    code,
                    stderr
                );
                self.encode_via_intermediate(&flac, source, &destination, level)
                    .await?;
                true
            }
        };

        if job.params.wipe_metadata && used_fallback {
            let metaflac = self.toolbox.resolve(Tool::Metaflac)?;
            run(&metaflac, &args::metaflac_remove_all(&destination))
                .await?
                .into_result(&metaflac)?;
        }

        info!("Encoded {}", destination.display());
        Ok(destination)
    }
}
