//! Lossy encoding through the reference `opusenc` tool.

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::args;
use super::error::EncodeError;
use super::traits::Encoder;
use super::types::{EncodeJob, OpusParams};
use crate::destination::{resolve_destination, OutputExtensions};
use crate::tools::{run, run_piped, ProcessOutcome, Tool, Toolbox};

/// Extensions written by [`OpusEncoder`].
pub const OPUS_EXTENSIONS: OutputExtensions = OutputExtensions::new("opus", &["ogg"]);

/// Picks a bitrate in kbps for a channel count.
pub fn select_bitrate(channels: u32) -> u32 {
    match channels {
        1 => 96,
        2 => 192,
        7 | 8 => 480,
        _ => 320,
    }
}

/// Reads a channel count from `ffprobe` output.
///
/// Anything other than a plain decimal number (several streams, empty
/// output, overflow) counts as 0.
pub fn parse_channel_count(output: &str) -> u32 {
    let trimmed = output.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return 0;
    }
    trimmed.parse().unwrap_or(0)
}

/// Opus encoder with a streamed FFmpeg fallback.
///
/// When `opusenc` rejects an input, FFmpeg decodes it to FLAC on stdout and
/// `opusenc` reads that from stdin. Nothing touches the disk in between.
#[derive(Debug, Clone)]
pub struct OpusEncoder {
    toolbox: Toolbox,
}

impl OpusEncoder {
    /// Creates an encoder over the given tools.
    pub fn new(toolbox: Toolbox) -> Self {
        Self { toolbox }
    }

    /// Number of channels in the first audio stream of `source`.
    pub async fn probe_channels(&self, source: &Path) -> Result<u32, EncodeError> {
        let ffprobe = self.toolbox.resolve(Tool::Ffprobe)?;
        let stdout = run(&ffprobe, &args::ffprobe_channels(source))
            .await?
            .into_result(&ffprobe)?;
        Ok(parse_channel_count(&String::from_utf8_lossy(&stdout)))
    }
}

#[async_trait]
impl Encoder for OpusEncoder {
    type Params = OpusParams;

    fn name(&self) -> &str {
        "opus"
    }

    fn extensions(&self) -> OutputExtensions {
        OPUS_EXTENSIONS
    }

    async fn encode(&self, job: EncodeJob<OpusParams>) -> Result<PathBuf, EncodeError> {
        let source = job.source.as_path();
        info!("Encoding {} to Opus", source.display());

        let destination =
            resolve_destination(source, job.destination.as_deref(), self.extensions()).await?;

        let bitrate = match job.params.bitrate {
            Some(bitrate) => bitrate,
            None => {
                let channels = self.probe_channels(source).await?;
                let bitrate = select_bitrate(channels);
                debug!(
                    "{} has {} channels, using {} kbps",
                    source.display(),
                    channels,
                    bitrate
                );
                bitrate
            }
        };

        let opusenc = self.toolbox.resolve(Tool::Opusenc)?;
        let native = args::opusenc_encode(source.as_os_str(), bitrate, &destination);
        if let ProcessOutcome::Rejected { code, stderr } = run(&opusenc, &native).await? {
            warn!(
                "opusenc rejected {} (exit {:?}: {}), streaming through ffmpeg",
                source.display(),
                code,
                stderr
            );
            let ffmpeg = self.toolbox.resolve(Tool::Ffmpeg)?;
            run_piped(
                &ffmpeg,
                &args::ffmpeg_to_stdout(source),
                &opusenc,
                &args::opusenc_encode(OsStr::new("-"), bitrate, &destination),
            )
            .await?
            .into_result(&opusenc)?;
        }

        info!("Encoded {} at {} kbps", destination.display(), bitrate);
        Ok(destination)
    }
}
