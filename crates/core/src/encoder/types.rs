//! Job and parameter types shared by the encoders.

use std::path::PathBuf;

/// Highest compression level the reference FLAC encoder accepts.
pub const MAX_FLAC_COMPRESSION: u8 = 8;

/// One file to encode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob<P> {
    /// Input file.
    pub source: PathBuf,
    /// Output file or directory. `None` writes next to the source.
    pub destination: Option<PathBuf>,
    /// Codec-specific settings.
    pub params: P,
}

impl<P> EncodeJob<P> {
    /// Creates a job that writes next to the source.
    pub fn new(source: impl Into<PathBuf>, params: P) -> Self {
        Self {
            source: source.into(),
            destination: None,
            params,
        }
    }

    /// Sets the destination hint.
    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }
}

/// Settings for a lossless encode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlacParams {
    /// Compression level, always within `0..=8`.
    pub compression: u8,
    /// Strip all tags when the output came from an intermediate.
    pub wipe_metadata: bool,
}

impl FlacParams {
    /// Creates parameters, clamping an out-of-range level to the maximum.
    pub fn new(compression: i64, wipe_metadata: bool) -> Self {
        Self {
            compression: effective_compression(compression),
            wipe_metadata,
        }
    }
}

impl Default for FlacParams {
    fn default() -> Self {
        Self::new(MAX_FLAC_COMPRESSION.into(), true)
    }
}

/// Maps a requested compression level to one the encoder accepts.
///
/// Anything outside `0..=8` becomes 8.
pub fn effective_compression(level: i64) -> u8 {
    match u8::try_from(level) {
        Ok(level) if level <= MAX_FLAC_COMPRESSION => level,
        _ => MAX_FLAC_COMPRESSION,
    }
}

/// Settings for a lossy encode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpusParams {
    /// Bitrate in kbps. `None` picks one from the channel count.
    pub bitrate: Option<u32>,
}
