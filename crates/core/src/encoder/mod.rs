//! Encoders driving the external codec tools.
//!
//! Each encoder first hands the source to the codec's own command-line
//! encoder. Inputs that encoder cannot read are decoded by FFmpeg into a
//! FLAC intermediate first:
//!
//! - [`FlacEncoder`] writes the intermediate to a scratch directory and
//!   strips copied tags afterwards;
//! - [`OpusEncoder`] streams it over a pipe, and picks a bitrate from the
//!   channel count unless one is given.

mod args;
mod config;
mod error;
mod flac;
mod opus;
mod traits;
mod types;

pub use config::{FlacConfig, OpusConfig};
pub use error::EncodeError;
pub use flac::{FlacEncoder, FLAC_EXTENSIONS};
pub use opus::{parse_channel_count, select_bitrate, OpusEncoder, OPUS_EXTENSIONS};
pub use traits::Encoder;
pub use types::{effective_compression, EncodeJob, FlacParams, OpusParams, MAX_FLAC_COMPRESSION};
