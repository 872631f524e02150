//! Testing utilities for encoder and batch tests.
//!
//! [`MockEncoder`] stands in for a codec when testing the batch layer.
//! `FakeToolbox` (unix only) installs shell scripts named after the codec
//! tools, so the real encoders can be driven end to end without any codec
//! installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use harbinger_core::testing::FakeToolbox;
//!
//! let tools = FakeToolbox::install()?;
//! let encoder = FlacEncoder::new(tools.toolbox());
//! encoder.encode(EncodeJob::new("/music/a.ac3", FlacParams::default())).await?;
//! assert_eq!(tools.calls_to("ffmpeg").len(), 1);
//! ```

#[cfg(unix)]
mod fake_tools;
mod mock_encoder;

#[cfg(unix)]
pub use fake_tools::FakeToolbox;
pub use mock_encoder::{MockEncoder, MOCK_EXTENSIONS};
