//! Configuration for the external tools.

use serde::{Deserialize, Serialize};

/// Names (or paths) of the external programs the encoders drive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolNames {
    /// Reference FLAC encoder.
    #[serde(default = "default_flac")]
    pub flac: String,

    /// FLAC tag editor used to strip metadata.
    #[serde(default = "default_metaflac")]
    pub metaflac: String,

    /// Reference Opus encoder.
    #[serde(default = "default_opusenc")]
    pub opusenc: String,

    /// Multimedia tool used to produce intermediates.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,

    /// Stream prober used for channel detection.
    #[serde(default = "default_ffprobe")]
    pub ffprobe: String,
}

fn default_flac() -> String {
    "flac".to_string()
}

fn default_metaflac() -> String {
    "metaflac".to_string()
}

fn default_opusenc() -> String {
    "opusenc".to_string()
}

fn default_ffmpeg() -> String {
    "ffmpeg".to_string()
}

fn default_ffprobe() -> String {
    "ffprobe".to_string()
}

impl Default for ToolNames {
    fn default() -> Self {
        Self {
            flac: default_flac(),
            metaflac: default_metaflac(),
            opusenc: default_opusenc(),
            ffmpeg: default_ffmpeg(),
            ffprobe: default_ffprobe(),
        }
    }
}

impl ToolNames {
    /// Iterates over `(key, name)` pairs.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("flac", self.flac.as_str()),
            ("metaflac", self.metaflac.as_str()),
            ("opusenc", self.opusenc.as_str()),
            ("ffmpeg", self.ffmpeg.as_str()),
            ("ffprobe", self.ffprobe.as_str()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let names = ToolNames::default();
        assert_eq!(names.flac, "flac");
        assert_eq!(names.metaflac, "metaflac");
        assert_eq!(names.opusenc, "opusenc");
        assert_eq!(names.ffmpeg, "ffmpeg");
        assert_eq!(names.ffprobe, "ffprobe");
    }

    #[test]
    fn test_partial_override() {
        let names: ToolNames = toml::from_str(r#"ffmpeg = "/opt/ffmpeg/bin/ffmpeg""#).unwrap();
        assert_eq!(names.ffmpeg, "/opt/ffmpeg/bin/ffmpeg");
        assert_eq!(names.flac, "flac");
    }
}
