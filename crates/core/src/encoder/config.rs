//! Configuration for the encoders.

use serde::{Deserialize, Serialize};

use super::types::{FlacParams, OpusParams};

/// Defaults for `flac` runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlacConfig {
    /// Compression level (0-8). Out-of-range values encode at 8.
    #[serde(default = "default_compression")]
    pub compression: i64,

    /// Strip tags from outputs produced through an intermediate.
    #[serde(default = "default_wipe_metadata")]
    pub wipe_metadata: bool,

    /// File patterns picked up in directory mode.
    #[serde(default = "default_flac_patterns")]
    pub patterns: Vec<String>,
}

fn default_compression() -> i64 {
    8
}

fn default_wipe_metadata() -> bool {
    true
}

fn default_flac_patterns() -> Vec<String> {
    vec!["*.wav".to_string(), "*.w64".to_string()]
}

impl Default for FlacConfig {
    fn default() -> Self {
        Self {
            compression: default_compression(),
            wipe_metadata: default_wipe_metadata(),
            patterns: default_flac_patterns(),
        }
    }
}

impl FlacConfig {
    /// Encoder parameters for these settings.
    pub fn params(&self) -> FlacParams {
        FlacParams::new(self.compression, self.wipe_metadata)
    }
}

/// Defaults for `opus` runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpusConfig {
    /// Fixed bitrate in kbps. Unset picks one from the channel count.
    #[serde(default)]
    pub bitrate: Option<u32>,

    /// File patterns picked up in directory mode.
    #[serde(default = "default_opus_patterns")]
    pub patterns: Vec<String>,
}

fn default_opus_patterns() -> Vec<String> {
    vec![
        "*.flac".to_string(),
        "*.wav".to_string(),
        "*.w64".to_string(),
    ]
}

impl Default for OpusConfig {
    fn default() -> Self {
        Self {
            bitrate: None,
            patterns: default_opus_patterns(),
        }
    }
}

impl OpusConfig {
    /// Encoder parameters for these settings.
    pub fn params(&self) -> OpusParams {
        OpusParams {
            bitrate: self.bitrate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flac_defaults() {
        let config = FlacConfig::default();
        assert_eq!(config.compression, 8);
        assert!(config.wipe_metadata);
        assert_eq!(config.patterns, vec!["*.wav", "*.w64"]);
    }

    #[test]
    fn test_opus_defaults() {
        let config = OpusConfig::default();
        assert_eq!(config.bitrate, None);
        assert_eq!(config.patterns, vec!["*.flac", "*.wav", "*.w64"]);
    }

    #[test]
    fn test_flac_params_clamp_level() {
        let config: FlacConfig = toml::from_str("compression = 11").unwrap();
        assert_eq!(config.params().compression, 8);
        assert!(config.params().wipe_metadata);
    }

    #[test]
    fn test_opus_bitrate_override() {
        let config: OpusConfig = toml::from_str("bitrate = 128").unwrap();
        assert_eq!(config.params().bitrate, Some(128));
        assert_eq!(config.patterns.len(), 3);
    }
}
