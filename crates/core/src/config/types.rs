use serde::{Deserialize, Serialize};

use crate::batch::BatchConfig;
use crate::encoder::{FlacConfig, OpusConfig};
use crate::tools::ToolNames;

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub tools: ToolNames,

    #[serde(default)]
    pub batch: BatchConfig,

    #[serde(default)]
    pub flac: FlacConfig,

    #[serde(default)]
    pub opus: OpusConfig,
}
