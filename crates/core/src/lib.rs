pub mod batch;
pub mod config;
pub mod destination;
pub mod discovery;
pub mod encoder;
pub mod hash;
pub mod testing;
pub mod tools;

pub use batch::{BatchConfig, BatchCoordinator, BatchError, BatchReport, BatchRequest, JobOutcome};
pub use config::{load_config, load_config_from_str, load_layered, validate_config, Config, ConfigError};
pub use destination::{resolve_destination, DestinationError, OutputExtensions};
pub use discovery::{discover, Discovery, DiscoveryError, GlobPattern};
pub use encoder::{
    EncodeError, EncodeJob, Encoder, FlacConfig, FlacEncoder, FlacParams, OpusConfig, OpusEncoder,
    OpusParams,
};
pub use hash::{file_sha256, hash_files, render_hashes, FileHash, HashError, HashRenderOptions};
pub use tools::{ProcessOutcome, Tool, ToolError, ToolHandle, ToolNames, ToolResolver, Toolbox};
