//! Configuration for batch runs.

use serde::{Deserialize, Serialize};

/// Worker pool and traversal defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Concurrent jobs. Unset uses the number of logical CPUs.
    #[serde(default)]
    pub threads: Option<usize>,

    /// Descend into subdirectories.
    #[serde(default)]
    pub recursive: bool,
}

impl BatchConfig {
    /// Effective pool size.
    pub fn pool_size(&self) -> usize {
        self.threads.unwrap_or_else(default_pool_size)
    }
}

/// One worker per logical CPU.
pub fn default_pool_size() -> usize {
    num_cpus::get().max(1)
}
