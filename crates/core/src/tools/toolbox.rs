//! The set of external programs available to the encoders.

use std::fmt;
use std::sync::Arc;

use super::config::ToolNames;
use super::error::ToolError;
use super::resolver::{ToolHandle, ToolResolver};

/// External programs the encoders may invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Flac,
    Metaflac,
    Opusenc,
    Ffmpeg,
    Ffprobe,
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tool::Flac => "flac",
            Tool::Metaflac => "metaflac",
            Tool::Opusenc => "opusenc",
            Tool::Ffmpeg => "ffmpeg",
            Tool::Ffprobe => "ffprobe",
        };
        f.write_str(name)
    }
}

/// Resolver plus the configured name of every tool.
///
/// Tools are resolved at the point of use, so a missing program surfaces
/// from the job that first needs it.
#[derive(Debug, Clone)]
pub struct Toolbox {
    resolver: Arc<ToolResolver>,
    names: ToolNames,
}

impl Toolbox {
    /// Creates a toolbox from a resolver and tool names.
    pub fn new(resolver: Arc<ToolResolver>, names: ToolNames) -> Self {
        Self { resolver, names }
    }

    /// Default tool names resolved against `PATH`.
    pub fn system() -> Self {
        Self::new(ToolResolver::system(), ToolNames::default())
    }

    /// Replaces the tool names.
    pub fn with_names(mut self, names: ToolNames) -> Self {
        self.names = names;
        self
    }

    /// Resolves one tool.
    pub fn resolve(&self, tool: Tool) -> Result<ToolHandle, ToolError> {
        let name = match tool {
            Tool::Flac => &self.names.flac,
            Tool::Metaflac => &self.names.metaflac,
            Tool::Opusenc => &self.names.opusenc,
            Tool::Ffmpeg => &self.names.ffmpeg,
            Tool::Ffprobe => &self.names.ffprobe,
        };
        self.resolver.resolve(name)
    }
}
