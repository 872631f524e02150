//! Executable lookup on the system search path.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::process::Command;
use tracing::debug;

use super::error::ToolError;

static SYSTEM_RESOLVER: Lazy<Arc<ToolResolver>> = Lazy::new(|| Arc::new(ToolResolver::new()));

/// Absolute, symlink-free location of a resolved executable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolHandle {
    name: String,
    path: PathBuf,
}

impl ToolHandle {
    /// The name the tool was looked up by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical path of the executable.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Starts building a command for this tool.
    pub fn command(&self) -> Command {
        Command::new(&self.path)
    }
}

/// Resolves tool names to executables.
///
/// Successful lookups are memoized per name, so each tool is searched for at
/// most once per resolver. Failures are not cached: a tool that is missing
/// fails on every lookup until it appears.
#[derive(Debug, Default)]
pub struct ToolResolver {
    /// Directories to search. `None` reads `PATH` at lookup time.
    search_dirs: Option<Vec<PathBuf>>,
    cache: Mutex<HashMap<String, ToolHandle>>,
}

impl ToolResolver {
    /// Creates a resolver that searches `PATH`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver restricted to the given directories.
    pub fn with_search_dirs(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            search_dirs: Some(dirs.into_iter().collect()),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Process-wide resolver backed by `PATH`.
    pub fn system() -> Arc<ToolResolver> {
        Arc::clone(&SYSTEM_RESOLVER)
    }

    /// Locates `name` and returns its canonical path.
    ///
    /// Names containing a path separator are taken as paths and only
    /// checked for existence; bare names are searched for in order.
    pub fn resolve(&self, name: &str) -> Result<ToolHandle, ToolError> {
        if let Some(handle) = self.cached(name) {
            return Ok(handle);
        }

        let found = if Path::new(name).components().count() > 1 {
            executable_at(Path::new(name))
        } else {
            self.search(name)
        };

        let path = found.ok_or_else(|| ToolError::ExecutableNotFound {
            name: name.to_string(),
        })?;
        let handle = ToolHandle {
            name: name.to_string(),
            path,
        };
        debug!("Resolved {} to {}", name, handle.path.display());

        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(name.to_string(), handle.clone());

        Ok(handle)
    }

    fn cached(&self, name: &str) -> Option<ToolHandle> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(name)
            .cloned()
    }

    fn search(&self, name: &str) -> Option<PathBuf> {
        let dirs: Vec<PathBuf> = match &self.search_dirs {
            Some(dirs) => dirs.clone(),
            None => std::env::var_os("PATH")
                .map(|path| std::env::split_paths(&path).collect())
                .unwrap_or_default(),
        };

        dirs.iter()
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| candidates(dir, name))
            .find_map(|candidate| executable_at(&candidate))
    }
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut paths = vec![dir.join(name)];
    if Path::new(name).extension().is_none() {
        paths.extend(["exe", "bat", "cmd"].iter().map(|ext| dir.join(name).with_extension(ext)));
    }
    paths
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

/// Returns the canonical path if `path` is an executable file.
fn executable_at(path: &Path) -> Option<PathBuf> {
    let metadata = std::fs::metadata(path).ok()?;
    if !metadata.is_file() || !is_executable(&metadata) {
        return None;
    }
    std::fs::canonicalize(path).ok()
}

#[cfg(unix)]
fn is_executable(metadata: &std::fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &std::fs::Metadata) -> bool {
    true
}
