//! Output path selection.

use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use super::error::DestinationError;

/// File extensions an encoder produces.
///
/// The primary extension names derived outputs; any accepted extension marks
/// a destination argument as an explicit output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputExtensions {
    primary: &'static str,
    alternates: &'static [&'static str],
}

impl OutputExtensions {
    /// Creates an extension set.
    pub const fn new(primary: &'static str, alternates: &'static [&'static str]) -> Self {
        Self {
            primary,
            alternates,
        }
    }

    /// Extension given to derived output names.
    pub fn primary(&self) -> &'static str {
        self.primary
    }

    /// Whether `path` carries one of the accepted extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(OsStr::to_str)
            .map(|ext| ext == self.primary || self.alternates.contains(&ext))
            .unwrap_or(false)
    }
}

/// Computes the output file for `source`.
///
/// - no destination: next to the source, extension swapped;
/// - a destination with an accepted extension: used as the output file, its
///   parent directory created if missing;
/// - any other destination: used as the output directory, created if
///   missing, holding `<source stem>.<primary>`.
///
/// At most one directory level is created. Resolving the same pair again
/// yields the same path.
pub async fn resolve_destination(
    source: &Path,
    destination: Option<&Path>,
    extensions: OutputExtensions,
) -> Result<PathBuf, DestinationError> {
    let Some(destination) = destination else {
        return Ok(source.with_extension(extensions.primary()));
    };

    if extensions.accepts(destination) {
        if fs::metadata(destination)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false)
        {
            return Err(DestinationError::FileIsDirectory {
                path: destination.to_path_buf(),
            });
        }
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_directory(parent).await?;
        }
        return Ok(destination.to_path_buf());
    }

    let stem = source
        .file_stem()
        .ok_or_else(|| DestinationError::UnnamedSource {
            path: source.to_path_buf(),
        })?;

    ensure_directory(destination).await?;

    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(extensions.primary());
    Ok(destination.join(file_name))
}

/// Creates `dir` if it does not exist, without creating any ancestors.
async fn ensure_directory(dir: &Path) -> Result<(), DestinationError> {
    match fs::create_dir(dir).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            let is_dir = fs::metadata(dir).await.map(|m| m.is_dir()).unwrap_or(false);
            if is_dir {
                Ok(())
            } else {
                Err(DestinationError::NotADirectory {
                    path: dir.to_path_buf(),
                })
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Err(DestinationError::MissingParent {
            path: dir.to_path_buf(),
        }),
        Err(e) => {
            // Some platforms report a file ancestor as "not a directory".
            if dir.ancestors().skip(1).any(Path::is_file) {
                Err(DestinationError::NotADirectory {
                    path: dir.to_path_buf(),
                })
            } else {
                Err(DestinationError::DirectoryCreationFailed {
                    path: dir.to_path_buf(),
                    source: e,
                })
            }
        }
    }
}
