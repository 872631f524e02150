//! Lazy expansion of a root directory and a set of patterns into files.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::DiscoveryError;
use super::pattern::GlobPattern;

/// Expands `root` and `patterns` into the files they match.
///
/// Patterns are applied one after another and their matches concatenated, so
/// a file matched by two patterns is yielded twice. Within a pattern, files
/// come out in directory traversal order. Directories are never yielded and
/// every path is absolute and canonical.
pub fn discover<S: AsRef<str>>(
    root: &Path,
    patterns: &[S],
    recursive: bool,
) -> Result<Discovery, DiscoveryError> {
    if patterns.is_empty() {
        return Err(DiscoveryError::NoPatterns);
    }

    let compiled = patterns
        .iter()
        .map(|p| GlobPattern::compile(p.as_ref(), recursive))
        .collect::<Result<Vec<_>, _>>()?;

    if !root.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: root.to_path_buf(),
        });
    }
    let root = std::fs::canonicalize(root).map_err(|e| DiscoveryError::Canonicalize {
        path: root.to_path_buf(),
        source: e,
    })?;

    Ok(Discovery {
        root,
        pending: compiled.into_iter(),
        current: None,
    })
}

/// Single-pass iterator over discovered files. See [`discover`].
pub struct Discovery {
    root: PathBuf,
    pending: std::vec::IntoIter<GlobPattern>,
    current: Option<(GlobPattern, walkdir::IntoIter)>,
}

impl Discovery {
    /// The canonical root being searched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Iterator for Discovery {
    type Item = Result<PathBuf, DiscoveryError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current.is_none() {
                let pattern = self.pending.next()?;
                let walker = WalkDir::new(&self.root)
                    .min_depth(1)
                    .max_depth(pattern.max_depth())
                    .into_iter();
                self.current = Some((pattern, walker));
            }

            let (pattern, walker) = self.current.as_mut()?;
            match walker.next() {
                None => {
                    self.current = None;
                }
                Some(Err(e)) => {
                    let path = e.path().unwrap_or(&self.root).to_path_buf();
                    return Some(Err(DiscoveryError::Traversal { path, source: e }));
                }
                Some(Ok(entry)) => {
                    if entry.file_type().is_dir() {
                        continue;
                    }
                    let relative = entry
                        .path()
                        .strip_prefix(&self.root)
                        .unwrap_or_else(|_| entry.path());
                    // Follows symlinks, so links to files count as files.
                    if !pattern.matches(relative) || !entry.path().is_file() {
                        continue;
                    }
                    return Some(std::fs::canonicalize(entry.path()).map_err(|e| {
                        DiscoveryError::Canonicalize {
                            path: entry.path().to_path_buf(),
                            source: e,
                        }
                    }));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, b"pcm").unwrap();
        std::fs::canonicalize(path).unwrap()
    }

    fn collect(root: &Path, patterns: &[&str], recursive: bool) -> Vec<PathBuf> {
        discover(root, patterns, recursive)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn test_non_recursive_ignores_subdirectories() {
        let temp = TempDir::new().unwrap();
        let a = touch(temp.path(), "a.wav");
        let b = touch(temp.path(), "b.flac");
        let c = touch(temp.path(), "c.wav");
        touch(temp.path(), "notes.txt");
        touch(temp.path(), "nested/d.wav");

        let found: HashSet<_> = collect(temp.path(), &["*.wav", "*.flac"], false)
            .into_iter()
            .collect();

        assert_eq!(found, HashSet::from([a, b, c]));
    }

    #[test]
    fn test_recursive_descends() {
        let temp = TempDir::new().unwrap();
        let top = touch(temp.path(), "a.wav");
        let nested = touch(temp.path(), "disc1/b.wav");
        let deeper = touch(temp.path(), "disc1/bonus/c.wav");

        let found: HashSet<_> = collect(temp.path(), &["*.wav"], true).into_iter().collect();
        assert_eq!(found, HashSet::from([top, nested, deeper]));
    }

    #[test]
    fn test_results_follow_pattern_order() {
        let temp = TempDir::new().unwrap();
        let flac = touch(temp.path(), "a.flac");
        let wav = touch(temp.path(), "b.wav");

        assert_eq!(collect(temp.path(), &["*.wav", "*.flac"], false), vec![wav.clone(), flac.clone()]);
        assert_eq!(collect(temp.path(), &["*.flac", "*.wav"], false), vec![flac, wav]);
    }

    #[test]
    fn test_overlapping_patterns_yield_duplicates() {
        let temp = TempDir::new().unwrap();
        let file = touch(temp.path(), "take.wav");

        let found = collect(temp.path(), &["*.wav", "take.*"], false);
        assert_eq!(found, vec![file.clone(), file]);
    }

    #[test]
    fn test_directories_are_excluded() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("folder.wav")).unwrap();
        let file = touch(temp.path(), "real.wav");

        assert_eq!(collect(temp.path(), &["*.wav"], false), vec![file]);
    }

    #[test]
    fn test_paths_are_absolute() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.w64");

        for path in collect(temp.path(), &["*.w64"], false) {
            assert!(path.is_absolute());
        }
    }

    #[test]
    fn test_requires_patterns() {
        let temp = TempDir::new().unwrap();
        let empty: [&str; 0] = [];
        assert!(matches!(
            discover(temp.path(), &empty, false),
            Err(DiscoveryError::NoPatterns)
        ));
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = TempDir::new().unwrap();
        let file = touch(temp.path(), "a.wav");

        assert!(matches!(
            discover(&file, &["*.wav"], false),
            Err(DiscoveryError::NotADirectory { .. })
        ));
        assert!(matches!(
            discover(&temp.path().join("missing"), &["*.wav"], false),
            Err(DiscoveryError::NotADirectory { .. })
        ));
    }

    #[test]
    fn test_discovery_is_lazy() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a.wav");
        let mut discovery = discover(temp.path(), &["*.wav"], false).unwrap();

        // Files created before the walk reaches them are still seen.
        touch(temp.path(), "b.wav");
        let mut count = 0;
        while let Some(entry) = discovery.next() {
            entry.unwrap();
            count += 1;
        }
        assert_eq!(count, 2);
    }
}
