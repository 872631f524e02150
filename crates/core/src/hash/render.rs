//! Text output for file digests.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt::Write;

use super::digest::FileHash;

/// How [`render_hashes`] lays out its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashRenderOptions {
    /// Append a line saying whether all digests are equal.
    pub check: bool,
    /// Markdown table instead of `<digest>  <name>` lines.
    pub table: bool,
    /// Show full paths instead of file names.
    pub fullpath: bool,
}

impl Default for HashRenderOptions {
    fn default() -> Self {
        Self {
            check: true,
            table: true,
            fullpath: false,
        }
    }
}

/// Formats digests, one file per line.
pub fn render_hashes(entries: &[FileHash], options: HashRenderOptions) -> String {
    let mut out = String::new();

    if options.table {
        out.push_str("| File | SHA-256 |\n");
        out.push_str("| --- | --- |\n");
    }
    for entry in entries {
        let name = display_name(entry, options.fullpath);
        // Writing to a String cannot fail.
        let _ = if options.table {
            writeln!(out, "| {} | {} |", name, entry.digest)
        } else {
            writeln!(out, "{}  {}", entry.digest, name)
        };
    }

    if options.check && !entries.is_empty() {
        let distinct: HashSet<&str> = entries.iter().map(|e| e.digest.as_str()).collect();
        if options.table {
            out.push('\n');
        }
        let _ = if distinct.len() == 1 {
            writeln!(out, "All {} files match", entries.len())
        } else {
            writeln!(
                out,
                "Mismatch: {} distinct hashes across {} files",
                distinct.len(),
                entries.len()
            )
        };
    }

    out
}

fn display_name(entry: &FileHash, fullpath: bool) -> Cow<'_, str> {
    if fullpath {
        return entry.path.to_string_lossy();
    }
    entry
        .path
        .file_name()
        .map(|name| name.to_string_lossy())
        .unwrap_or_else(|| entry.path.to_string_lossy())
}
