//! Shell-script stand-ins for the codec tools.

use std::fs;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::tools::{ToolNames, ToolResolver, Toolbox};

const CALL_LOG: &str = "calls.log";

/// `flac -f -<level> -V <input> -o <output>`: prefixes the input with the level.
const FLAC: &str = r#"
level="$2"
input="$4"
output="$6"
case "$input" in
  *.ac3) echo "flac: unsupported input file" >&2; exit 1 ;;
esac
{ echo "FLAC $level"; cat "$input"; } > "$output"
"#;

/// `ffmpeg ... -i <input> ... <output|->`: prefixes the input with a marker.
const FFMPEG: &str = r#"
input="$4"
for output; do :; done
if [ "$output" = "-" ]; then
  echo "INTERMEDIATE"
  cat "$input"
else
  { echo "INTERMEDIATE"; cat "$input"; } > "$output"
fi
"#;

/// `opusenc <input|-> --bitrate <kbps> <output>`: prefixes the input with the bitrate.
const OPUSENC: &str = r#"
input="$1"
bitrate="$3"
output="$4"
case "$input" in
  *.ac3) echo "opusenc: unsupported input file" >&2; exit 1 ;;
esac
if [ "$input" = "-" ]; then
  { echo "OPUS $bitrate"; cat; } > "$output"
else
  { echo "OPUS $bitrate"; cat "$input"; } > "$output"
fi
"#;

/// `ffprobe <input> ...`: prints the value of a `channels=` line in the input.
const FFPROBE: &str = r#"
sed -n 's/^channels=//p' "$1" | head -n 1
"#;

const METAFLAC: &str = "";

/// A directory of fake `flac`, `metaflac`, `opusenc`, `ffmpeg` and
/// `ffprobe` executables.
///
/// Every fake appends its argv to a shared log. The encoders reject `.ac3`
/// inputs and otherwise write a one-line header followed by the bytes they
/// were given, so outputs show which path produced them:
///
/// - native FLAC: `FLAC -8\n<source>`
/// - FLAC via intermediate: `FLAC -8\nINTERMEDIATE\n<source>`
/// - Opus via pipe: `OPUS 320\nINTERMEDIATE\n<source>`
///
/// `ffprobe` reports the number on the first `channels=N` line of the
/// source, or nothing.
#[derive(Debug)]
pub struct FakeToolbox {
    dir: TempDir,
}

impl FakeToolbox {
    /// Writes all five fakes into a fresh directory.
    pub fn install() -> io::Result<Self> {
        let dir = TempDir::new()?;
        let fake = Self { dir };
        fs::create_dir(fake.bin_dir())?;

        for (name, body) in [
            ("flac", FLAC),
            ("metaflac", METAFLAC),
            ("opusenc", OPUSENC),
            ("ffmpeg", FFMPEG),
            ("ffprobe", FFPROBE),
        ] {
            fake.write_tool(name, body)?;
        }

        Ok(fake)
    }

    /// Directory holding the executables.
    pub fn bin_dir(&self) -> PathBuf {
        self.dir.path().join("bin")
    }

    /// A toolbox that only sees the fakes.
    pub fn toolbox(&self) -> Toolbox {
        let resolver = ToolResolver::with_search_dirs(vec![self.bin_dir()]);
        Toolbox::new(Arc::new(resolver), ToolNames::default())
    }

    /// Every invocation so far as `"<tool> <args...>"`, in call order.
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.log_path())
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Invocations of one tool.
    pub fn calls_to(&self, tool: &str) -> Vec<String> {
        let prefix = format!("{tool} ");
        self.calls()
            .into_iter()
            .filter(|call| call.starts_with(&prefix) || call == tool)
            .collect()
    }

    /// Deletes a fake, so resolving it fails.
    pub fn remove(&self, tool: &str) -> io::Result<()> {
        fs::remove_file(self.bin_dir().join(tool))
    }

    /// Replaces a fake with a script that exits with `code`.
    pub fn fail(&self, tool: &str, code: i32) -> io::Result<()> {
        self.write_tool(tool, &format!("echo \"{tool}: forced failure\" >&2\nexit {code}\n"))
    }

    fn log_path(&self) -> PathBuf {
        self.dir.path().join(CALL_LOG)
    }

    fn write_tool(&self, name: &str, body: &str) -> io::Result<()> {
        let path = self.bin_dir().join(name);
        let script = format!(
            "#!/bin/sh\nset -e\necho \"{name} $*\" >> {log}\n{body}",
            log = shell_quote(&self.log_path()),
        );
        fs::write(&path, script)?;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
    }
}

fn shell_quote(path: &Path) -> String {
    format!("'{}'", path.display().to_string().replace('\'', r"'\''"))
}
