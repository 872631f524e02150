//! Command-line arguments.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

/// Concurrent FLAC and Opus encoding on top of the reference codec tools
#[derive(Parser, Debug)]
#[command(
    name = "harbinger",
    version,
    about = "Concurrent FLAC and Opus encoding on top of the reference codec tools",
    after_help = "EXAMPLES:\n    \
        harbinger flac ~/rips/album --compression 5\n    \
        harbinger opus ~/rips/album ~/encoded --glob '*.flac' --threads 4\n    \
        harbinger opus movie.ac3 movie.ogg --bitrate 256\n    \
        harbinger hash a.flac b.flac --no-table"
)]
pub struct Cli {
    /// Configuration file (defaults to $HARBINGER_CONFIG, then ./harbinger.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode to Opus, picking a bitrate from the channel count
    Opus(OpusArgs),

    /// Encode to FLAC with the reference encoder
    Flac(FlacArgs),

    /// Print SHA-256 digests of files
    Hash(HashArgs),
}

/// Source selection shared by the encoders.
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Source file or directory
    #[arg(value_name = "SRC")]
    pub src: PathBuf,

    /// Output file or directory
    #[arg(value_name = "DST")]
    pub dst: Option<PathBuf>,

    /// File pattern to pick up in directory mode (repeatable)
    #[arg(long = "glob", value_name = "PATTERN", action = ArgAction::Append)]
    pub glob: Vec<String>,

    /// Search subdirectories of SRC too
    #[arg(short, long)]
    pub recursive: bool,

    /// Concurrent encodes (defaults to the number of logical CPUs)
    #[arg(short = 't', long, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Args, Debug)]
pub struct OpusArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Bitrate in kbps (overrides automatic selection)
    #[arg(short, long, value_name = "KBPS")]
    pub bitrate: Option<u32>,
}

#[derive(Args, Debug)]
pub struct FlacArgs {
    #[command(flatten)]
    pub batch: BatchArgs,

    /// Compression level, 0-8 (anything else means 8)
    #[arg(short, long, value_name = "LEVEL", allow_negative_numbers = true)]
    pub compression: Option<i64>,

    /// Keep tags on files that went through FFmpeg
    #[arg(long)]
    pub no_wipe_metadata: bool,
}

#[derive(Args, Debug)]
pub struct HashArgs {
    /// Files to hash
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Skip the "all files match" line
    #[arg(long)]
    pub no_check: bool,

    /// Print `<digest>  <name>` lines instead of a table
    #[arg(long)]
    pub no_table: bool,

    /// Show full paths instead of file names
    #[arg(long)]
    pub fullpath: bool,
}
