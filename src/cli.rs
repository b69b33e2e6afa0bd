//! Command-line interface definitions for mp3dedup.
//!
//! Global options (verbosity, color, config file) plus two subcommands that
//! replace the old dialog sequence: `scan` lists duplicates, `move` scans and
//! then relocates them.
//!
//! # Example
//!
//! ```bash
//! # List duplicate MP3s
//! mp3dedup scan ~/Music
//!
//! # Machine-readable listing
//! mp3dedup scan ~/Music --output json
//!
//! # Move duplicates into a review folder, renaming on name clashes
//! mp3dedup move ~/Music --to ~/Music-duplicates --on-collision rename
//!
//! # See what would move without touching anything
//! mp3dedup -v move ~/Music --to ~/review --dry-run
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::actions::CollisionPolicy;

/// Find byte-identical duplicate MP3 files and move them to a review folder.
#[derive(Debug, Parser)]
#[command(name = "mp3dedup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory and list duplicate MP3 files
    Scan(ScanArgs),
    /// Scan a directory and move duplicates into a review folder
    Move(MoveArgs),
}

/// Arguments shared by every command that scans.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory to scan for duplicate MP3 files
    #[arg(value_name = "DIR")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Skip files that cannot be read instead of aborting the scan
    #[arg(long)]
    pub skip_unreadable: bool,

    /// Follow symbolic links during scan
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (starting with .)
    #[arg(long)]
    pub skip_hidden: bool,
}

/// Arguments for the move subcommand.
#[derive(Debug, Args)]
pub struct MoveArgs {
    #[command(flatten)]
    pub scan: ScanArgs,

    /// Review folder to move duplicates into (created if missing)
    #[arg(long = "to", value_name = "DEST")]
    pub destination: PathBuf,

    /// What to do when DEST already has a file with the same name
    #[arg(long, value_enum, value_name = "POLICY")]
    pub on_collision: Option<CollisionArg>,

    /// Show what would be moved without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first file that fails to move
    #[arg(long)]
    pub stop_on_error: bool,
}

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable listing
    Text,
    /// JSON for scripting
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Collision policy as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionArg {
    /// Report the clash and leave the file where it is
    Error,
    /// Move under a numbered name such as "song (1).mp3"
    Rename,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Error => CollisionPolicy::Error,
            CollisionArg::Rename => CollisionPolicy::Rename,
        }
    }
}
