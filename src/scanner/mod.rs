//! Scanner module for directory traversal and file fingerprinting.
//!
//! This module provides functionality for:
//! - Recursive directory walking using walkdir
//! - Filtering to `.mp3` files (case-insensitive)
//! - Content fingerprinting with MD5
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: Streaming MD5 fingerprints
//!
//! # Example
//!
//! ```no_run
//! use mp3dedup::scanner::{Hasher, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/music"), WalkerConfig::default());
//! let hasher = Hasher::new();
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => {
//!             let fp = hasher.fingerprint(&path).unwrap();
//!             println!("{fp}  {}", path.display());
//!         }
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};

pub use hasher::{Fingerprint, Hasher, CHUNK_SIZE};
pub use walker::Walker;

/// File extension the scanner looks for, without the leading dot.
pub const TARGET_EXTENSION: &str = "mp3";

/// Check whether a path names a file the scanner should fingerprint.
///
/// Matches when the file name ends in `.mp3`, ignoring ASCII case.
/// `song.MP3` matches, `song.mp3.txt` does not.
#[must_use]
pub fn is_target_file(path: &Path) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    let name = name.to_string_lossy();
    let suffix_len = TARGET_EXTENSION.len() + 1;
    if name.len() < suffix_len {
        return false;
    }
    let Some(suffix) = name.get(name.len() - suffix_len..) else {
        return false;
    };
    suffix.starts_with('.') && suffix[1..].eq_ignore_ascii_case(TARGET_EXTENSION)
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// walkdir detects symlink loops and reports them as errors.
    pub follow_symlinks: bool,

    /// Skip hidden files and directories (names starting with `.`).
    pub skip_hidden: bool,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(follow_symlinks: bool, skip_hidden: bool) -> Self {
        Self {
            follow_symlinks,
            skip_hidden,
        }
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A symlink points back at one of its ancestors.
    #[error("Symlink loop detected: {0}")]
    SymlinkLoop(PathBuf),

    /// An I/O error occurred while accessing a file or directory.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::SymlinkLoop(p) | Self::Io { path: p, .. } => p,
        }
    }
}

/// Errors that can occur while fingerprinting a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Hashing stopped because shutdown was requested.
    #[error("Hashing interrupted: {0}")]
    Interrupted(PathBuf),
}

impl HashError {
    /// Classify an I/O error for the given path.
    pub(crate) fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p)
            | Self::PermissionDenied(p)
            | Self::Interrupted(p)
            | Self::Io { path: p, .. } => p,
        }
    }
}
