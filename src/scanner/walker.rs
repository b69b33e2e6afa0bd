//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and yielding every `.mp3` file in it. The walk is single-threaded
//! and sorts entries by file name within each directory, so repeated runs
//! over an unchanged tree visit files in the same order.
//!
//! # Features
//!
//! - Recursive traversal into subdirectories
//! - Case-insensitive `.mp3` filtering
//! - Optional symlink following with loop detection
//! - Hidden file filtering
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use mp3dedup::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Music"), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(path) => println!("{}", path.display()),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use walkdir::{DirEntry, WalkDir};

use super::{is_target_file, ScanError, WalkerConfig};

/// Directory walker for MP3 discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root directory of this walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn is_hidden(entry: &DirEntry) -> bool {
        entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
    }

    /// Walk the directory tree, yielding paths of `.mp3` files.
    ///
    /// Errors for unreadable directories are yielded as [`ScanError`]
    /// values rather than stopping iteration. A root that does not exist
    /// yields nothing.
    pub fn walk(&self) -> impl Iterator<Item = Result<PathBuf, ScanError>> + '_ {
        let skip_hidden = self.config.skip_hidden;

        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(move |entry| !(skip_hidden && Self::is_hidden(entry)))
            .take_while(move |_| {
                if self.is_shutdown_requested() {
                    log::debug!("Walker: Shutdown requested, stopping iteration");
                    false
                } else {
                    true
                }
            })
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        return None;
                    }
                    let path = entry.into_path();
                    if is_target_file(&path) {
                        Some(Ok(path))
                    } else {
                        log::trace!("Skipping non-mp3 file: {}", path.display());
                        None
                    }
                }
                Err(e) => self.handle_walk_error(e),
            })
    }

    /// Convert a walkdir error, dropping the "root does not exist" case.
    fn handle_walk_error(&self, err: walkdir::Error) -> Option<Result<PathBuf, ScanError>> {
        let path = err
            .path()
            .map_or_else(|| self.root.clone(), Path::to_path_buf);

        if let Some(ancestor) = err.loop_ancestor() {
            log::warn!(
                "Symlink loop: {} points to {}",
                path.display(),
                ancestor.display()
            );
            return Some(Err(ScanError::SymlinkLoop(path)));
        }

        let depth = err.depth();
        let Some(io_err) = err.into_io_error() else {
            return Some(Err(ScanError::Io {
                path,
                source: std::io::Error::other("directory walk failed"),
            }));
        };

        match io_err.kind() {
            std::io::ErrorKind::NotFound if depth == 0 => {
                log::debug!(
                    "Scan root does not exist, treating as empty: {}",
                    self.root.display()
                );
                None
            }
            std::io::ErrorKind::PermissionDenied => {
                log::warn!("Permission denied: {}", path.display());
                Some(Err(ScanError::PermissionDenied(path)))
            }
            _ => {
                log::warn!("I/O error for {}: {}", path.display(), io_err);
                Some(Err(ScanError::Io {
                    path,
                    source: io_err,
                }))
            }
        }
    }
}
