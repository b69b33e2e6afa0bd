//! Moving duplicates into a review folder.
//!
//! # Overview
//!
//! This module moves files into a destination directory:
//! - The destination (and any missing parents) is created before any move
//! - Each file keeps only its base name inside the destination
//! - A file is hard-linked into place and then unlinked from its old
//!   location; across filesystems it falls back to copy, size check,
//!   then delete of the source
//! - Existing files are never overwritten (see [`CollisionPolicy`])
//! - Batches are best-effort by default: every file is attempted and
//!   per-file failures are collected
//!
//! # Example
//!
//! ```no_run
//! use mp3dedup::actions::relocate::relocate;
//! use std::path::{Path, PathBuf};
//!
//! let duplicates = vec![PathBuf::from("/music/copy of song.mp3")];
//! let result = relocate(&duplicates, Path::new("/music/_duplicates")).unwrap();
//! println!("{}", result.summary());
//! ```

use std::collections::HashSet;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;

/// Error type for relocation operations.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// The destination directory could not be created.
    #[error("cannot create destination {path}: {source}")]
    CreateDestination {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The destination exists but is not a directory.
    #[error("destination is not a directory: {0}")]
    DestinationNotDirectory(PathBuf),

    /// Source file was not found (moved or deleted since the scan).
    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    /// Source path has no file name component.
    #[error("source has no file name: {0}")]
    NoFileName(PathBuf),

    /// Permission denied reading the source or writing the destination.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// A file with the same name already exists in the destination.
    #[error("{destination} already exists, not moving {path}")]
    Collision { path: PathBuf, destination: PathBuf },

    /// Cross-device copy wrote a different number of bytes than expected.
    #[error("copy of {path} incomplete: expected {expected} bytes, wrote {actual}")]
    CopyVerification {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RelocateError {
    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::CreateDestination { path, .. }
            | Self::DestinationNotDirectory(path)
            | Self::SourceNotFound(path)
            | Self::NoFileName(path)
            | Self::PermissionDenied(path)
            | Self::Collision { path, .. }
            | Self::CopyVerification { path, .. }
            | Self::Io { path, .. } => path,
        }
    }

    fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::SourceNotFound(path.to_path_buf()),
            io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }
}

/// What to do when the destination already holds a file with the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Leave the source in place and report a collision.
    #[default]
    Error,
    /// Pick a free name: `song (1).mp3`, `song (2).mp3`, ...
    Rename,
}

/// Result of one successful move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocateResult {
    /// Original location.
    pub source: PathBuf,
    /// New location inside the destination directory.
    pub destination: PathBuf,
    /// Size of the file in bytes.
    pub size: u64,
}

/// Results of a batch relocation.
#[derive(Debug, Clone, Default)]
pub struct BatchRelocateResult {
    /// Files moved (or planned, in a dry run).
    pub successes: Vec<RelocateResult>,
    /// Files that could not be moved, with the error message.
    pub failures: Vec<(PathBuf, String)>,
    /// Total bytes moved.
    pub bytes_moved: u64,
    /// Whether this call created the destination directory.
    pub destination_created: bool,
    /// Whether this was a dry run.
    pub dry_run: bool,
    /// Whether the batch stopped early on a shutdown request.
    pub interrupted: bool,
}

impl BatchRelocateResult {
    /// Number of successful moves.
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    /// Number of failed moves.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    /// Check if all moves succeeded.
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty() && !self.interrupted
    }

    /// Human-readable summary of the operation.
    #[must_use]
    pub fn summary(&self) -> String {
        let verb = if self.dry_run { "Would move" } else { "Moved" };
        let size = bytesize::ByteSize::b(self.bytes_moved);
        if self.failures.is_empty() {
            format!("{verb} {} file(s), {size}", self.success_count())
        } else {
            format!(
                "{verb} {} file(s), {} failed, {size}",
                self.success_count(),
                self.failure_count()
            )
        }
    }
}

/// Configuration for relocation.
#[derive(Debug, Clone)]
pub struct RelocateConfig {
    /// Name collision handling.
    pub collision: CollisionPolicy,
    /// Continue on error (process remaining files even if some fail).
    pub continue_on_error: bool,
    /// Plan the moves without touching the filesystem.
    pub dry_run: bool,
    /// Optional shutdown flag, checked before each file.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for RelocateConfig {
    fn default() -> Self {
        Self {
            collision: CollisionPolicy::Error,
            continue_on_error: true,
            dry_run: false,
            shutdown_flag: None,
        }
    }
}

impl RelocateConfig {
    /// Set the collision policy.
    #[must_use]
    pub fn with_collision(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    /// Enable/disable continue on error.
    #[must_use]
    pub fn with_continue_on_error(mut self, continue_on_error: bool) -> Self {
        self.continue_on_error = continue_on_error;
        self
    }

    /// Enable/disable dry run.
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Callback trait for relocation progress reporting.
pub trait RelocateProgressCallback {
    /// Called before each file is moved.
    fn on_before_move(&self, path: &Path, index: usize, total: usize);

    /// Called after a successful move.
    fn on_move_success(&self, result: &RelocateResult);

    /// Called after a failed move.
    fn on_move_failure(&self, path: &Path, error: &str);

    /// Called when the batch completes.
    fn on_complete(&self, result: &BatchRelocateResult);
}

/// Make sure `destination` exists as a directory.
///
/// Returns `true` if it had to be created.
///
/// # Errors
///
/// - `DestinationNotDirectory` if the path exists and is not a directory
/// - `CreateDestination` if creating it fails
pub fn ensure_destination(destination: &Path) -> Result<bool, RelocateError> {
    if destination.is_dir() {
        return Ok(false);
    }
    if destination.exists() {
        return Err(RelocateError::DestinationNotDirectory(
            destination.to_path_buf(),
        ));
    }

    fs::create_dir_all(destination).map_err(|source| RelocateError::CreateDestination {
        path: destination.to_path_buf(),
        source,
    })?;
    log::info!("Created destination {}", destination.display());
    Ok(true)
}

/// Work out where `source` lands inside `destination`.
///
/// `reserved` holds names already claimed by earlier files in a dry run.
///
/// # Errors
///
/// - `NoFileName` if `source` has no base name
/// - `Collision` if the name is taken and the policy is `Error`
pub fn destination_for(
    source: &Path,
    destination: &Path,
    policy: CollisionPolicy,
    reserved: &HashSet<PathBuf>,
) -> Result<PathBuf, RelocateError> {
    let file_name = source
        .file_name()
        .ok_or_else(|| RelocateError::NoFileName(source.to_path_buf()))?;
    let target = destination.join(file_name);
    let is_taken = |p: &Path| p.symlink_metadata().is_ok() || reserved.contains(p);

    if !is_taken(&target) {
        return Ok(target);
    }

    match policy {
        CollisionPolicy::Error => Err(RelocateError::Collision {
            path: source.to_path_buf(),
            destination: target,
        }),
        CollisionPolicy::Rename => {
            let stem = Path::new(file_name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let extension = Path::new(file_name)
                .extension()
                .map(|e| format!(".{}", e.to_string_lossy()))
                .unwrap_or_default();

            let mut n: u32 = 1;
            loop {
                let candidate = destination.join(format!("{stem} ({n}){extension}"));
                if !is_taken(&candidate) {
                    log::debug!(
                        "{} exists, using {}",
                        target.display(),
                        candidate.display()
                    );
                    return Ok(candidate);
                }
                n += 1;
            }
        }
    }
}

/// Move one file to an exact target path.
///
/// Hard-links the source at the target, which fails atomically if the
/// target exists, then unlinks the source. Where links are unavailable
/// (another filesystem, or no link support), copies the content into a
/// newly created file, checks its size, then removes the source. An
/// existing target is never replaced.
///
/// Returns the number of bytes in the file.
///
/// # Errors
///
/// - `SourceNotFound` if the source vanished
/// - `Collision` if the target already exists
/// - `CopyVerification` if the cross-device copy came up short
/// - `Io` / `PermissionDenied` for other failures
pub fn move_file(source: &Path, target: &Path) -> Result<u64, RelocateError> {
    let metadata = fs::metadata(source).map_err(|e| RelocateError::from_io(source, e))?;
    let size = metadata.len();

    match fs::hard_link(source, target) {
        Ok(()) => {
            unlink_source(source, target)?;
            Ok(size)
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Err(RelocateError::Collision {
            path: source.to_path_buf(),
            destination: target.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            if source.exists() {
                Err(RelocateError::Io {
                    path: target.to_path_buf(),
                    source: e,
                })
            } else {
                Err(RelocateError::SourceNotFound(source.to_path_buf()))
            }
        }
        Err(e) => {
            log::debug!(
                "Cannot link {} to {} ({}), copying instead",
                source.display(),
                target.display(),
                e
            );
            copy_then_remove(source, target, &metadata)?;
            Ok(size)
        }
    }
}

/// Remove `source` once `target` holds its content.
///
/// If the source cannot be removed, `target` is removed again so the file
/// exists in one place only and a retry does not collide with it.
fn unlink_source(source: &Path, target: &Path) -> Result<(), RelocateError> {
    fs::remove_file(source).map_err(|e| {
        if let Err(cleanup) = fs::remove_file(target) {
            log::warn!(
                "Could not remove {} after failed move: {}",
                target.display(),
                cleanup
            );
        }
        RelocateError::from_io(source, e)
    })
}

fn copy_then_remove(
    source: &Path,
    target: &Path,
    metadata: &fs::Metadata,
) -> Result<(), RelocateError> {
    let mut reader = File::open(source).map_err(|e| RelocateError::from_io(source, e))?;
    let mut writer = File::create_new(target).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => RelocateError::Collision {
            path: source.to_path_buf(),
            destination: target.to_path_buf(),
        },
        _ => RelocateError::from_io(target, e),
    })?;

    let copied = io::copy(&mut reader, &mut writer)
        .and_then(|n| writer.sync_all().map(|()| n))
        .map_err(|e| {
            let _ = fs::remove_file(target);
            RelocateError::from_io(target, e)
        })?;

    if copied != metadata.len() {
        let _ = fs::remove_file(target);
        return Err(RelocateError::CopyVerification {
            path: source.to_path_buf(),
            expected: metadata.len(),
            actual: copied,
        });
    }

    if let Err(e) = fs::set_permissions(target, metadata.permissions()) {
        log::debug!("Could not copy permissions to {}: {}", target.display(), e);
    }

    unlink_source(source, target)
}

/// Move one file into `destination`, keeping its base name.
///
/// The destination directory must already exist. In a dry run nothing is
/// touched; the planned target is returned.
///
/// # Errors
///
/// See [`destination_for`] and [`move_file`].
pub fn relocate_file(
    source: &Path,
    destination: &Path,
    config: &RelocateConfig,
) -> Result<RelocateResult, RelocateError> {
    relocate_one(source, destination, config, &mut HashSet::new())
}

fn relocate_one(
    source: &Path,
    destination: &Path,
    config: &RelocateConfig,
    reserved: &mut HashSet<PathBuf>,
) -> Result<RelocateResult, RelocateError> {
    let target = destination_for(source, destination, config.collision, reserved)?;

    let size = if config.dry_run {
        let size = fs::metadata(source)
            .map_err(|e| RelocateError::from_io(source, e))?
            .len();
        reserved.insert(target.clone());
        log::info!("Would move {} -> {}", source.display(), target.display());
        size
    } else {
        let size = move_file(source, &target)?;
        log::info!("Moved {} -> {}", source.display(), target.display());
        size
    };

    Ok(RelocateResult {
        source: source.to_path_buf(),
        destination: target,
        size,
    })
}

/// Move multiple files into `destination`.
///
/// The destination is created first, even for an empty list (skipped in a
/// dry run). If that fails nothing is moved and the error is returned.
/// Per-file failures are collected in the result; with
/// `continue_on_error = false` the batch stops at the first one.
///
/// # Errors
///
/// Returns an error only when the destination cannot be prepared.
pub fn relocate_batch(
    paths: &[PathBuf],
    destination: &Path,
    config: &RelocateConfig,
    callback: Option<&dyn RelocateProgressCallback>,
) -> Result<BatchRelocateResult, RelocateError> {
    let mut result = BatchRelocateResult {
        dry_run: config.dry_run,
        ..Default::default()
    };

    if config.dry_run {
        if destination.exists() && !destination.is_dir() {
            return Err(RelocateError::DestinationNotDirectory(
                destination.to_path_buf(),
            ));
        }
    } else {
        result.destination_created = ensure_destination(destination)?;
    }

    let total = paths.len();
    let mut reserved = HashSet::new();

    for (index, path) in paths.iter().enumerate() {
        if config.is_shutdown_requested() {
            log::info!("Stopping relocation: shutdown requested");
            result.interrupted = true;
            break;
        }

        if let Some(cb) = callback {
            cb.on_before_move(path, index, total);
        }

        match relocate_one(path, destination, config, &mut reserved) {
            Ok(moved) => {
                result.bytes_moved += moved.size;
                if let Some(cb) = callback {
                    cb.on_move_success(&moved);
                }
                result.successes.push(moved);
            }
            Err(e) => {
                let error_msg = e.to_string();
                log::warn!("Failed to move {}: {}", path.display(), error_msg);

                if let Some(cb) = callback {
                    cb.on_move_failure(path, &error_msg);
                }

                result.failures.push((path.clone(), error_msg));

                if !config.continue_on_error {
                    log::info!("Stopping relocation due to error (continue_on_error=false)");
                    break;
                }
            }
        }
    }

    if let Some(cb) = callback {
        cb.on_complete(&result);
    }

    log::info!("{}", result.summary());

    Ok(result)
}

/// Move `paths` into `destination` with default settings.
///
/// Collisions are reported, never overwritten, and every file is attempted.
///
/// # Errors
///
/// Returns an error only when the destination cannot be prepared.
pub fn relocate(paths: &[PathBuf], destination: &Path) -> Result<BatchRelocateResult, RelocateError> {
    relocate_batch(paths, destination, &RelocateConfig::default(), None)
}
