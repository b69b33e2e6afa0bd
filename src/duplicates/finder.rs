//! Duplicate finder: walk, fingerprint, and partition by first occurrence.
//!
//! # Overview
//!
//! [`DuplicateFinder`] walks a directory tree with [`Walker`], fingerprints
//! every `.mp3` file with [`Hasher`], and checks each fingerprint against a
//! [`FingerprintRegistry`]. A file whose fingerprint is already registered
//! goes on the duplicate list; otherwise it becomes the registered original.
//!
//! Everything runs sequentially on the calling thread. Duplicates come back
//! in walk order, and the first file seen with a fingerprint is never listed.
//!
//! # Example
//!
//! ```no_run
//! use mp3dedup::duplicates::{DuplicateFinder, FinderConfig, UnreadablePolicy};
//! use std::path::Path;
//!
//! let config = FinderConfig::default().with_unreadable_policy(UnreadablePolicy::Skip);
//! let finder = DuplicateFinder::new(config);
//!
//! let report = finder.find_duplicates(Path::new("/home/user/Music")).unwrap();
//! for dup in &report.duplicates {
//!     println!("{} duplicates {}", dup.path.display(), dup.original.display());
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::progress::ProgressCallback;
use crate::scanner::{Fingerprint, HashError, Hasher, ScanError, Walker, WalkerConfig};

use super::registry::{FingerprintRegistry, Registration};

/// What to do when a file cannot be read during a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Abort the whole scan with the read error.
    #[default]
    Abort,
    /// Log a warning, record the file as skipped, and keep going.
    Skip,
}

/// Configuration for the duplicate finder.
#[derive(Clone, Default)]
pub struct FinderConfig {
    /// Directory walk settings.
    pub walker_config: WalkerConfig,
    /// Handling of files that fail to hash.
    pub unreadable_policy: UnreadablePolicy,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("unreadable_policy", &self.unreadable_policy)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl FinderConfig {
    /// Set the directory walk configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set how unreadable files are handled.
    #[must_use]
    pub fn with_unreadable_policy(mut self, policy: UnreadablePolicy) -> Self {
        self.unreadable_policy = policy;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// A file whose content matches an earlier file in the same scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateFile {
    /// Path of the duplicate.
    pub path: PathBuf,
    /// Shared content fingerprint.
    pub fingerprint: Fingerprint,
    /// First file seen with this fingerprint (kept in place).
    pub original: PathBuf,
}

/// A path the scan could not read, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// File or directory that was skipped.
    pub path: PathBuf,
    /// Human-readable reason.
    pub reason: String,
}

/// Result of a completed scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Duplicates in walk order.
    pub duplicates: Vec<DuplicateFile>,
    /// Number of `.mp3` files fingerprinted.
    pub files_scanned: usize,
    /// Number of distinct fingerprints seen.
    pub unique_fingerprints: usize,
    /// Total bytes read while hashing.
    pub bytes_hashed: u64,
    /// Files and directories skipped because they could not be read.
    pub skipped: Vec<SkippedEntry>,
    /// Wall-clock time of the scan.
    pub duration: Duration,
}

impl ScanReport {
    /// Duplicate paths in walk order.
    #[must_use]
    pub fn duplicate_paths(&self) -> Vec<PathBuf> {
        self.duplicates.iter().map(|d| d.path.clone()).collect()
    }

    /// Whether any duplicates were found.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.duplicates.is_empty()
    }

    /// Whether anything was skipped.
    #[must_use]
    pub fn has_skipped(&self) -> bool {
        !self.skipped.is_empty()
    }
}

/// Errors that can occur during duplicate finding.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The scan was interrupted by user (Ctrl+C or shutdown signal).
    #[error("Scan interrupted by user")]
    Interrupted,

    /// A file could not be fingerprinted and the policy is to abort.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Duplicate finder that runs the walk-and-fingerprint scan.
///
/// # Example
///
/// ```no_run
/// use mp3dedup::duplicates::DuplicateFinder;
/// use std::path::Path;
///
/// let finder = DuplicateFinder::with_defaults();
/// match finder.find_duplicates(Path::new(".")) {
///     Ok(report) => println!("Found {} duplicates", report.duplicates.len()),
///     Err(e) => eprintln!("Scan failed: {}", e),
/// }
/// ```
#[derive(Debug)]
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let mut hasher = Hasher::new();
        if let Some(ref flag) = config.shutdown_flag {
            hasher = hasher.with_shutdown_flag(flag.clone());
        }
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Scan `root` and return every duplicate `.mp3` file in it.
    ///
    /// A root that does not exist is treated as empty.
    ///
    /// # Errors
    ///
    /// - `Interrupted` if the shutdown flag is set during the scan
    /// - `Hash` if a file cannot be read and the policy is
    ///   [`UnreadablePolicy::Abort`]
    pub fn find_duplicates(&self, root: &Path) -> Result<ScanReport, FinderError> {
        let start_time = Instant::now();
        let mut report = ScanReport::default();
        let mut registry = FingerprintRegistry::new();

        log::info!("Scanning {}", root.display());

        let mut walker = Walker::new(root, self.config.walker_config.clone());
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_phase_start("scan", 0);
        }

        for entry in walker.walk() {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    self.record_walk_error(&mut report, e);
                    continue;
                }
            };

            match self.hasher.fingerprint_with_len(&path) {
                Ok((fingerprint, len)) => {
                    report.files_scanned += 1;
                    report.bytes_hashed += len;

                    if let Registration::DuplicateOf(original) =
                        registry.register(fingerprint, &path)
                    {
                        log::debug!(
                            "Duplicate: {} (same content as {})",
                            path.display(),
                            original.display()
                        );
                        report.duplicates.push(DuplicateFile {
                            original: original.to_path_buf(),
                            path: path.clone(),
                            fingerprint,
                        });
                    }
                }
                Err(HashError::Interrupted(_)) => break,
                Err(e) => match self.config.unreadable_policy {
                    UnreadablePolicy::Abort => {
                        log::error!("Aborting scan: {}", e);
                        self.end_phase();
                        return Err(FinderError::Hash(e));
                    }
                    UnreadablePolicy::Skip => {
                        log::warn!("Skipping unreadable file: {}", e);
                        report.skipped.push(SkippedEntry {
                            path: path.clone(),
                            reason: e.to_string(),
                        });
                    }
                },
            }

            if let Some(ref cb) = self.config.progress_callback {
                cb.on_progress(report.files_scanned, &path.to_string_lossy());
            }
        }

        self.end_phase();

        if self.config.is_shutdown_requested() {
            log::info!("Scan interrupted after {} files", report.files_scanned);
            return Err(FinderError::Interrupted);
        }

        report.unique_fingerprints = registry.len();
        report.duration = start_time.elapsed();

        log::info!(
            "Scanned {} files in {:.2?}: {} unique, {} duplicates, {} skipped",
            report.files_scanned,
            report.duration,
            report.unique_fingerprints,
            report.duplicates.len(),
            report.skipped.len()
        );

        Ok(report)
    }

    /// Directory-level walk errors never abort; they are recorded and skipped.
    fn record_walk_error(&self, report: &mut ScanReport, err: ScanError) {
        log::warn!("Skipping during walk: {}", err);
        report.skipped.push(SkippedEntry {
            path: err.path().to_path_buf(),
            reason: err.to_string(),
        });
    }

    fn end_phase(&self) {
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_phase_end("scan");
        }
    }
}

/// Scan `root` with default settings and return duplicate paths in walk order.
///
/// Unreadable files abort the scan.
///
/// # Errors
///
/// Returns `FinderError::Hash` if any `.mp3` file cannot be read.
pub fn scan(root: &Path) -> Result<Vec<PathBuf>, FinderError> {
    DuplicateFinder::with_defaults()
        .find_duplicates(root)
        .map(|report| report.duplicate_paths())
}
