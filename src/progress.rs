//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] for the scan and [`RelocateProgressCallback`] for
//! moving files, drawing a spinner and a progress bar on stderr.

use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::actions::{BatchRelocateResult, RelocateProgressCallback, RelocateResult};

/// Progress callback for the scan.
///
/// Implement this trait to receive progress updates while the finder
/// walks and fingerprints files.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// `total` is 0 when the number of items is not known up front.
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called for each item processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of items processed so far
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    scan: Mutex<Option<ProgressBar>>,
    relocate: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use mp3dedup::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            scan: Mutex::new(None),
            relocate: Mutex::new(None),
            quiet,
        }
    }

    fn scan_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn relocate_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// Start the relocation bar for `total` files.
    pub fn start_relocate(&self, total: usize) {
        if self.quiet {
            return;
        }
        let pb = ProgressBar::new(total as u64);
        pb.set_style(Self::relocate_style());
        pb.set_message("Moving");
        if let Ok(mut slot) = self.relocate.lock() {
            *slot = Some(pb);
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, _total: usize) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(Self::scan_style());
        pb.set_message(format!("{phase}: fingerprinting"));
        pb.enable_steady_tick(Duration::from_millis(100));
        if let Ok(mut slot) = self.scan.lock() {
            *slot = Some(pb);
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        if let Ok(slot) = self.scan.lock() {
            if let Some(ref pb) = *slot {
                pb.set_position(current as u64);
                pb.set_message(truncate_path(path, 30));
            }
        }
    }

    fn on_phase_end(&self, _phase: &str) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.scan.lock().ok().and_then(|mut slot| slot.take()) {
            pb.finish_and_clear();
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        if let Ok(slot) = self.scan.lock() {
            if let Some(ref pb) = *slot {
                pb.set_message(message.to_string());
            }
        }
    }
}

impl RelocateProgressCallback for Progress {
    fn on_before_move(&self, path: &Path, _index: usize, _total: usize) {
        if let Ok(slot) = self.relocate.lock() {
            if let Some(ref pb) = *slot {
                pb.set_message(truncate_path(&path.to_string_lossy(), 30));
            }
        }
    }

    fn on_move_success(&self, _result: &RelocateResult) {
        if let Ok(slot) = self.relocate.lock() {
            if let Some(ref pb) = *slot {
                pb.inc(1);
            }
        }
    }

    fn on_move_failure(&self, path: &Path, error: &str) {
        if let Ok(slot) = self.relocate.lock() {
            if let Some(ref pb) = *slot {
                pb.inc(1);
                pb.suspend(|| log::warn!("{}: {}", path.display(), error));
            }
        }
    }

    fn on_complete(&self, _result: &BatchRelocateResult) {
        if let Some(pb) = self.relocate.lock().ok().and_then(|mut slot| slot.take()) {
            pb.finish_and_clear();
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len - (max_len - 3)).collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
