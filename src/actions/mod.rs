//! File actions module.
//!
//! This module provides functionality for moving duplicates out of the
//! scanned tree into a review folder:
//! - Destination creation (including missing parents)
//! - Rename with cross-filesystem copy fallback
//! - Explicit collision handling (error or auto-rename, never overwrite)
//! - Best-effort batches with per-file failure reporting
//!
//! ```no_run
//! use mp3dedup::actions::relocate;
//! use std::path::{Path, PathBuf};
//!
//! let paths = vec![PathBuf::from("/music/dup.mp3")];
//! let result = relocate(&paths, Path::new("/music/_review")).unwrap();
//! ```

pub mod relocate;

pub use relocate::{
    destination_for, ensure_destination, move_file, relocate, relocate_batch, relocate_file,
    BatchRelocateResult, CollisionPolicy, RelocateConfig, RelocateError,
    RelocateProgressCallback, RelocateResult,
};
