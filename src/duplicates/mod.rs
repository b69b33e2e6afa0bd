//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Walking a tree and fingerprinting each `.mp3` file
//! - Tracking the first file seen per fingerprint
//! - Reporting later files with a known fingerprint as duplicates

pub mod finder;
pub mod registry;

pub use finder::{
    scan, DuplicateFile, DuplicateFinder, FinderConfig, FinderError, ScanReport, SkippedEntry,
    UnreadablePolicy,
};
pub use registry::{FingerprintRegistry, Registration};
