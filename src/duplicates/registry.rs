//! Seen-fingerprint registry.
//!
//! Maps each fingerprint to the first path observed with it during one
//! scan. The first registration wins and is never overwritten, so every
//! later file with the same fingerprint is reported as a duplicate of it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::scanner::Fingerprint;

/// Outcome of registering a path under a fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration<'a> {
    /// First file seen with this fingerprint.
    First,
    /// Fingerprint was already registered by the given path.
    DuplicateOf(&'a Path),
}

/// Registry of first-seen paths keyed by fingerprint.
#[derive(Debug, Default)]
pub struct FingerprintRegistry {
    seen: HashMap<Fingerprint, PathBuf>,
}

impl FingerprintRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `path` under `fingerprint`.
    ///
    /// Inserts and returns [`Registration::First`] if the fingerprint is new.
    /// Otherwise leaves the registry unchanged and returns the path that was
    /// registered first.
    pub fn register(&mut self, fingerprint: Fingerprint, path: &Path) -> Registration<'_> {
        use std::collections::hash_map::Entry;

        match self.seen.entry(fingerprint) {
            Entry::Occupied(entry) => Registration::DuplicateOf(entry.into_mut().as_path()),
            Entry::Vacant(entry) => {
                entry.insert(path.to_path_buf());
                Registration::First
            }
        }
    }

    /// Path first registered under `fingerprint`, if any.
    #[must_use]
    pub fn original(&self, fingerprint: &Fingerprint) -> Option<&Path> {
        self.seen.get(fingerprint).map(PathBuf::as_path)
    }

    /// Number of distinct fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
