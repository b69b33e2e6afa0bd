//! MD5 file fingerprinting with streaming reads.
//!
//! # Overview
//!
//! [`Hasher`] computes a [`Fingerprint`] of a file's full byte content by
//! reading it in [`CHUNK_SIZE`] pieces and folding each piece into an MD5
//! state. Files are never loaded into memory whole.
//!
//! MD5 is used for speed. The threat model is accidental duplication, so
//! collision resistance against an attacker does not matter here.
//!
//! # Example
//!
//! ```no_run
//! use mp3dedup::scanner::Hasher;
//! use std::path::Path;
//!
//! let hasher = Hasher::new();
//! let fp = hasher.fingerprint(Path::new("song.mp3")).unwrap();
//! println!("{}", fp.to_hex());
//! ```

use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use md5::{Digest, Md5};

use super::HashError;

/// Read buffer size for streaming hashes (64 KiB).
pub const CHUNK_SIZE: usize = 64 * 1024;

/// 128-bit MD5 digest of a file's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 16]);

impl Fingerprint {
    /// Wrap raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hexadecimal form (32 characters).
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }

    /// Parse a 32-character hex string.
    ///
    /// Returns `None` if the length is wrong or a character is not a hex digit.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 32 {
            return None;
        }
        let mut bytes = [0u8; 16];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Fingerprint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| format!("Invalid fingerprint: '{s}'"))
    }
}

impl serde::Serialize for Fingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Streaming MD5 hasher for file content.
#[derive(Debug, Clone, Default)]
pub struct Hasher {
    /// Optional shutdown flag, checked between chunks
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Hasher {
    /// Create a new hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set, an in-progress hash stops at the next chunk
    /// boundary and returns [`HashError::Interrupted`].
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

    /// Compute the fingerprint of a file's entire content.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file does not exist
    /// - `PermissionDenied` if the file cannot be opened
    /// - `Io` if a read fails mid-stream
    /// - `Interrupted` if shutdown was requested while hashing
    pub fn fingerprint(&self, path: &Path) -> Result<Fingerprint, HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        let (fingerprint, bytes) = self.digest(file, path)?;
        log::trace!("{} {} ({} bytes)", fingerprint, path.display(), bytes);
        Ok(fingerprint)
    }

    /// Compute the fingerprint of a file and return the byte count read.
    ///
    /// # Errors
    ///
    /// Same as [`Hasher::fingerprint`].
    pub fn fingerprint_with_len(&self, path: &Path) -> Result<(Fingerprint, u64), HashError> {
        let file = File::open(path).map_err(|e| HashError::from_io(path, e))?;
        self.digest(file, path)
    }

    /// Compute the fingerprint of any byte stream.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the reader fails.
    pub fn fingerprint_reader<R: Read>(&self, reader: R) -> Result<Fingerprint, HashError> {
        self.digest(reader, Path::new("<reader>"))
            .map(|(fingerprint, _)| fingerprint)
    }

    fn digest<R: Read>(&self, mut reader: R, path: &Path) -> Result<(Fingerprint, u64), HashError> {
        let mut md5 = Md5::new();
        let mut buffer = vec![0u8; CHUNK_SIZE];
        let mut total: u64 = 0;

        loop {
            if self.is_shutdown_requested() {
                return Err(HashError::Interrupted(PathBuf::from(path)));
            }
            let n = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(HashError::from_io(path, e)),
            };
            md5.update(&buffer[..n]);
            total += n as u64;
        }

        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&md5.finalize());
        Ok((Fingerprint(bytes), total))
    }
}
