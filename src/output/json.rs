//! JSON output for scan and move results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "root": "/music",
//!   "duplicates": [
//!     {
//!       "path": "/music/b.mp3",
//!       "original": "/music/a.mp3",
//!       "fingerprint": "0cc175b9c0f1b6a831c399e269772661"
//!     }
//!   ],
//!   "skipped": [{ "path": "/music/locked.mp3", "reason": "Permission denied: ..." }],
//!   "relocation": {
//!     "destination": "/review",
//!     "dry_run": false,
//!     "moved": [{ "source": "/music/b.mp3", "destination": "/review/b.mp3", "size": 4096 }],
//!     "failures": [],
//!     "bytes_moved": 4096
//!   },
//!   "summary": {
//!     "files_scanned": 3,
//!     "unique_fingerprints": 2,
//!     "duplicate_files": 1,
//!     "skipped_files": 1,
//!     "bytes_hashed": 12288,
//!     "scan_duration_ms": 12,
//!     "exit_code": 3,
//!     "exit_code_name": "MD003"
//!   }
//! }
//! ```
//!
//! `relocation` is omitted for `scan`.

use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::actions::BatchRelocateResult;
use crate::duplicates::ScanReport;
use crate::error::ExitCode;
use crate::scanner::Fingerprint;

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// One duplicate in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicate {
    /// Path of the duplicate
    pub path: String,
    /// First file seen with the same content
    pub original: String,
    /// MD5 fingerprint as 32 hex characters
    pub fingerprint: Fingerprint,
}

/// A skipped path in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSkipped {
    /// Path that could not be read
    pub path: String,
    /// Reason it was skipped
    pub reason: String,
}

/// A completed (or planned) move.
#[derive(Debug, Clone, Serialize)]
pub struct JsonMoved {
    /// Original location
    pub source: String,
    /// New location
    pub destination: String,
    /// File size in bytes
    pub size: u64,
}

/// A failed move.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    /// File that was not moved
    pub path: String,
    /// Error message
    pub error: String,
}

/// Relocation results in JSON form.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRelocation {
    /// Review folder
    pub destination: String,
    /// Whether nothing was actually moved
    pub dry_run: bool,
    /// Moved files
    pub moved: Vec<JsonMoved>,
    /// Files that failed to move
    pub failures: Vec<JsonFailure>,
    /// Total bytes moved
    pub bytes_moved: u64,
}

impl JsonRelocation {
    /// Convert a batch result.
    #[must_use]
    pub fn new(destination: &Path, result: &BatchRelocateResult) -> Self {
        Self {
            destination: path_string(destination),
            dry_run: result.dry_run,
            moved: result
                .successes
                .iter()
                .map(|m| JsonMoved {
                    source: path_string(&m.source),
                    destination: path_string(&m.destination),
                    size: m.size,
                })
                .collect(),
            failures: result
                .failures
                .iter()
                .map(|(path, error)| JsonFailure {
                    path: path_string(path),
                    error: error.clone(),
                })
                .collect(),
            bytes_moved: result.bytes_moved,
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Number of `.mp3` files fingerprinted
    pub files_scanned: usize,
    /// Number of distinct fingerprints
    pub unique_fingerprints: usize,
    /// Number of duplicates found
    pub duplicate_files: usize,
    /// Number of paths skipped as unreadable
    pub skipped_files: usize,
    /// Bytes read while hashing
    pub bytes_hashed: u64,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "MD000")
    pub exit_code_name: String,
}

impl JsonSummary {
    /// Create a JSON summary from a scan report and an exit code.
    #[must_use]
    pub fn from_report(report: &ScanReport, exit_code: ExitCode) -> Self {
        Self {
            files_scanned: report.files_scanned,
            unique_fingerprints: report.unique_fingerprints,
            duplicate_files: report.duplicates.len(),
            skipped_files: report.skipped.len(),
            bytes_hashed: report.bytes_hashed,
            scan_duration_ms: report.duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Scanned directory
    pub root: String,
    /// Duplicates in walk order
    pub duplicates: Vec<JsonDuplicate>,
    /// Paths skipped during the scan
    pub skipped: Vec<JsonSkipped>,
    /// Relocation results, present for `move`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relocation: Option<JsonRelocation>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Create JSON output for a scan.
    #[must_use]
    pub fn new(root: &Path, report: &ScanReport, exit_code: ExitCode) -> Self {
        Self {
            root: path_string(root),
            duplicates: report
                .duplicates
                .iter()
                .map(|d| JsonDuplicate {
                    path: path_string(&d.path),
                    original: path_string(&d.original),
                    fingerprint: d.fingerprint,
                })
                .collect(),
            skipped: report
                .skipped
                .iter()
                .map(|s| JsonSkipped {
                    path: path_string(&s.path),
                    reason: s.reason.clone(),
                })
                .collect(),
            relocation: None,
            summary: JsonSummary::from_report(report, exit_code),
        }
    }

    /// Attach relocation results.
    #[must_use]
    pub fn with_relocation(mut self, destination: &Path, result: &BatchRelocateResult) -> Self {
        self.relocation = Some(JsonRelocation::new(destination, result));
        self
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write pretty JSON and a trailing newline to a writer.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), JsonOutputError> {
        let json = self.to_json_pretty()?;
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
