//! Structured error handling and exit codes.

use serde::Serialize;

/// Exit codes for the mp3dedup binary.
///
/// - 0: Success (duplicates found; all moved if moving)
/// - 1: General error (unexpected failure)
/// - 2: No duplicates found
/// - 3: Partial success (files skipped during scan or moves failed)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Duplicates were found (and moved, for `move`).
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Completed, but some files were skipped or could not be moved.
    PartialSuccess = 3,
    /// Interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "MD000",
            Self::GeneralError => "MD001",
            Self::NoDuplicates => "MD002",
            Self::PartialSuccess => "MD003",
            Self::Interrupted => "MD130",
        }
    }

    /// Pick the exit code for an error returned from `run_app`.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        let interrupted = err.chain().any(|cause| {
            cause
                .downcast_ref::<crate::duplicates::FinderError>()
                .is_some_and(|e| matches!(e, crate::duplicates::FinderError::Interrupted))
        });
        if interrupted {
            Self::Interrupted
        } else {
            Self::GeneralError
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "MD001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including causes
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
