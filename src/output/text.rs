//! Human-readable output for the terminal.
//!
//! Colors come from `yansi` and are turned off globally with
//! [`set_color_enabled`] (driven by `--no-color` / `NO_COLOR`).

use std::io::{self, Write};
use std::path::Path;

use bytesize::ByteSize;
use yansi::Paint;

use crate::actions::BatchRelocateResult;
use crate::duplicates::ScanReport;

/// Enable or disable colored output for the whole process.
pub fn set_color_enabled(enabled: bool) {
    if enabled {
        yansi::enable();
    } else {
        yansi::disable();
    }
}

/// Text renderer for scan reports and relocation results.
#[derive(Debug)]
pub struct TextOutput<'a> {
    root: &'a Path,
    report: &'a ScanReport,
}

impl<'a> TextOutput<'a> {
    /// Create a renderer for `report`, produced by scanning `root`.
    #[must_use]
    pub fn new(root: &'a Path, report: &'a ScanReport) -> Self {
        Self { root, report }
    }

    /// Write the duplicate listing, skipped paths and scan summary.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_report<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let report = self.report;

        if report.duplicates.is_empty() {
            writeln!(
                writer,
                "{} in {}",
                "No duplicate MP3 files found".green(),
                self.root.display()
            )?;
        } else {
            writeln!(
                writer,
                "{}",
                format!("Duplicate MP3 files in {}:", self.root.display()).bold()
            )?;
            for dup in &report.duplicates {
                writeln!(writer, "  {}", dup.path.display().yellow())?;
                writeln!(
                    writer,
                    "    {} {}",
                    "same as".dim(),
                    dup.original.display()
                )?;
            }
        }

        if !report.skipped.is_empty() {
            writeln!(writer)?;
            writeln!(
                writer,
                "{}",
                format!("Skipped {} unreadable path(s):", report.skipped.len()).red()
            )?;
            for skipped in &report.skipped {
                writeln!(writer, "  {}: {}", skipped.path.display(), skipped.reason)?;
            }
        }

        writeln!(writer)?;
        writeln!(
            writer,
            "Scanned {} file(s), {} hashed in {:.2?}: {} unique, {} duplicate(s)",
            report.files_scanned,
            ByteSize::b(report.bytes_hashed),
            report.duration,
            report.unique_fingerprints,
            report.duplicates.len().bold()
        )
    }

    /// Write the outcome of moving duplicates into `destination`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_relocation<W: Write>(
        &self,
        writer: &mut W,
        destination: &Path,
        result: &BatchRelocateResult,
    ) -> io::Result<()> {
        writeln!(writer)?;
        if result.dry_run {
            writeln!(
                writer,
                "{}",
                format!("Dry run: nothing moved into {}", destination.display()).cyan()
            )?;
        } else if result.destination_created {
            writeln!(writer, "Created {}", destination.display())?;
        }

        for moved in &result.successes {
            writeln!(
                writer,
                "  {} {} -> {}",
                "moved".green(),
                moved.source.display(),
                moved.destination.display()
            )?;
        }
        for (path, error) in &result.failures {
            writeln!(writer, "  {} {}: {}", "failed".red(), path.display(), error)?;
        }
        if result.interrupted {
            writeln!(writer, "{}", "Interrupted before all files were moved".yellow())?;
        }

        writeln!(writer, "{}", result.summary().bold())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::RelocateResult;
    use crate::duplicates::{DuplicateFile, SkippedEntry};
    use crate::scanner::Fingerprint;
    use std::path::PathBuf;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Vec<u8>) -> io::Result<()>,
    {
        set_color_enabled(false);
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_no_duplicates() {
        let report = ScanReport {
            files_scanned: 2,
            unique_fingerprints: 2,
            ..Default::default()
        };
        let text = render(|w| TextOutput::new(Path::new("/music"), &report).write_report(w));
        assert!(text.contains("No duplicate MP3 files found in /music"));
        assert!(text.contains("Scanned 2 file(s)"));
    }

    #[test]
    fn test_lists_duplicates_and_skipped() {
        let report = ScanReport {
            duplicates: vec![DuplicateFile {
                path: PathBuf::from("/music/b.mp3"),
                fingerprint: Fingerprint::from_bytes([1; 16]),
                original: PathBuf::from("/music/a.mp3"),
            }],
            skipped: vec![SkippedEntry {
                path: PathBuf::from("/music/locked"),
                reason: "Permission denied".to_string(),
            }],
            files_scanned: 3,
            unique_fingerprints: 2,
            ..Default::default()
        };
        let text = render(|w| TextOutput::new(Path::new("/music"), &report).write_report(w));
        assert!(text.contains("/music/b.mp3"));
        assert!(text.contains("same as /music/a.mp3"));
        assert!(text.contains("Skipped 1 unreadable path(s)"));
        assert!(text.contains("1 duplicate(s)"));
    }

    #[test]
    fn test_relocation_summary() {
        let report = ScanReport::default();
        let result = BatchRelocateResult {
            successes: vec![RelocateResult {
                source: PathBuf::from("/music/b.mp3"),
                destination: PathBuf::from("/review/b.mp3"),
                size: 10,
            }],
            failures: vec![(PathBuf::from("/music/c.mp3"), "collision".to_string())],
            bytes_moved: 10,
            destination_created: true,
            ..Default::default()
        };
        let text = render(|w| {
            TextOutput::new(Path::new("/music"), &report).write_relocation(
                w,
                Path::new("/review"),
                &result,
            )
        });
        assert!(text.contains("Created /review"));
        assert!(text.contains("moved /music/b.mp3 -> /review/b.mp3"));
        assert!(text.contains("failed /music/c.mp3: collision"));
        assert!(text.contains("Moved 1 file(s), 1 failed"));
    }

    #[test]
    fn test_dry_run_banner() {
        let report = ScanReport::default();
        let result = BatchRelocateResult {
            dry_run: true,
            ..Default::default()
        };
        let text = render(|w| {
            TextOutput::new(Path::new("/music"), &report).write_relocation(
                w,
                Path::new("/review"),
                &result,
            )
        });
        assert!(text.contains("Dry run: nothing moved into /review"));
        assert!(text.contains("Would move 0 file(s)"));
    }
}
