//! mp3dedup - duplicate MP3 finder
//!
//! Walks a directory tree, fingerprints every `.mp3` file by the MD5 digest
//! of its full content, reports each file whose content was already seen,
//! and optionally moves those duplicates into a review folder.
//!
//! ```no_run
//! use mp3dedup::actions::relocate;
//! use mp3dedup::duplicates::scan;
//! use std::path::Path;
//!
//! let duplicates = scan(Path::new("/music")).unwrap();
//! let result = relocate(&duplicates, Path::new("/music-review")).unwrap();
//! println!("{}", result.summary());
//! ```

pub mod actions;
pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use crate::actions::{relocate_batch, BatchRelocateResult};
use crate::cli::{Cli, Commands, MoveArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig, ScanReport};
use crate::error::ExitCode;
use crate::output::{JsonOutput, TextOutput};
use crate::progress::Progress;
use crate::signal::ShutdownHandler;

/// Run the command described by `cli` and return the process exit code.
///
/// # Errors
///
/// Returns an error when the scan aborts (unreadable file, Ctrl+C), the
/// destination cannot be prepared, or output cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);
    output::set_color_enabled(!cli.no_color);

    let shutdown = signal::install_handler().context("Failed to install Ctrl+C handler")?;
    let mut config = Config::load(cli.config.as_deref());

    match cli.command {
        Commands::Scan(args) => {
            config.apply_scan_args(&args);
            run_scan(&args, &config, &shutdown, cli.quiet)
        }
        Commands::Move(args) => {
            config.apply_move_args(&args);
            run_move(&args, &config, &shutdown, cli.quiet)
        }
    }
}

fn scan_tree(
    root: &Path,
    config: &Config,
    shutdown: &ShutdownHandler,
    progress: Arc<Progress>,
) -> anyhow::Result<ScanReport> {
    let finder_config = FinderConfig::default()
        .with_walker_config(config.walker_config())
        .with_unreadable_policy(config.on_unreadable)
        .with_shutdown_flag(shutdown.get_flag())
        .with_progress_callback(progress);

    DuplicateFinder::new(finder_config)
        .find_duplicates(root)
        .with_context(|| format!("Failed to scan {}", root.display()))
}

fn scan_exit_code(report: &ScanReport) -> ExitCode {
    if report.has_skipped() {
        ExitCode::PartialSuccess
    } else if report.has_duplicates() {
        ExitCode::Success
    } else {
        ExitCode::NoDuplicates
    }
}

fn run_scan(
    args: &ScanArgs,
    config: &Config,
    shutdown: &ShutdownHandler,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let hide_progress = quiet || args.output == OutputFormat::Json;
    let progress = Arc::new(Progress::new(hide_progress));
    let report = scan_tree(&args.path, config, shutdown, progress)?;
    let code = scan_exit_code(&report);

    let mut stdout = io::stdout().lock();
    match args.output {
        OutputFormat::Json => JsonOutput::new(&args.path, &report, code)
            .write_to(&mut stdout)
            .context("Failed to write JSON output")?,
        OutputFormat::Text => {
            if !quiet {
                TextOutput::new(&args.path, &report)
                    .write_report(&mut stdout)
                    .context("Failed to write scan results")?;
            }
        }
    }

    Ok(code)
}

fn move_exit_code(report: &ScanReport, result: &BatchRelocateResult) -> ExitCode {
    if result.interrupted {
        ExitCode::Interrupted
    } else if report.has_skipped() || !result.failures.is_empty() {
        ExitCode::PartialSuccess
    } else {
        ExitCode::Success
    }
}

fn run_move(
    args: &MoveArgs,
    config: &Config,
    shutdown: &ShutdownHandler,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    let root = &args.scan.path;
    let format = args.scan.output;
    let hide_progress = quiet || format == OutputFormat::Json;
    let progress = Arc::new(Progress::new(hide_progress));

    let report = scan_tree(root, config, shutdown, Arc::clone(&progress))?;
    let mut stdout = io::stdout().lock();

    if !report.has_duplicates() {
        log::info!("No duplicates found; nothing to move");
        let code = scan_exit_code(&report);
        match format {
            OutputFormat::Json => JsonOutput::new(root, &report, code)
                .write_to(&mut stdout)
                .context("Failed to write JSON output")?,
            OutputFormat::Text if !quiet => TextOutput::new(root, &report)
                .write_report(&mut stdout)
                .context("Failed to write scan results")?,
            OutputFormat::Text => {}
        }
        return Ok(code);
    }

    let relocate_config = config
        .relocate_config(args.dry_run)
        .with_shutdown_flag(shutdown.get_flag());
    let paths = report.duplicate_paths();

    progress.start_relocate(paths.len());
    let result = relocate_batch(
        &paths,
        &args.destination,
        &relocate_config,
        Some(progress.as_ref()),
    )
    .with_context(|| format!("Failed to prepare {}", args.destination.display()))?;

    let code = move_exit_code(&report, &result);

    match format {
        OutputFormat::Json => JsonOutput::new(root, &report, code)
            .with_relocation(&args.destination, &result)
            .write_to(&mut stdout)
            .context("Failed to write JSON output")?,
        OutputFormat::Text => {
            if !quiet {
                let text = TextOutput::new(root, &report);
                text.write_report(&mut stdout)
                    .and_then(|()| text.write_relocation(&mut stdout, &args.destination, &result))
                    .context("Failed to write move results")?;
            }
        }
    }
    stdout.flush().context("Failed to flush stdout")?;

    Ok(code)
}
