//! Log setup for the `mp3dedup` binary and for `run_app`.
//!
//! Records go through the `log` facade to `env_logger` on stderr, so they
//! never mix with the duplicate listing or JSON document on stdout.
//!
//! Level selection, first match wins:
//!
//! 1. `RUST_LOG`, e.g. `RUST_LOG=mp3dedup::actions=debug` to watch moves only
//! 2. `-q`: errors only (skipped files and failed moves are still reported
//!    in the command output)
//! 3. `-v` debug (each duplicate and its original), `-vv` trace (also
//!    every non-MP3 file the walker passes over)
//! 4. info: scan start, scan summary, each moved file
//!
//! `init_logging` runs at the top of every `run_app` call. The integration
//! tests call `run_app` many times in one process, so a second
//! initialization is a silent no-op rather than a panic.
//!
//! Debug builds stamp each line with seconds and, with `-v`, the module
//! path. Release builds print level and message only.

use env_logger::Builder;
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// The first call in a process installs the logger; later calls keep it.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
pub fn init_logging(verbose: u8, quiet: bool) {
    let use_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if use_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }

    configure_format(&mut builder, verbose);

    if builder.try_init().is_ok() {
        log::debug!("Logging initialized at level: {:?}", log::max_level());
    }
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let timestamp = buf.timestamp_seconds();
            let level = record.level();
            let level_style = buf.default_level_style(level);

            if verbose >= 1 {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} [{}] {}",
                    timestamp,
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {level_style}{:<5}{level_style:#} {}",
                    timestamp,
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let level_style = buf.default_level_style(level);
            writeln!(
                buf,
                "{level_style}{:<5}{level_style:#} {}",
                level,
                record.args()
            )
        });
    }
}
