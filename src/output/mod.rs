//! Output formatters for scan and move results.
//!
//! - Text for people at a terminal
//! - JSON for automation and scripting
//!
//! # Example
//!
//! ```no_run
//! use mp3dedup::duplicates::DuplicateFinder;
//! use mp3dedup::error::ExitCode;
//! use mp3dedup::output::JsonOutput;
//! use std::path::Path;
//!
//! let root = Path::new("/music");
//! let report = DuplicateFinder::with_defaults().find_duplicates(root).unwrap();
//!
//! let output = JsonOutput::new(root, &report, ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod json;
pub mod text;

pub use json::{JsonOutput, JsonOutputError};
pub use text::{set_color_enabled, TextOutput};
