//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults ([`Config::default`])
//! 2. TOML file: `--config <FILE>`, or `config.toml` in the platform config
//!    directory (e.g. `~/.config/mp3dedup/config.toml`)
//! 3. Environment variables prefixed with `MP3DEDUP_` (e.g.
//!    `MP3DEDUP_ON_COLLISION=rename`)
//! 4. CLI flags, applied by the caller via [`Config::apply_scan_args`] and
//!    [`Config::apply_move_args`]
//!
//! ```toml
//! follow_symlinks = false
//! skip_hidden = true
//! on_unreadable = "skip"
//! on_collision = "rename"
//! continue_on_error = true
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::actions::{CollisionPolicy, RelocateConfig};
use crate::cli::{MoveArgs, ScanArgs};
use crate::duplicates::UnreadablePolicy;
use crate::scanner::WalkerConfig;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "MP3DEDUP_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Follow symbolic links while walking.
    pub follow_symlinks: bool,
    /// Skip hidden files and directories.
    pub skip_hidden: bool,
    /// What to do with files that cannot be read during a scan.
    pub on_unreadable: UnreadablePolicy,
    /// What to do when the destination already has a file with the same name.
    pub on_collision: CollisionPolicy,
    /// Keep moving the remaining files after one fails.
    pub continue_on_error: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            skip_hidden: false,
            on_unreadable: UnreadablePolicy::Abort,
            on_collision: CollisionPolicy::Error,
            continue_on_error: true,
        }
    }
}

impl Config {
    /// Load configuration from the explicit file if given, else the default path.
    ///
    /// Falls back to defaults (with a warning) if the merged sources do not
    /// parse.
    #[must_use]
    pub fn load(explicit: Option<&Path>) -> Self {
        match explicit.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::load_from_path(path),
            None => Self::extract_or_default(Self::base_figment()),
        }
    }

    /// Load configuration from a specific TOML file (plus environment).
    ///
    /// A missing file is not an error; defaults and environment still apply.
    #[must_use]
    pub fn load_from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        log::debug!("Loading config from {}", path.display());
        Self::extract_or_default(Self::figment_for(path))
    }

    /// Figment with defaults, the given TOML file, and `MP3DEDUP_` variables.
    #[must_use]
    pub fn figment_for(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    fn base_figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default())).merge(Env::prefixed(ENV_PREFIX))
    }

    fn extract_or_default(figment: Figment) -> Self {
        match figment.extract() {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Invalid configuration, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// Default platform-specific configuration file path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "mp3dedup").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply scan-related CLI flags on top of the loaded values.
    pub fn apply_scan_args(&mut self, args: &ScanArgs) {
        if args.follow_symlinks {
            self.follow_symlinks = true;
        }
        if args.skip_hidden {
            self.skip_hidden = true;
        }
        if args.skip_unreadable {
            self.on_unreadable = UnreadablePolicy::Skip;
        }
    }

    /// Apply move-related CLI flags on top of the loaded values.
    pub fn apply_move_args(&mut self, args: &MoveArgs) {
        self.apply_scan_args(&args.scan);
        if let Some(policy) = args.on_collision {
            self.on_collision = policy.into();
        }
        if args.stop_on_error {
            self.continue_on_error = false;
        }
    }

    /// Walker settings from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig::new(self.follow_symlinks, self.skip_hidden)
    }

    /// Relocation settings from this configuration.
    #[must_use]
    pub fn relocate_config(&self, dry_run: bool) -> RelocateConfig {
        RelocateConfig::default()
            .with_collision(self.on_collision)
            .with_continue_on_error(self.continue_on_error)
            .with_dry_run(dry_run)
    }
}
