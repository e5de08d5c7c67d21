//! Layered application configuration.
//!
//! Settings are merged from, lowest to highest priority:
//!
//! 1. [`Config::default()`]
//! 2. A TOML file (`--config FILE`, or `config.toml` in the platform config
//!    directory when present)
//! 3. `MAPCLASH_` environment variables, `__` separating nested keys
//!    (`MAPCLASH_SCRIPT_RULES__MAP_MARKER=is_a_map`)
//! 4. Command-line flags
//!
//! The merged [`Config`] is turned into a [`ScanConfig`], the pure input the
//! engine runs on.
//!
//! ```toml
//! exclude_light_ymaps = true
//! skip_scripts = true
//! io_threads = 8
//! ignore = ["_old/"]
//!
//! [patterns]
//! "*.ydr" = true
//! "*.ytd" = false
//!
//! [script_rules]
//! name_patterns = ["qb-*", "esx_*", "myserver_*"]
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::output::OutputFormat;
use crate::patterns::{PatternSet, CATALOG};
use crate::scanner::{ScriptFolderRules, WalkerConfig};

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "MAPCLASH_";

/// Largest accepted hashing thread count, the same ceiling `--io-threads` has.
pub const MAX_IO_THREADS: usize = u16::MAX as usize;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Drop light maps even when `*.ymap` is enabled.
    pub exclude_light_ymaps: bool,
    /// Apply the script-folder heuristic.
    pub skip_scripts: bool,
    /// Gitignore-style patterns relative to the scan root.
    pub ignore: Vec<String>,
    /// Follow symbolic links.
    pub follow_symlinks: bool,
    /// Hashing threads.
    pub io_threads: usize,
    /// Report format.
    pub format: OutputFormat,
    // Tables last so the struct serializes to valid TOML.
    /// Per-pattern enablement, keyed by catalog label. Labels not listed
    /// keep their catalog default.
    pub patterns: BTreeMap<String, bool>,
    /// Inputs of the script-folder heuristic.
    pub script_rules: ScriptFolderRules,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exclude_light_ymaps: false,
            skip_scripts: false,
            ignore: Vec::new(),
            follow_symlinks: true,
            io_threads: 4,
            format: OutputFormat::Text,
            patterns: BTreeMap::new(),
            script_rules: ScriptFolderRules::default(),
        }
    }
}

/// Everything one run needs, resolved and validated.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Directory to scan
    pub root: PathBuf,
    /// Enabled patterns
    pub patterns: PatternSet,
    /// Report destination; stdout when `None`
    pub output: Option<PathBuf>,
    /// Report format
    pub format: OutputFormat,
    /// Walker options
    pub walker: WalkerConfig,
    /// Hashing threads
    pub io_threads: usize,
}

impl Config {
    /// The default config file location, if the platform has one.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "mapclash", "mapclash")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Build the figment for defaults, file, and environment.
    ///
    /// An explicit `file` must exist; the default location is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if an explicit file is missing.
    pub fn figment(file: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match file {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::Load(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = Self::default_path().filter(|p| p.is_file()) {
                    log::debug!("Using config file {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        Ok(figment.merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Load defaults, file, and environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] if a layer is unreadable or holds a
    /// value of the wrong type.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        Self::extract(&Self::figment(file)?)
    }

    /// Extract a config from a prepared figment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] on extraction failure.
    pub fn extract(figment: &Figment) -> Result<Self, ConfigError> {
        figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))
    }

    /// Apply command-line flags on top of the loaded layers.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if cli.all_patterns {
            for rule in CATALOG {
                self.patterns.insert(rule.label.to_string(), true);
            }
        }
        for label in &cli.enable {
            self.patterns.insert(label.clone(), true);
        }
        for label in &cli.disable {
            self.patterns.insert(label.clone(), false);
        }
        if cli.exclude_light_ymaps {
            self.exclude_light_ymaps = true;
        }
        if cli.skip_scripts {
            self.skip_scripts = true;
        }
        self.ignore.extend(cli.ignore_patterns.iter().cloned());
        if cli.no_follow_symlinks {
            self.follow_symlinks = false;
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = usize::from(threads);
        }
        if let Some(format) = cli.resolved_format() {
            self.format = format;
        }
        self
    }

    /// Resolve into a [`ScanConfig`] for `root`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for unknown pattern labels, an empty
    /// selection, or a thread count outside `1..=MAX_IO_THREADS`.
    pub fn into_scan_config(
        self,
        root: PathBuf,
        output: Option<PathBuf>,
    ) -> Result<ScanConfig, ConfigError> {
        let patterns = PatternSet::from_enablement(&self.patterns)?;
        if !(1..=MAX_IO_THREADS).contains(&self.io_threads) {
            return Err(ConfigError::Load(format!(
                "io_threads must be between 1 and {MAX_IO_THREADS}, got {}",
                self.io_threads
            )));
        }

        let mut walker = WalkerConfig::default()
            .with_exclude_light_ymaps(self.exclude_light_ymaps)
            .with_ignore_patterns(self.ignore)
            .with_follow_symlinks(self.follow_symlinks);
        if self.skip_scripts {
            walker = walker.with_script_folders(self.script_rules);
        }

        Ok(ScanConfig {
            root,
            patterns,
            output,
            format: self.format,
            walker,
            io_threads: self.io_threads,
        })
    }
}
