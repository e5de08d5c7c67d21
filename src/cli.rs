//! Command-line interface definitions for mapclash.
//!
//! A single flat command: the scan root is positional and everything else
//! tunes the pattern selection, the walker, or the report.
//!
//! # Example
//!
//! ```bash
//! # Scan a server's resources folder, print the Lua report to stdout
//! mapclash ./resources
//!
//! # Write an HTML report instead
//! mapclash ./resources --output collisions.html
//!
//! # Also check drawables, skip lights and script resources
//! mapclash ./resources --enable "*.ydr" --exclude-light-ymaps --skip-scripts
//!
//! # Show the pattern catalog
//! mapclash --list-patterns
//! ```

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::output::OutputFormat;

/// Finds same-named streamed map assets that override each other across FiveM resources.
///
/// mapclash walks a resources tree, hashes every asset that matches the enabled
/// file patterns (BLAKE3), and reports file names found in more than one place,
/// split into critical conflicts (different content) and redundant duplicates
/// (identical content).
#[derive(Debug, Parser)]
#[command(name = "mapclash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Resources directory to scan
    #[arg(value_name = "ROOT", required_unless_present = "list_patterns")]
    pub root: Option<PathBuf>,

    /// Write the report to this file instead of stdout
    ///
    /// The format is taken from the file extension (.html, .json, .csv,
    /// .lua/.txt) unless --format is given.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Enable a file pattern by label (can be specified multiple times)
    ///
    /// Use --list-patterns to see the available labels.
    #[arg(short, long = "enable", value_name = "LABEL")]
    pub enable: Vec<String>,

    /// Disable a file pattern by label (can be specified multiple times)
    #[arg(short, long = "disable", value_name = "LABEL")]
    pub disable: Vec<String>,

    /// Enable every pattern in the catalog
    #[arg(long, conflicts_with = "enable")]
    pub all_patterns: bool,

    /// Drop light maps (lodlights*.ymap, vw_*.ymap) even when *.ymap is enabled
    #[arg(long)]
    pub exclude_light_ymaps: bool,

    /// Skip top-level folders that look like script resources
    ///
    /// Best-effort: a folder is skipped when its name matches a script
    /// framework prefix (qb-*, qbx_*, esx_*, ox_*) or when it has a manifest
    /// without `this_is_a_map` and no stream folder.
    #[arg(long)]
    pub skip_scripts: bool,

    /// Gitignore-style patterns to ignore (can be specified multiple times)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Number of I/O threads for hashing (default: 4)
    ///
    /// Lower values reduce disk thrashing on HDDs.
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u16).range(1..))]
    pub io_threads: Option<u16>,

    /// Do not follow symbolic links
    #[arg(long)]
    pub no_follow_symlinks: bool,

    /// Load settings from this TOML file instead of the default location
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the pattern catalog and exit
    #[arg(long)]
    pub list_patterns: bool,

    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all output except errors and the report itself
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    ///
    /// Any `NO_COLOR` value except an empty or falsey one (`0`, `false`, `no`, `off`)
    /// turns color off.
    #[arg(long, env = "NO_COLOR", value_parser = clap::builder::FalseyValueParser::new())]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

impl Cli {
    /// The report format: `--format`, else guessed from `--output`, else `None`.
    #[must_use]
    pub fn resolved_format(&self) -> Option<OutputFormat> {
        self.format
            .or_else(|| self.output.as_deref().and_then(format_from_extension))
    }
}

/// Guess a report format from a file extension.
#[must_use]
pub fn format_from_extension(path: &Path) -> Option<OutputFormat> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "html" | "htm" => Some(OutputFormat::Html),
        "json" => Some(OutputFormat::Json),
        "csv" => Some(OutputFormat::Csv),
        "lua" | "txt" => Some(OutputFormat::Text),
        _ => None,
    }
}
