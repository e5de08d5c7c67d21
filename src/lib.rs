//! mapclash - FiveM Map Collision Detector
//!
//! FiveM streams every asset by file name, and when two resources ship a
//! file with the same name the one loaded last silently wins. mapclash walks
//! a resources tree, hashes every asset matching the enabled patterns, and
//! reports names found in more than one place: critical conflicts when the
//! copies differ, redundant duplicates when they are identical.
//!
//! The pipeline is [`scanner::Walker`] → [`collisions::hash_candidates`] →
//! [`collisions::group_by_name`] → [`collisions::classify_all`], driven by
//! [`collisions::CollisionFinder`].

pub mod cli;
pub mod collisions;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod patterns;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{IsTerminal, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::collisions::{CollisionFinder, FinderConfig};
use crate::config::Config;
use crate::error::ExitCode;
use crate::output::{ConsoleReport, ConsoleSummary};
use crate::patterns::CATALOG;
use crate::progress::Progress;

/// Run the application with the given CLI arguments.
///
/// # Errors
///
/// Returns an error for configuration problems, an internal invariant
/// violation, or a report that cannot be written. Conflicts found in the
/// scan are not errors.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.list_patterns {
        print_catalog()?;
        return Ok(ExitCode::Success);
    }

    let root = cli
        .root
        .clone()
        .context("a directory to scan is required")?;

    let scan = Config::load(cli.config.as_deref())?
        .with_cli_overrides(&cli)
        .into_scan_config(root, cli.output.clone())?;
    log::debug!(
        "Scanning {} for {} ({} I/O threads)",
        scan.root.display(),
        scan.patterns.labels().join(", "),
        scan.io_threads
    );

    let handler = signal::install_handler()?;
    let progress = Arc::new(Progress::new(cli.quiet));

    let finder_config = FinderConfig::default()
        .with_io_threads(scan.io_threads)
        .with_walker_config(scan.walker.clone())
        .with_shutdown_flag(handler.get_flag())
        .with_progress_callback(progress);
    let finder = CollisionFinder::new(finder_config);
    let result = finder.find_collisions(&scan.root, &scan.patterns)?;

    match &scan.output {
        Some(path) => {
            output::write_report(&result, scan.format, path)?;
            if !cli.quiet {
                eprintln!("Report written to {}", path.display());
            }
        }
        None => {
            let rendered = output::render(&result, scan.format)?;
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(rendered.as_bytes())
                .context("failed to write report to stdout")?;
            stdout.flush().context("failed to write report to stdout")?;
        }
    }

    if !cli.quiet {
        let color = !cli.no_color && std::io::stderr().is_terminal();
        let mut stderr = std::io::stderr().lock();
        ConsoleReport::new(&result, color)
            .write_to(&mut stderr)
            .context("failed to write console report")?;
        ConsoleSummary::new(&result, color)
            .write_to(&mut stderr)
            .context("failed to write summary")?;
    }

    if result.interrupted {
        Ok(ExitCode::Interrupted)
    } else {
        Ok(ExitCode::Success)
    }
}

fn print_catalog() -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{:<14} {:<12} {:<8} DESCRIPTION", "LABEL", "CATEGORY", "DEFAULT")?;
    for rule in CATALOG {
        writeln!(
            stdout,
            "{:<14} {:<12} {:<8} {}",
            rule.label,
            rule.category.to_string(),
            if rule.default_enabled() { "on" } else { "off" },
            rule.description
        )?;
    }
    Ok(())
}
