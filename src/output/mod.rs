//! Report renderers for scan results.
//!
//! - [`text`]: Lua-comment report, safe to drop into a resource folder
//! - [`html`]: Self-contained HTML page with copy-directory buttons
//! - [`json`]: Machine-readable dump of the full [`ScanResult`]
//! - [`csv`]: One row per group member
//! - [`console`]: Colored terminal summary
//!
//! # Example
//!
//! ```no_run
//! use mapclash::collisions::CollisionFinder;
//! use mapclash::output::{render, OutputFormat};
//! use mapclash::patterns::PatternSet;
//! use std::path::Path;
//!
//! let result = CollisionFinder::with_defaults()
//!     .find_collisions(Path::new("resources"), &PatternSet::defaults())
//!     .unwrap();
//! println!("{}", render(&result, OutputFormat::Text).unwrap());
//! ```

pub mod console;
pub mod csv;
pub mod html;
pub mod json;
pub mod text;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::collisions::ScanResult;
use crate::patterns::LIGHT_YMAPS;

// Re-export main types
pub use self::csv::{CsvOutput, CsvOutputError};
pub use console::{ConsoleReport, ConsoleSummary};
pub use html::{HtmlOutput, HtmlOutputError};
pub use json::JsonOutput;
pub use text::TextOutput;

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Self-contained HTML page
    Html,
    /// Lua-comment text report
    #[default]
    #[value(alias = "lua")]
    #[serde(alias = "lua")]
    Text,
    /// JSON document
    Json,
    /// CSV, one row per file
    Csv,
}

impl OutputFormat {
    /// Conventional file extension.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Text => "lua",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Html => write!(f, "html"),
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Errors from rendering or writing a report.
#[derive(thiserror::Error, Debug)]
pub enum OutputError {
    /// HTML rendering failed
    #[error(transparent)]
    Html(#[from] HtmlOutputError),

    /// JSON serialization failed
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed
    #[error(transparent)]
    Csv(#[from] CsvOutputError),

    /// Writing the report failed
    #[error("Failed to write report to {path}: {source}")]
    Io {
        /// Destination
        path: std::path::PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

/// Render a report to a string.
///
/// # Errors
///
/// Returns [`OutputError`] if the renderer fails.
pub fn render(result: &ScanResult, format: OutputFormat) -> Result<String, OutputError> {
    let rendered = match format {
        OutputFormat::Html => HtmlOutput::new(result)
            .to_html()
            .map_err(HtmlOutputError::from)?,
        OutputFormat::Text => TextOutput::new(result).render(),
        OutputFormat::Json => JsonOutput::new(result).to_json_pretty()?,
        OutputFormat::Csv => CsvOutput::new(result).to_string()?,
    };
    Ok(rendered)
}

/// Render a report and write it to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`OutputError`] if rendering or writing fails.
pub fn write_report(result: &ScanResult, format: OutputFormat, path: &Path) -> Result<(), OutputError> {
    let rendered = render(result, format)?;
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(rendered.as_bytes()).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    log::info!("Wrote {} report to {}", format, path.display());
    Ok(())
}

/// Patterns searched, for report headers.
pub(crate) fn patterns_searched(result: &ScanResult) -> String {
    let labels: Vec<String> = result
        .patterns
        .iter()
        .map(|label| {
            if label == "*.ymap" && !result.exclude_light_ymaps {
                "*.ymap (including lights)".to_string()
            } else {
                label.clone()
            }
        })
        .collect();
    join_or_none(&labels)
}

/// Patterns left out, for report headers.
pub(crate) fn patterns_ignored(result: &ScanResult) -> String {
    let mut labels: Vec<String> = result
        .disabled_patterns
        .iter()
        .filter(|label| !(result.exclude_light_ymaps && label.as_str() == LIGHT_YMAPS))
        .cloned()
        .collect();
    if result.exclude_light_ymaps {
        labels.push("lodlights*.ymap/vw_*.ymap".to_string());
    }
    join_or_none(&labels)
}

fn join_or_none(labels: &[String]) -> String {
    if labels.is_empty() {
        "NONE".to_string()
    } else {
        labels.join(", ")
    }
}

/// Format a duration as a human-readable string.
pub(crate) fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    if secs >= 3600 {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    } else if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, duration.subsec_millis())
    } else {
        format!("{}ms", duration.subsec_millis())
    }
}
