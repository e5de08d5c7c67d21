//! JSON output for scan results.
//!
//! The full [`ScanResult`] is serialized, flattened next to version and
//! exit-code fields.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "exit_code": 0,
//!   "exit_code_name": "MC000",
//!   "root": "/srv/resources",
//!   "scanned_at": "2024-05-01T12:30:00+02:00",
//!   "patterns": ["*.ymap", "*.ybn"],
//!   "disabled_patterns": ["light_ymaps"],
//!   "exclude_light_ymaps": false,
//!   "excluded_paths": [],
//!   "groups": [
//!     {
//!       "file_name": "data.ymap",
//!       "extension": ".YMAP",
//!       "classification": "CRITICAL_CONFLICT",
//!       "distinct_digests": 2,
//!       "members": [
//!         { "path": "...", "resource_dir": "...", "resource": "mlo_a", "size": 2048, "digest": "..." }
//!       ]
//!     }
//!   ],
//!   "counts": { "conflicts": 1, "duplicates": 0, "conflicting_versions": 2, "grouped_files": 2 },
//!   "files_scanned": 7,
//!   "skipped": [],
//!   "interrupted": false,
//!   "duration_secs": 1.25
//! }
//! ```

use std::io::Write;

use serde::Serialize;

use crate::collisions::ScanResult;
use crate::error::ExitCode;

/// JSON document wrapping a scan result.
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a> {
    /// Application version
    pub version: &'static str,
    /// Exit code of this run
    pub exit_code: i32,
    /// Machine-readable exit code name (e.g. "MC000")
    pub exit_code_name: &'static str,
    /// The scan result
    #[serde(flatten)]
    pub result: &'a ScanResult,
}

impl<'a> JsonOutput<'a> {
    /// Wrap `result`. An interrupted scan is reported with [`ExitCode::Interrupted`].
    #[must_use]
    pub fn new(result: &'a ScanResult) -> Self {
        let exit_code = if result.interrupted {
            ExitCode::Interrupted
        } else {
            ExitCode::Success
        };
        Self {
            version: env!("CARGO_PKG_VERSION"),
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix(),
            result,
        }
    }

    /// Compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Indented JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write indented JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)
    }
}
