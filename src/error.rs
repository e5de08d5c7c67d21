//! Structured error handling and exit codes.
//!
//! Configuration problems are fatal and detected before any scanning starts.
//! Per-file access problems never surface here; they are collected as
//! warnings on the [`ScanResult`](crate::collisions::ScanResult).

use std::path::PathBuf;

use serde::Serialize;

/// Exit codes for the mapclash application.
///
/// - 0: Scan completed (whether or not collisions were found)
/// - 1: Unrecoverable internal error
/// - 2: Configuration error (bad root, bad pattern selection, bad config)
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed. Conflicts are a finding, not a failure.
    Success = 0,
    /// An unexpected error or an engine invariant violation.
    InternalError = 1,
    /// The run was rejected before scanning.
    ConfigError = 2,
    /// Scan was interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "MC000",
            Self::InternalError => "MC001",
            Self::ConfigError => "MC002",
            Self::Interrupted => "MC130",
        }
    }

    /// Pick the exit code for an error escaping `run_app`.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        if err.downcast_ref::<ConfigError>().is_some() {
            return Self::ConfigError;
        }
        match err.downcast_ref::<crate::collisions::FinderError>() {
            Some(crate::collisions::FinderError::Config(_)) => Self::ConfigError,
            _ => Self::InternalError,
        }
    }
}

/// Errors that reject a run before any file is scanned.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The scan root does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The scan root exists but is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// A pattern label in the selection is not part of the catalog.
    #[error("Unknown file pattern '{label}' (known patterns: {known})")]
    UnknownPattern {
        /// The label as given
        label: String,
        /// Comma-separated catalog labels
        known: String,
    },

    /// Every pattern ended up disabled, so the scan could never find anything.
    #[error("No file patterns are enabled; enable at least one with --enable")]
    NoPatternsEnabled,

    /// A user supplied glob could not be compiled.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidGlob {
        /// The offending pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },

    /// The layered configuration could not be loaded or extracted.
    #[error("Invalid configuration: {0}")]
    Load(String),
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "MC002")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
        }
    }
}
