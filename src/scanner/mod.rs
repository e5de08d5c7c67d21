//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Sequential directory walking with pattern filtering (walkdir)
//! - Best-effort exclusion of script resource folders
//! - Symlink cycle protection
//! - Content hashing with BLAKE3
//!
//! # Architecture
//!
//! - [`walker`]: Directory traversal and candidate discovery
//! - [`exclusion`]: Script-folder heuristic
//! - [`visited`]: Directory identity tracking for symlink cycles
//! - [`hasher`]: Streaming BLAKE3 file hashing
//! - [`path_utils`]: Filename keys and resource names
//!
//! # Example
//!
//! ```no_run
//! use mapclash::patterns::PatternSet;
//! use mapclash::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("resources"), PatternSet::defaults(), WalkerConfig::default())?;
//! let mut walk = walker.walk();
//! for entry in walk.by_ref() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! println!("{} script folders skipped", walk.excluded().len());
//! # Ok::<(), mapclash::error::ConfigError>(())
//! ```

pub mod exclusion;
pub mod hasher;
pub mod path_utils;
pub mod visited;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use exclusion::{ExcludedFolder, ExclusionReason, ScriptFolderDetector, ScriptFolderRules};
pub use hasher::{hash_to_hex, Hash, Hasher, CHUNK_SIZE};
pub use visited::DirectoryTracker;
pub use walker::{Walk, Walker};

/// A file that matched the active patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    /// Create a new FileEntry.
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Follow symbolic links. Cycles are cut by [`DirectoryTracker`].
    pub follow_symlinks: bool,

    /// Drop `lodlights*.ymap` / `vw_*.ymap` even when `*.ymap` is enabled.
    pub exclude_light_ymaps: bool,

    /// Glob patterns to ignore (gitignore-style, relative to the root).
    pub ignore_patterns: Vec<String>,

    /// Script-folder heuristic; `None` disables it.
    pub script_folders: Option<ScriptFolderRules>,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: true,
            exclude_light_ymaps: false,
            ignore_patterns: Vec::new(),
            script_folders: None,
        }
    }
}

impl WalkerConfig {
    /// Enable light-map exclusion.
    #[must_use]
    pub fn with_exclude_light_ymaps(mut self, exclude: bool) -> Self {
        self.exclude_light_ymaps = exclude;
        self
    }

    /// Enable the script-folder heuristic with the given rules.
    #[must_use]
    pub fn with_script_folders(mut self, rules: ScriptFolderRules) -> Self {
        self.script_folders = Some(rules);
        self
    }

    /// Set gitignore-style ignore patterns.
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Set symlink following.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }
}

/// Errors that can occur during directory scanning.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry disappeared between listing and reading.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing a file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) => p,
            Self::Io { path, .. } => path,
        }
    }

    pub(crate) fn from_io(path: PathBuf, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io {
                path,
                source: error,
            },
        }
    }
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Path the error refers to.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
