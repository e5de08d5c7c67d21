//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! [`Walker`] traverses a resource tree and yields every file whose name
//! matches the active [`PatternSet`]. Traversal is sequential and sorted by
//! file name inside each directory, so two runs over the same tree yield the
//! same sequence.
//!
//! # Features
//!
//! - Case-insensitive filename pattern filtering
//! - Light-map exclusion
//! - Gitignore-style pattern pruning via the `ignore` crate
//! - Script-folder skipping for direct children of the root
//! - Symlink following with cycle protection via [`DirectoryTracker`]
//! - Graceful shutdown via atomic flag
//!
//! # Example
//!
//! ```no_run
//! use mapclash::patterns::PatternSet;
//! use mapclash::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("resources"), PatternSet::defaults(), WalkerConfig::default())?;
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} candidate files", files.len());
//! # Ok::<(), mapclash::error::ConfigError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};
use walkdir::{DirEntry, WalkDir};

use super::exclusion::{ExcludedFolder, ScriptFolderDetector};
use super::visited::DirectoryTracker;
use super::{FileEntry, ScanError, WalkerConfig};
use crate::error::ConfigError;
use crate::patterns::{is_light_map, PatternSet};

/// Directory walker for candidate discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Enabled filename patterns
    patterns: PatternSet,
    /// Walker configuration
    config: WalkerConfig,
    /// Compiled ignore patterns
    gitignore: Option<Gitignore>,
    /// Compiled script-folder rules
    detector: Option<ScriptFolderDetector>,
    /// Optional shutdown flag for graceful termination
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Walker {
    /// Create a new walker for the given root.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGlob`] when an ignore pattern or a
    /// script-folder name pattern cannot be compiled.
    pub fn new(root: &Path, patterns: PatternSet, config: WalkerConfig) -> Result<Self, ConfigError> {
        let gitignore = build_gitignore(root, &config.ignore_patterns)?;
        let detector = config
            .script_folders
            .as_ref()
            .map(ScriptFolderDetector::new)
            .transpose()?;

        Ok(Self {
            root: root.to_path_buf(),
            patterns,
            config,
            gitignore,
            detector,
            shutdown_flag: None,
        })
    }

    /// Set the shutdown flag for graceful termination.
    ///
    /// When the flag is set to `true`, the walker stops yielding entries.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Root directory of the walk.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the directory tree, yielding candidate files.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Folders skipped by the script heuristic are available from
    /// [`Walk::excluded`] once the iterator is drained.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        let inner = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter();

        Walk {
            walker: self,
            inner,
            tracker: DirectoryTracker::new(),
            excluded: Vec::new(),
        }
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        let Some(gi) = &self.gitignore else {
            return false;
        };
        let relative_path = path.strip_prefix(&self.root).unwrap_or(path);
        gi.matched(relative_path, is_dir).is_ignore()
    }

    fn is_candidate_name(&self, file_name: &str) -> bool {
        if !self.patterns.matches(file_name) {
            return false;
        }
        !(self.config.exclude_light_ymaps && is_light_map(&file_name.to_lowercase()))
    }
}

/// Build the ignore matcher. No patterns means no matcher.
fn build_gitignore(root: &Path, patterns: &[String]) -> Result<Option<Gitignore>, ConfigError> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        builder
            .add_line(None, pattern)
            .map_err(|e| ConfigError::InvalidGlob {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
    }

    let gitignore = builder.build().map_err(|e| ConfigError::InvalidGlob {
        pattern: patterns.join(", "),
        reason: e.to_string(),
    })?;
    log::debug!("Compiled {} ignore pattern(s)", gitignore.num_ignores());
    Ok(Some(gitignore))
}

/// Iterator returned by [`Walker::walk`].
pub struct Walk<'a> {
    walker: &'a Walker,
    inner: walkdir::IntoIter,
    tracker: DirectoryTracker,
    excluded: Vec<ExcludedFolder>,
}

impl Walk<'_> {
    /// Folders skipped by the script heuristic so far.
    #[must_use]
    pub fn excluded(&self) -> &[ExcludedFolder] {
        &self.excluded
    }

    /// Consume the iterator, returning the skipped folders.
    #[must_use]
    pub fn into_excluded(self) -> Vec<ExcludedFolder> {
        self.excluded
    }

    /// Decide whether to descend into a directory.
    fn enter_directory(&mut self, entry: &DirEntry) -> bool {
        let path = entry.path();

        if entry.depth() > 0 && self.walker.should_ignore(path, true) {
            log::trace!("Ignoring directory: {}", path.display());
            return false;
        }

        if entry.depth() == 1 {
            if let Some(reason) = self.walker.detector.as_ref().and_then(|d| d.detect(path)) {
                log::info!("Skipping script folder {} ({})", path.display(), reason);
                self.excluded.push(ExcludedFolder {
                    path: path.to_path_buf(),
                    reason,
                });
                return false;
            }
        }

        match entry.metadata() {
            Ok(metadata) => {
                if self.tracker.first_visit(path, &metadata) {
                    true
                } else {
                    log::debug!("Already visited, not entering: {}", path.display());
                    false
                }
            }
            // walkdir reports the read failure itself when it opens the directory
            Err(_) => true,
        }
    }

    fn convert_error(&self, err: walkdir::Error) -> ScanError {
        let path = err
            .path()
            .map_or_else(|| self.walker.root.clone(), Path::to_path_buf);
        match err.into_io_error() {
            Some(io) => ScanError::from_io(path, io),
            None => ScanError::Io {
                path,
                source: std::io::Error::other("filesystem loop"),
            },
        }
    }
}

impl std::fmt::Debug for Walk<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Walk")
            .field("root", &self.walker.root)
            .field("visited_dirs", &self.tracker.len())
            .field("excluded", &self.excluded.len())
            .finish_non_exhaustive()
    }
}

impl Iterator for Walk<'_> {
    type Item = Result<FileEntry, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.walker.is_shutdown_requested() {
                log::debug!("Walker: Shutdown requested, stopping iteration");
                return None;
            }

            let entry = match self.inner.next()? {
                Ok(entry) => entry,
                Err(err) => {
                    if let Some(ancestor) = err.loop_ancestor() {
                        log::debug!(
                            "Symlink loop back to {} at {}",
                            ancestor.display(),
                            err.path().unwrap_or(ancestor).display()
                        );
                        continue;
                    }
                    let err = self.convert_error(err);
                    log::warn!("{}", err);
                    return Some(Err(err));
                }
            };

            let file_type = entry.file_type();

            if file_type.is_dir() {
                if !self.enter_directory(&entry) {
                    self.inner.skip_current_dir();
                }
                continue;
            }

            // Sockets, devices, and unfollowed symlinks
            if !file_type.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if !self.walker.is_candidate_name(&name) {
                continue;
            }

            let path = entry.path();
            if self.walker.should_ignore(path, false) {
                log::trace!("Ignoring file: {}", path.display());
                continue;
            }

            return match entry.metadata() {
                Ok(metadata) => Some(Ok(FileEntry::new(path.to_path_buf(), metadata.len()))),
                Err(err) => {
                    let err = self.convert_error(err);
                    log::warn!("{}", err);
                    Some(Err(err))
                }
            };
        }
    }
}
