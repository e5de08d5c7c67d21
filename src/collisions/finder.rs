//! Collision finder: the walk → hash → group → classify pipeline.
//!
//! # Pipeline
//!
//! 1. **Walk** - Collect candidate files matching the enabled patterns
//! 2. **Hash** - BLAKE3 digest of every candidate on a bounded thread pool
//! 3. **Group** - Bucket by case-folded file name, keep groups of 2+
//! 4. **Classify** - Duplicate or conflict per group, ordered for reports
//!
//! Hashing is parallel, but results are collected in discovery order before
//! grouping starts, so the output never depends on thread scheduling.
//!
//! # Example
//!
//! ```no_run
//! use mapclash::collisions::{CollisionFinder, FinderConfig};
//! use mapclash::patterns::PatternSet;
//! use std::path::Path;
//!
//! let finder = CollisionFinder::new(FinderConfig::default().with_io_threads(4));
//! let result = finder.find_collisions(Path::new("resources"), &PatternSet::defaults()).unwrap();
//! println!("{} conflicts, {} duplicates", result.counts.conflicts, result.counts.duplicates);
//! ```

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use chrono::Local;
use rayon::prelude::*;

use super::classify::classify_all;
use super::groups::{group_by_name, Candidate};
use super::result::{FileAccessWarning, ScanCounts, ScanResult};
use super::CollisionError;
use crate::error::ConfigError;
use crate::patterns::PatternSet;
use crate::progress::ProgressCallback;
use crate::scanner::{FileEntry, HashError, Hasher, Walker, WalkerConfig};

/// Files above this size are logged when hashing starts.
const LARGE_FILE_THRESHOLD: u64 = 256 * 1024 * 1024;

/// Configuration for the collision finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Number of I/O threads for parallel hashing.
    /// Default is 4 to prevent disk thrashing.
    pub io_threads: usize,
    /// Walker configuration for directory traversal.
    pub walker_config: WalkerConfig,
    /// Optional shutdown flag for graceful termination.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
    /// Optional progress callback for reporting.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("io_threads", &self.io_threads)
            .field("walker_config", &self.walker_config)
            .field("shutdown_flag", &self.shutdown_flag)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            io_threads: 4,
            walker_config: WalkerConfig::default(),
            shutdown_flag: None,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the I/O thread count (at least 1).
    #[must_use]
    pub fn with_io_threads(mut self, threads: usize) -> Self {
        self.io_threads = threads.max(1);
        self
    }

    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the shutdown flag for graceful termination.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The run was rejected before scanning.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An engine invariant was violated.
    #[error(transparent)]
    Invariant(#[from] CollisionError),

    /// The hashing thread pool could not be created.
    #[error("Failed to build hashing thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Output of the hashing stage.
#[derive(Debug, Default)]
pub struct HashOutcome {
    /// Successfully hashed files, in input order
    pub candidates: Vec<Candidate>,
    /// Files that could not be read
    pub warnings: Vec<FileAccessWarning>,
    /// True if the shutdown flag cut hashing short
    pub interrupted: bool,
}

/// Hash files on a bounded thread pool.
///
/// Unreadable files become warnings. Once shutdown is requested no new file
/// is opened; files already hashed are kept.
///
/// # Errors
///
/// Returns [`FinderError::ThreadPool`] if the pool cannot be built.
pub fn hash_candidates(
    files: Vec<FileEntry>,
    hasher: &Hasher,
    config: &FinderConfig,
) -> Result<HashOutcome, FinderError> {
    let mut outcome = HashOutcome::default();
    if files.is_empty() {
        log::debug!("Hashing: No files to process");
        return Ok(outcome);
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_start("hashing", files.len());
    }
    log::info!(
        "Hashing {} files on {} thread(s)",
        files.len(),
        config.io_threads
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.io_threads)
        .thread_name(|i| format!("mapclash-hash-{i}"))
        .build()?;

    let done = AtomicUsize::new(0);
    let results: Vec<Option<(FileEntry, Result<crate::scanner::Hash, HashError>)>> =
        pool.install(|| {
            files
                .into_par_iter()
                .map(|file| {
                    if config.is_shutdown_requested() {
                        return None;
                    }

                    if file.size > LARGE_FILE_THRESHOLD {
                        log::debug!(
                            "Hashing large file ({} MB): {}",
                            file.size / (1024 * 1024),
                            file.path.display()
                        );
                    }

                    let result = hasher.full_hash(&file.path);

                    if let Some(ref callback) = config.progress_callback {
                        let current = done.fetch_add(1, Ordering::Relaxed) + 1;
                        callback.on_progress(current, file.path.to_string_lossy().as_ref());
                        callback.on_item_completed(file.size);
                    }
                    Some((file, result))
                })
                .collect()
        });

    for item in results {
        match item {
            Some((file, Ok(digest))) => {
                log::trace!("Hashed: {}", file.path.display());
                outcome
                    .candidates
                    .push(Candidate::new(file.path, file.size, digest));
            }
            Some((_, Err(e))) => {
                log::warn!("Skipping unreadable file: {}", e);
                outcome.warnings.push(FileAccessWarning::from(&e));
            }
            None => outcome.interrupted = true,
        }
    }

    if let Some(ref callback) = config.progress_callback {
        callback.on_phase_end("hashing");
    }

    if outcome.interrupted {
        log::info!("Hashing: Interrupted by shutdown signal");
    }
    Ok(outcome)
}

/// Collision finder that orchestrates the detection pipeline.
pub struct CollisionFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl CollisionFinder {
    /// Create a new collision finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            config,
            hasher: Hasher::new(),
        }
    }

    /// Create a new collision finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Scan `root` for name collisions among files matching `patterns`.
    ///
    /// An interrupted scan still returns `Ok`, with
    /// [`ScanResult::interrupted`] set and only the fully processed files
    /// included.
    ///
    /// # Errors
    ///
    /// - [`FinderError::Config`] if the root is missing or not a directory,
    ///   the pattern set is empty, or a walker glob is invalid
    /// - [`FinderError::Invariant`] if classification preconditions break
    /// - [`FinderError::ThreadPool`] if hashing threads cannot start
    pub fn find_collisions(
        &self,
        root: &Path,
        patterns: &PatternSet,
    ) -> Result<ScanResult, FinderError> {
        let start_time = Instant::now();
        let scanned_at = Local::now();

        if !root.exists() {
            return Err(ConfigError::PathNotFound(root.to_path_buf()).into());
        }
        if !root.is_dir() {
            return Err(ConfigError::NotADirectory(root.to_path_buf()).into());
        }
        if patterns.is_empty() {
            return Err(ConfigError::NoPatternsEnabled.into());
        }
        let root = absolute_root(root);

        log::info!(
            "Starting collision scan of {} ({})",
            root.display(),
            patterns.labels().join(", ")
        );

        // Walk
        let mut walker = Walker::new(&root, patterns.clone(), self.config.walker_config.clone())?;
        if let Some(ref flag) = self.config.shutdown_flag {
            walker = walker.with_shutdown_flag(flag.clone());
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start("walking", 0);
            callback.on_message(&format!("Walking {}", root.display()));
        }

        let mut files = Vec::new();
        let mut skipped = Vec::new();
        let mut walk = walker.walk();
        for entry in walk.by_ref() {
            match entry {
                Ok(file) => {
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(files.len() + 1, file.path.to_string_lossy().as_ref());
                    }
                    files.push(file);
                }
                Err(e) => skipped.push(FileAccessWarning::from(&e)),
            }
        }
        let excluded_paths = walk.into_excluded();
        let mut interrupted = self.config.is_shutdown_requested();

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end("walking");
        }
        log::info!(
            "Found {} candidate files ({} folders excluded, {} unreadable)",
            files.len(),
            excluded_paths.len(),
            skipped.len()
        );

        // Hash
        let hashed = if interrupted {
            HashOutcome::default()
        } else {
            hash_candidates(files, &self.hasher, &self.config)?
        };
        interrupted |= hashed.interrupted;
        skipped.extend(hashed.warnings);
        let files_scanned = hashed.candidates.len();

        // Group
        let (groups, stats) = group_by_name(hashed.candidates);
        log::info!(
            "Grouping complete: {} names, {} shared by 2+ files",
            stats.unique_names,
            groups.len()
        );

        // Classify
        let classified = classify_all(&groups, &root)?;
        let counts = ScanCounts::from_groups(&classified);

        log::info!(
            "Scan complete: {} conflicts ({} versions), {} duplicates, {} skipped",
            counts.conflicts,
            counts.conflicting_versions,
            counts.duplicates,
            skipped.len()
        );

        Ok(ScanResult {
            root,
            scanned_at,
            patterns: patterns.labels(),
            disabled_patterns: patterns.disabled_labels(),
            exclude_light_ymaps: self.config.walker_config.exclude_light_ymaps,
            excluded_paths,
            groups: classified,
            counts,
            files_scanned,
            skipped,
            interrupted,
            duration: start_time.elapsed(),
        })
    }
}

/// Make the root absolute without resolving symlinks.
///
/// `canonicalize` would produce `\\?\` paths on Windows, which are
/// unreadable in reports.
fn absolute_root(root: &Path) -> PathBuf {
    std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf())
}
