//! Directory identity tracking for symlink cycle protection.
//!
//! When symlinks are followed, two different paths can lead to the same
//! directory on disk, and a link pointing at an ancestor turns the tree into
//! a cycle. [`DirectoryTracker`] remembers every real directory entered so
//! the walker can refuse to enter it a second time.
//!
//! # Platform Support
//!
//! - **Unix**: `(device_id, inode)` from the directory metadata
//! - **Other**: the canonicalized path
//!
//! # Example
//!
//! ```no_run
//! use mapclash::scanner::visited::DirectoryTracker;
//! use std::path::Path;
//!
//! let mut tracker = DirectoryTracker::new();
//! let dir = Path::new("resources/mlo_a");
//! let meta = std::fs::metadata(dir).unwrap();
//! assert!(tracker.first_visit(dir, &meta));
//! assert!(!tracker.first_visit(dir, &meta));
//! ```

use std::collections::HashSet;
use std::fs::Metadata;
use std::path::Path;
#[cfg(not(unix))]
use std::path::PathBuf;

/// Remembers directories already entered during a walk.
///
/// Not thread-safe; the walker owns one per traversal.
#[derive(Debug, Default)]
pub struct DirectoryTracker {
    seen: HashSet<DirKey>,
}

impl DirectoryTracker {
    /// Create an empty tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a directory, returning `false` if it was already entered.
    ///
    /// A directory whose identity cannot be determined is always treated as
    /// new; walkdir's own ancestor check still stops direct loops.
    pub fn first_visit(&mut self, path: &Path, metadata: &Metadata) -> bool {
        match DirKey::resolve(path, metadata) {
            Some(key) => self.seen.insert(key),
            None => true,
        }
    }

    /// Number of distinct directories recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum DirKey {
    #[cfg(unix)]
    Inode { dev: u64, ino: u64 },
    #[cfg(not(unix))]
    Canonical(PathBuf),
}

impl DirKey {
    #[cfg(unix)]
    fn resolve(_path: &Path, metadata: &Metadata) -> Option<Self> {
        use std::os::unix::fs::MetadataExt;
        Some(Self::Inode {
            dev: metadata.dev(),
            ino: metadata.ino(),
        })
    }

    #[cfg(not(unix))]
    fn resolve(path: &Path, _metadata: &Metadata) -> Option<Self> {
        std::fs::canonicalize(path).ok().map(Self::Canonical)
    }
}
