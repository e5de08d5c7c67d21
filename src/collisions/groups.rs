//! Grouping of hashed candidates by filename.
//!
//! # Overview
//!
//! The loader resolves streamed assets by file name alone, so two files with
//! the same name anywhere under the resources root compete for the same slot.
//! [`group_by_name`] buckets hashed candidates by their name key and keeps
//! only the buckets with at least two members.
//!
//! # Example
//!
//! ```
//! use mapclash::collisions::{group_by_name, Candidate};
//! use std::path::PathBuf;
//!
//! let candidates = vec![
//!     Candidate::new(PathBuf::from("/res/a/stream/data.ymap"), 10, [1; 32]),
//!     Candidate::new(PathBuf::from("/res/b/stream/DATA.ymap"), 10, [1; 32]),
//!     Candidate::new(PathBuf::from("/res/b/stream/other.ymap"), 4, [2; 32]),
//! ];
//!
//! let (groups, stats) = group_by_name(candidates);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].name_key, "data.ymap");
//! assert_eq!(stats.singletons, 1);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::path_utils::name_key;
use crate::scanner::Hash;

/// A hashed candidate file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Absolute path
    pub path: PathBuf,
    /// NFC-normalized, lowercased base name
    pub name_key: String,
    /// Size in bytes
    pub size: u64,
    /// BLAKE3 content digest
    pub digest: Hash,
}

impl Candidate {
    /// Create a candidate, deriving its name key from the path.
    #[must_use]
    pub fn new(path: PathBuf, size: u64, digest: Hash) -> Self {
        let name_key = name_key(&path).unwrap_or_default();
        Self {
            path,
            name_key,
            size,
            digest,
        }
    }

    /// Base name as found on disk.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name_key.clone())
    }
}

/// Files sharing a name key, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileGroup {
    /// Shared name key
    pub name_key: String,
    /// Members in the order the walker found them
    pub members: Vec<Candidate>,
}

impl FileGroup {
    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True when the group has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Statistics from the grouping step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Candidates fed into grouping
    pub total_files: usize,
    /// Distinct name keys seen
    pub unique_names: usize,
    /// Name keys seen exactly once
    pub singletons: usize,
    /// Candidates that ended up in a group
    pub grouped_files: usize,
}

/// Group candidates by name key.
///
/// Groups appear in the order their first member was discovered and members
/// keep discovery order. Only keys with two or more members are returned.
#[must_use]
pub fn group_by_name(candidates: Vec<Candidate>) -> (Vec<FileGroup>, GroupingStats) {
    let mut stats = GroupingStats {
        total_files: candidates.len(),
        ..Default::default()
    };

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<FileGroup> = Vec::new();

    for candidate in candidates {
        match index.get(&candidate.name_key) {
            Some(&slot) => buckets[slot].members.push(candidate),
            None => {
                index.insert(candidate.name_key.clone(), buckets.len());
                buckets.push(FileGroup {
                    name_key: candidate.name_key.clone(),
                    members: vec![candidate],
                });
            }
        }
    }

    stats.unique_names = buckets.len();
    let groups: Vec<FileGroup> = buckets
        .into_iter()
        .filter(|group| {
            if group.len() > 1 {
                true
            } else {
                stats.singletons += 1;
                false
            }
        })
        .collect();
    stats.grouped_files = groups.iter().map(FileGroup::len).sum();

    log::debug!(
        "Grouping: {} files, {} names, {} groups",
        stats.total_files,
        stats.unique_names,
        groups.len()
    );

    (groups, stats)
}
