//! The immutable result of one scan.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};

use super::classify::{Classification, ClassifiedGroup};
use crate::scanner::{ExcludedFolder, HashError, ScanError};

/// A file or directory that could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAccessWarning {
    /// Path that failed
    pub path: PathBuf,
    /// Why it failed
    pub reason: String,
}

impl From<&ScanError> for FileAccessWarning {
    fn from(err: &ScanError) -> Self {
        Self {
            path: err.path().to_path_buf(),
            reason: err.to_string(),
        }
    }
}

impl From<&HashError> for FileAccessWarning {
    fn from(err: &HashError) -> Self {
        Self {
            path: err.path().to_path_buf(),
            reason: err.to_string(),
        }
    }
}

/// Summary counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanCounts {
    /// Groups classified as critical conflicts
    pub conflicts: usize,
    /// Groups classified as redundant duplicates
    pub duplicates: usize,
    /// Sum of distinct versions over all conflict groups
    pub conflicting_versions: usize,
    /// Files that are part of any group
    pub grouped_files: usize,
}

impl ScanCounts {
    /// Tally classified groups.
    #[must_use]
    pub fn from_groups(groups: &[ClassifiedGroup]) -> Self {
        groups.iter().fold(Self::default(), |mut acc, g| {
            match g.classification {
                Classification::CriticalConflict => {
                    acc.conflicts += 1;
                    acc.conflicting_versions += g.distinct_digests;
                }
                Classification::RedundantDuplicate => acc.duplicates += 1,
            }
            acc.grouped_files += g.members.len();
            acc
        })
    }
}

/// Everything a report renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    /// Scanned root (absolute)
    pub root: PathBuf,
    /// When the scan started
    pub scanned_at: DateTime<Local>,
    /// Labels of the enabled patterns
    pub patterns: Vec<String>,
    /// Labels of the catalog patterns left out
    pub disabled_patterns: Vec<String>,
    /// Whether light maps were filtered out
    pub exclude_light_ymaps: bool,
    /// Folders skipped by the script heuristic
    pub excluded_paths: Vec<ExcludedFolder>,
    /// Classified groups, conflicts first
    pub groups: Vec<ClassifiedGroup>,
    /// Summary counters
    pub counts: ScanCounts,
    /// Candidate files hashed successfully
    pub files_scanned: usize,
    /// Files and directories that could not be read
    pub skipped: Vec<FileAccessWarning>,
    /// True if Ctrl+C cut the scan short
    pub interrupted: bool,
    /// Wall time of the scan
    #[serde(rename = "duration_secs", serialize_with = "serialize_secs")]
    pub duration: Duration,
}

fn serialize_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

impl ScanResult {
    /// Critical conflict groups.
    pub fn conflicts(&self) -> impl Iterator<Item = &ClassifiedGroup> {
        self.groups.iter().filter(|g| g.is_conflict())
    }

    /// Redundant duplicate groups.
    pub fn duplicates(&self) -> impl Iterator<Item = &ClassifiedGroup> {
        self.groups.iter().filter(|g| !g.is_conflict())
    }

    /// Groups bucketed by extension, extensions sorted.
    ///
    /// Inside a bucket the scan ordering (conflicts first) is kept.
    #[must_use]
    pub fn by_extension(&self) -> BTreeMap<&str, Vec<&ClassifiedGroup>> {
        let mut buckets: BTreeMap<&str, Vec<&ClassifiedGroup>> = BTreeMap::new();
        for group in &self.groups {
            buckets.entry(group.extension.as_str()).or_default().push(group);
        }
        buckets
    }

    /// Number of files skipped due to access errors.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    /// True when at least one critical conflict was found.
    #[must_use]
    pub fn has_conflicts(&self) -> bool {
        self.counts.conflicts > 0
    }
}
