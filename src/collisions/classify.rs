//! Conflict classification of name groups.
//!
//! A group whose members all carry the same digest is a harmless
//! [`Classification::RedundantDuplicate`]; any digest mismatch makes it a
//! [`Classification::CriticalConflict`], since only one of the versions will
//! be loaded.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::groups::FileGroup;
use super::CollisionError;
use crate::scanner::hash_to_hex;
use crate::scanner::path_utils::resource_name;

/// Outcome for one name group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    /// Same name, different content.
    CriticalConflict,
    /// Same name, identical content.
    RedundantDuplicate,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CriticalConflict => write!(f, "CRITICAL_CONFLICT"),
            Self::RedundantDuplicate => write!(f, "REDUNDANT_DUPLICATE"),
        }
    }
}

/// One file of a classified group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupMember {
    /// Full path
    pub path: PathBuf,
    /// Directory containing the file
    pub resource_dir: PathBuf,
    /// Resource the file belongs to
    pub resource: String,
    /// Size in bytes
    pub size: u64,
    /// Hex BLAKE3 digest
    pub digest: String,
}

/// A name group with its verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedGroup {
    /// File name as found on disk (first member)
    pub file_name: String,
    /// Upper-case extension with leading dot, e.g. `.YMAP`
    pub extension: String,
    /// Verdict
    pub classification: Classification,
    /// Number of different digests among members
    pub distinct_digests: usize,
    /// Members in discovery order
    pub members: Vec<GroupMember>,
}

impl ClassifiedGroup {
    /// True for a critical conflict.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        self.classification == Classification::CriticalConflict
    }
}

/// Classify a single group.
///
/// # Errors
///
/// Returns [`CollisionError::Invariant`] if the group has fewer than two
/// members or a member's name key differs from the group's.
pub fn classify_group(group: &FileGroup, root: &Path) -> Result<ClassifiedGroup, CollisionError> {
    if group.len() < 2 {
        return Err(CollisionError::Invariant(format!(
            "group '{}' has {} member(s); at least 2 required",
            group.name_key,
            group.len()
        )));
    }
    if let Some(stray) = group.members.iter().find(|m| m.name_key != group.name_key) {
        return Err(CollisionError::Invariant(format!(
            "member {} has name key '{}' in group '{}'",
            stray.path.display(),
            stray.name_key,
            group.name_key
        )));
    }

    let distinct_digests = group
        .members
        .iter()
        .map(|m| m.digest)
        .collect::<HashSet<_>>()
        .len();
    let classification = if distinct_digests > 1 {
        Classification::CriticalConflict
    } else {
        Classification::RedundantDuplicate
    };

    let members = group
        .members
        .iter()
        .map(|m| GroupMember {
            resource_dir: m.path.parent().map(Path::to_path_buf).unwrap_or_default(),
            resource: resource_name(root, &m.path),
            path: m.path.clone(),
            size: m.size,
            digest: hash_to_hex(&m.digest),
        })
        .collect();

    let file_name = group.members[0].file_name();
    let extension = Path::new(&group.name_key)
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_uppercase()))
        .unwrap_or_default();

    Ok(ClassifiedGroup {
        file_name,
        extension,
        classification,
        distinct_digests,
        members,
    })
}

/// Classify every group and order the result.
///
/// Conflicts come first, then duplicates; inside each class groups are
/// ordered by file name, case-insensitively.
///
/// # Errors
///
/// Fails fast on the first group violating [`classify_group`]'s preconditions.
pub fn classify_all(groups: &[FileGroup], root: &Path) -> Result<Vec<ClassifiedGroup>, CollisionError> {
    let mut classified = groups
        .iter()
        .map(|g| classify_group(g, root))
        .collect::<Result<Vec<_>, _>>()?;

    classified.sort_by(|a, b| {
        a.classification
            .cmp(&b.classification)
            .then_with(|| a.file_name.to_lowercase().cmp(&b.file_name.to_lowercase()))
            .then_with(|| a.file_name.cmp(&b.file_name))
    });
    Ok(classified)
}
