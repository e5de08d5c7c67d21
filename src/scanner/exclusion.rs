//! Best-effort detection of script resource folders.
//!
//! A FiveM server tree mixes map resources with gameplay scripts. Scripts
//! rarely stream assets, but they often ship their own `.ymt` or `.ytd`
//! files, which would show up as noise next to real map collisions. When the
//! heuristic is enabled, a direct child of the scan root is skipped if:
//!
//! 1. its name matches one of the script-name globs (`qb-*`, `esx_*`, ...), or
//! 2. it carries a resource manifest that does not declare the map marker and
//!    it has no `stream` directory.
//!
//! This is a heuristic. A map resource named `ox_interiors` is skipped too;
//! adjust the rules in the configuration when that happens.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Inputs of the script-folder heuristic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptFolderRules {
    /// Folder-name globs that identify scripts.
    pub name_patterns: Vec<String>,
    /// Resource manifest file names.
    pub manifest_names: Vec<String>,
    /// Manifest text that marks a map resource.
    pub map_marker: String,
    /// Directory holding streamed assets.
    pub stream_dir: String,
}

impl Default for ScriptFolderRules {
    fn default() -> Self {
        Self {
            name_patterns: ["qb-*", "qbx_*", "esx_*", "ox_*"]
                .into_iter()
                .map(String::from)
                .collect(),
            manifest_names: vec!["fxmanifest.lua".to_string(), "__resource.lua".to_string()],
            map_marker: "this_is_a_map".to_string(),
            stream_dir: "stream".to_string(),
        }
    }
}

/// Why a folder was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ExclusionReason {
    /// The folder name matched a script glob.
    NamePattern {
        /// The glob that matched
        pattern: String,
    },
    /// A manifest without the map marker and no stream directory.
    ScriptManifest {
        /// Manifest file name
        manifest: String,
    },
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NamePattern { pattern } => write!(f, "name matches '{pattern}'"),
            Self::ScriptManifest { manifest } => {
                write!(f, "{manifest} without map marker and no stream folder")
            }
        }
    }
}

/// A folder left out of the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExcludedFolder {
    /// Folder path
    pub path: PathBuf,
    /// Rule that flagged it
    pub reason: ExclusionReason,
}

const NAME_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled form of [`ScriptFolderRules`].
#[derive(Debug, Clone)]
pub struct ScriptFolderDetector {
    names: Vec<(String, Pattern)>,
    manifests: Vec<String>,
    marker: String,
    stream_dir: String,
}

impl ScriptFolderDetector {
    /// Compile the rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidGlob`] for a malformed name pattern.
    pub fn new(rules: &ScriptFolderRules) -> Result<Self, ConfigError> {
        let names = rules
            .name_patterns
            .iter()
            .map(|raw| {
                Pattern::new(raw)
                    .map(|p| (raw.clone(), p))
                    .map_err(|e| ConfigError::InvalidGlob {
                        pattern: raw.clone(),
                        reason: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            names,
            manifests: rules.manifest_names.clone(),
            marker: rules.map_marker.to_lowercase(),
            stream_dir: rules.stream_dir.clone(),
        })
    }

    /// Decide whether `dir` looks like a script resource.
    #[must_use]
    pub fn detect(&self, dir: &Path) -> Option<ExclusionReason> {
        let name = dir.file_name()?.to_string_lossy();

        if let Some((raw, _)) = self
            .names
            .iter()
            .find(|(_, p)| p.matches_with(&name, NAME_MATCH))
        {
            return Some(ExclusionReason::NamePattern {
                pattern: raw.clone(),
            });
        }

        let children = list_children(dir);
        let manifest = self.manifests.iter().find_map(|wanted| {
            children
                .iter()
                .find(|(child, is_dir)| !is_dir && child.eq_ignore_ascii_case(wanted))
                .map(|(child, _)| child.clone())
        })?;

        if children
            .iter()
            .any(|(child, is_dir)| *is_dir && child.eq_ignore_ascii_case(&self.stream_dir))
        {
            return None;
        }

        if self.declares_map(&dir.join(&manifest)) {
            return None;
        }

        Some(ExclusionReason::ScriptManifest { manifest })
    }

    fn declares_map(&self, manifest: &Path) -> bool {
        match fs::read(manifest) {
            Ok(bytes) => String::from_utf8_lossy(&bytes)
                .to_lowercase()
                .contains(&self.marker),
            Err(e) => {
                // Unreadable manifest: keep the folder in the scan.
                log::debug!("Cannot read manifest {}: {}", manifest.display(), e);
                true
            }
        }
    }
}

fn list_children(dir: &Path) -> Vec<(String, bool)> {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return Vec::new();
    };
    read_dir
        .filter_map(Result::ok)
        .map(|entry| {
            let is_dir = entry.path().is_dir();
            (entry.file_name().to_string_lossy().into_owned(), is_dir)
        })
        .collect()
}
