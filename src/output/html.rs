//! HTML report.
//!
//! A single self-contained page rendered with `askama` from
//! `templates/report.html`. CSS and the copy script are inline so the file
//! can be opened straight from disk. All paths go through askama's HTML
//! escaping. The copy button reads the folder from a `data-dir` attribute,
//! never from an inline script string.
//!
//! One section per extension, conflicts first, each group with a "fixed"
//! checkbox.

use std::io::Write;

use askama::Template;
use bytesize::ByteSize;

use super::{format_duration, patterns_ignored, patterns_searched};
use crate::collisions::{ClassifiedGroup, ScanResult};

/// View model for the report template.
#[derive(Template)]
#[template(path = "report.html")]
pub struct HtmlOutput {
    /// Formatted scan timestamp
    pub timestamp: String,
    /// Application version
    pub version: String,
    /// Scanned root
    pub root: String,
    /// Patterns searched, comma-separated
    pub searched: String,
    /// Patterns ignored, comma-separated
    pub ignored: String,
    /// Sum of distinct versions over all conflict groups
    pub conflicting_versions: usize,
    /// Number of conflict groups
    pub conflict_groups: usize,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Candidate files hashed
    pub files_scanned: usize,
    /// Human-readable scan duration
    pub duration: String,
    /// Whether Ctrl+C cut the scan short
    pub interrupted: bool,
    /// Per-extension sections
    pub sections: Vec<HtmlSection>,
    /// Script folders left out
    pub excluded: Vec<HtmlNote>,
    /// Unreadable files and directories
    pub skipped: Vec<HtmlNote>,
}

/// Groups of one extension.
pub struct HtmlSection {
    /// Extension, e.g. `.YMAP`
    pub extension: String,
    /// Critical conflict groups
    pub conflicts: Vec<HtmlGroup>,
    /// Redundant duplicate groups
    pub duplicates: Vec<HtmlGroup>,
}

/// A classified group formatted for HTML.
pub struct HtmlGroup {
    /// Unique element id for the status checkbox
    pub id: String,
    /// File name
    pub file_name: String,
    /// Distinct versions
    pub distinct_digests: usize,
    /// Member rows
    pub members: Vec<HtmlMember>,
}

/// One member row.
pub struct HtmlMember {
    /// Resource name
    pub resource: String,
    /// Full path
    pub path: String,
    /// Parent directory, copied by the button
    pub resource_dir: String,
    /// Human-readable size
    pub size: String,
    /// First 12 digest characters
    pub digest_short: String,
}

/// A path with a reason (excluded folder or skipped file).
pub struct HtmlNote {
    /// Path
    pub path: String,
    /// Reason
    pub reason: String,
}

impl HtmlOutput {
    /// Build the view model from a scan result.
    #[must_use]
    pub fn new(result: &ScanResult) -> Self {
        let mut counter = 0usize;
        let mut to_html_group = |group: &ClassifiedGroup, kind: &str| {
            counter += 1;
            HtmlGroup {
                id: format!("{kind}_{counter}"),
                file_name: group.file_name.clone(),
                distinct_digests: group.distinct_digests,
                members: group
                    .members
                    .iter()
                    .map(|m| HtmlMember {
                        resource: m.resource.clone(),
                        path: m.path.to_string_lossy().into_owned(),
                        resource_dir: m.resource_dir.to_string_lossy().into_owned(),
                        size: ByteSize::b(m.size).to_string(),
                        digest_short: m.digest.chars().take(12).collect(),
                    })
                    .collect(),
            }
        };

        let sections = result
            .by_extension()
            .into_iter()
            .map(|(extension, groups)| {
                let mut conflicts = Vec::new();
                let mut duplicates = Vec::new();
                for group in groups {
                    if group.is_conflict() {
                        conflicts.push(to_html_group(group, "conflict"));
                    } else {
                        duplicates.push(to_html_group(group, "duplicate"));
                    }
                }
                HtmlSection {
                    extension: extension.to_string(),
                    conflicts,
                    duplicates,
                }
            })
            .collect();

        Self {
            timestamp: result.scanned_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            root: result.root.to_string_lossy().into_owned(),
            searched: patterns_searched(result),
            ignored: patterns_ignored(result),
            conflicting_versions: result.counts.conflicting_versions,
            conflict_groups: result.counts.conflicts,
            duplicate_groups: result.counts.duplicates,
            files_scanned: result.files_scanned,
            duration: format_duration(result.duration),
            interrupted: result.interrupted,
            sections,
            excluded: result
                .excluded_paths
                .iter()
                .map(|e| HtmlNote {
                    path: e.path.to_string_lossy().into_owned(),
                    reason: e.reason.to_string(),
                })
                .collect(),
            skipped: result
                .skipped
                .iter()
                .map(|w| HtmlNote {
                    path: w.path.to_string_lossy().into_owned(),
                    reason: w.reason.clone(),
                })
                .collect(),
        }
    }

    /// Render the page.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn to_html(&self) -> Result<String, askama::Error> {
        self.render()
    }

    /// Render and write the page.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), HtmlOutputError> {
        let html = self.to_html()?;
        writer.write_all(html.as_bytes())?;
        Ok(())
    }
}

/// Errors that can occur during HTML output generation.
#[derive(thiserror::Error, Debug)]
pub enum HtmlOutputError {
    /// Template rendering error
    #[error("HTML template error: {0}")]
    Template(#[from] askama::Error),

    /// I/O error during writing
    #[error("I/O error during HTML generation: {0}")]
    Io(#[from] std::io::Error),
}
