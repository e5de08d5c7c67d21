//! Text report in Lua comment syntax.
//!
//! Every line is a Lua comment, so the report can be saved next to a
//! resource's `fxmanifest.lua` without the server choking on it.

use std::fmt::{self, Display};

use super::{format_duration, patterns_ignored, patterns_searched};
use crate::collisions::{ClassifiedGroup, ScanResult};

const BANNER: &str = "-- ###################################################";
const SEPARATOR_WIDTH: usize = 120;

/// Text report renderer.
pub struct TextOutput<'a> {
    result: &'a ScanResult,
}

impl<'a> TextOutput<'a> {
    /// Create a renderer for `result`.
    #[must_use]
    pub fn new(result: &'a ScanResult) -> Self {
        Self { result }
    }

    /// Render the full report.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    fn write_header(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        writeln!(f, "{BANNER}")?;
        writeln!(f, "-- #          FIVEM MAP COLLISION REPORT (LUA)        #")?;
        writeln!(f, "{BANNER}")?;
        writeln!(f, "-- Scan Time: {}", r.scanned_at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(f, "-- Target Directory: {}", r.root.display())?;
        writeln!(f, "-- File Patterns Searched: {}", patterns_searched(r))?;
        writeln!(f, "-- File Patterns Ignored: {}", patterns_ignored(r))?;
        writeln!(
            f,
            "-- Files Hashed: {} in {}",
            r.files_scanned,
            format_duration(r.duration)
        )?;
        if r.interrupted {
            writeln!(f, "-- WARNING: Scan interrupted, results are partial")?;
        }
        writeln!(f)
    }

    fn write_groups(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        if r.groups.is_empty() {
            writeln!(f, "-- No collisions or duplicates found!")?;
        }

        let separator = format!("--{}--", "#".repeat(SEPARATOR_WIDTH));
        for (idx, (extension, groups)) in r.by_extension().into_iter().enumerate() {
            if idx > 0 {
                writeln!(f, "{separator}")?;
            }
            writeln!(f, "-- --- {extension} Collisions ---")?;

            let (conflicts, duplicates): (Vec<_>, Vec<_>) =
                groups.into_iter().partition(|g| g.is_conflict());
            if !conflicts.is_empty() {
                writeln!(f, " -- [CRITICAL CONFLICTS] (Same Name, Different Content)")?;
                for group in conflicts {
                    write_group(f, group)?;
                }
            }
            if !duplicates.is_empty() {
                writeln!(f, " -- [Redundant Duplicates] (Same Name, Identical Content)")?;
                for group in duplicates {
                    write_group(f, group)?;
                }
            }
        }
        Ok(())
    }

    fn write_footer(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        if !r.excluded_paths.is_empty() {
            writeln!(f)?;
            writeln!(f, "-- --- Excluded Script Folders ---")?;
            for folder in &r.excluded_paths {
                writeln!(f, "--   {} ({})", folder.path.display(), folder.reason)?;
            }
        }

        if !r.skipped.is_empty() {
            writeln!(f)?;
            writeln!(f, "-- --- Skipped Files ---")?;
            for warning in &r.skipped {
                writeln!(f, "--   {}", warning.reason)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "-- --- Final Summary ---")?;
        writeln!(
            f,
            "-- Total Critical Conflicts Found: {}",
            r.counts.conflicting_versions
        )?;
        writeln!(
            f,
            "-- Total Redundant Duplicates Found: {}",
            r.counts.duplicates
        )?;
        writeln!(f, "-- Files Skipped (unreadable): {}", r.skipped_count())?;
        writeln!(f, "{BANNER}")
    }
}

impl Display for TextOutput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_header(f)?;
        self.write_groups(f)?;
        self.write_footer(f)
    }
}

fn write_group(f: &mut fmt::Formatter<'_>, group: &ClassifiedGroup) -> fmt::Result {
    if group.is_conflict() {
        writeln!(
            f,
            "  -- - File: {} ({} versions)",
            group.file_name, group.distinct_digests
        )?;
    } else {
        writeln!(f, "  -- - File: {}", group.file_name)?;
    }
    for member in &group.members {
        writeln!(
            f,
            "    --   Resource: {:<25} Path: {}",
            member.resource,
            member.path.display()
        )?;
    }
    Ok(())
}
