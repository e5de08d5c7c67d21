//! Colored terminal output printed after a scan: the per-group listing
//! ([`ConsoleReport`]) and the closing counters ([`ConsoleSummary`]).

use std::fmt::{self, Display};
use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Paint, Style};

use super::format_duration;
use crate::collisions::{ClassifiedGroup, ScanResult};

const CONFLICT: Style = Style::new().red().bold();
const DUPLICATE: Style = Style::new().yellow().bold();
const NEUTRAL: Style = Style::new().green();
const HEADING: Style = Style::new().cyan().bold();
const FILE: Style = Style::new().yellow();

fn paint<T: Display>(color: bool, value: T, style: Style) -> String {
    if color {
        value.paint(style).to_string()
    } else {
        value.to_string()
    }
}

/// Every collision group, listed by extension.
pub struct ConsoleReport<'a> {
    result: &'a ScanResult,
    color: bool,
}

impl<'a> ConsoleReport<'a> {
    /// Create a listing; `color` enables ANSI styling.
    #[must_use]
    pub fn new(result: &'a ScanResult, color: bool) -> Self {
        Self { result, color }
    }

    /// Write the listing to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")
    }

    fn write_group(&self, f: &mut fmt::Formatter<'_>, group: &ClassifiedGroup) -> fmt::Result {
        if group.is_conflict() {
            writeln!(
                f,
                "  - File: {} ({} versions)",
                paint(self.color, &group.file_name, FILE),
                group.distinct_digests
            )?;
        } else {
            writeln!(f, "  - File: {}", paint(self.color, &group.file_name, FILE))?;
        }
        for member in &group.members {
            writeln!(
                f,
                "    - Resource: {:<25} Path: {}",
                member.resource,
                member.path.display()
            )?;
        }
        Ok(())
    }
}

impl Display for ConsoleReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", paint(self.color, "--- Detailed Console Report ---", HEADING))?;
        if self.result.groups.is_empty() {
            return writeln!(f, "No collisions or duplicates found.");
        }

        for (idx, (extension, groups)) in self.result.by_extension().into_iter().enumerate() {
            if idx > 0 {
                writeln!(f, "{}", "-".repeat(50))?;
            }
            writeln!(f, "--- {extension} Collisions ---")?;

            let (conflicts, duplicates): (Vec<_>, Vec<_>) =
                groups.into_iter().partition(|g| g.is_conflict());
            if !conflicts.is_empty() {
                writeln!(
                    f,
                    "{}",
                    paint(self.color, "[CRITICAL CONFLICTS] (Same Name, Different Content)", CONFLICT)
                )?;
                for group in conflicts {
                    self.write_group(f, group)?;
                }
            }
            if !duplicates.is_empty() {
                writeln!(
                    f,
                    "{}",
                    paint(self.color, "[Redundant Duplicates] (Same Name, Identical Content)", DUPLICATE)
                )?;
                for group in duplicates {
                    self.write_group(f, group)?;
                }
            }
        }
        Ok(())
    }
}

/// Terminal summary of a [`ScanResult`].
pub struct ConsoleSummary<'a> {
    result: &'a ScanResult,
    color: bool,
}

impl<'a> ConsoleSummary<'a> {
    /// Create a summary; `color` enables ANSI styling.
    #[must_use]
    pub fn new(result: &'a ScanResult, color: bool) -> Self {
        Self { result, color }
    }

    fn paint<T: Display>(&self, value: T, style: Style) -> String {
        paint(self.color, value, style)
    }

    /// Write the summary to `writer`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

impl Display for ConsoleSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;
        let grouped_bytes: u64 = r
            .groups
            .iter()
            .flat_map(|g| g.members.iter())
            .map(|m| m.size)
            .sum();

        writeln!(f, "{}", self.paint("Scan complete", HEADING))?;
        writeln!(
            f,
            "  Files hashed:          {} in {}",
            self.paint(r.files_scanned, NEUTRAL),
            self.paint(format_duration(r.duration), NEUTRAL)
        )?;
        writeln!(
            f,
            "  Critical conflicts:    {} ({} versions)",
            self.paint(r.counts.conflicts, CONFLICT),
            r.counts.conflicting_versions
        )?;
        writeln!(
            f,
            "  Redundant duplicates:  {}",
            self.paint(r.counts.duplicates, DUPLICATE)
        )?;
        writeln!(
            f,
            "  Files in groups:       {} ({})",
            r.counts.grouped_files,
            ByteSize::b(grouped_bytes)
        )?;
        if !r.excluded_paths.is_empty() {
            writeln!(f, "  Script folders skipped: {}", r.excluded_paths.len())?;
        }
        if !r.skipped.is_empty() {
            writeln!(
                f,
                "  Unreadable files:      {}",
                self.paint(r.skipped_count(), DUPLICATE)
            )?;
        }
        if r.interrupted {
            writeln!(
                f,
                "{}",
                self.paint("Scan interrupted: results are partial", CONFLICT)
            )?;
        }
        Ok(())
    }
}
