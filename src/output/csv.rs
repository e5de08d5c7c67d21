//! CSV output for scan results.
//!
//! One row per group member.
//!
//! # Columns
//!
//! - `group_id`: 1-based group number in report order
//! - `classification`: `CRITICAL_CONFLICT` or `REDUNDANT_DUPLICATE`
//! - `file_name`: Colliding file name
//! - `resource`: Resource the file belongs to
//! - `path`: Full path
//! - `resource_dir`: Directory containing the file
//! - `size`: Size in bytes
//! - `digest`: BLAKE3 digest (hex)

use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::collisions::ScanResult;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    classification: String,
    file_name: &'a str,
    resource: &'a str,
    path: String,
    resource_dir: String,
    size: u64,
    digest: &'a str,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    result: &'a ScanResult,
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(result: &'a ScanResult) -> Self {
        Self { result }
    }

    /// Write the CSV output to the given writer.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for (idx, group) in self.result.groups.iter().enumerate() {
            let classification = group.classification.to_string();
            for member in &group.members {
                csv_writer.serialize(CsvRow {
                    group_id: idx + 1,
                    classification: classification.clone(),
                    file_name: &group.file_name,
                    resource: &member.resource,
                    path: member.path.to_string_lossy().into_owned(),
                    resource_dir: member.resource_dir.to_string_lossy().into_owned(),
                    size: member.size,
                    digest: &member.digest,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
