//! Collision detection: grouping, classification, and the scan pipeline.
//!
//! - [`groups`]: Bucketing hashed candidates by file name
//! - [`classify`]: Duplicate vs. conflict verdicts and report ordering
//! - [`finder`]: The [`CollisionFinder`] orchestrator
//! - [`result`]: The [`ScanResult`] handed to renderers

pub mod classify;
pub mod finder;
pub mod groups;
pub mod result;

pub use classify::{classify_all, classify_group, Classification, ClassifiedGroup, GroupMember};
pub use finder::{hash_candidates, CollisionFinder, FinderConfig, FinderError, HashOutcome};
pub use groups::{group_by_name, Candidate, FileGroup, GroupingStats};
pub use result::{FileAccessWarning, ScanCounts, ScanResult};

/// Engine invariant violations. These indicate a bug, never bad input.
#[derive(thiserror::Error, Debug)]
pub enum CollisionError {
    /// A classifier precondition did not hold.
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}
