//! Filename keys and resource names.
//!
//! Files are grouped by their base name regardless of case, and regardless of
//! Unicode normalization form. macOS stores names decomposed (NFD) while
//! Windows and Linux usually store them composed (NFC); without normalizing,
//! `café.ymap` copied between machines would never be grouped.

use std::path::{Component, Path};

use unicode_normalization::UnicodeNormalization;

/// Normalize a string to NFC form.
///
/// ```
/// use mapclash::scanner::path_utils::normalize_str;
///
/// assert_eq!(normalize_str("cafe\u{0301}.ymap"), "café.ymap");
/// ```
#[must_use]
pub fn normalize_str(s: &str) -> String {
    s.nfc().collect()
}

/// Grouping key for a file: NFC-normalized, lowercased base name.
///
/// Returns `None` for paths without a final component (e.g. `/` or `..`).
///
/// ```
/// use mapclash::scanner::path_utils::name_key;
/// use std::path::Path;
///
/// assert_eq!(name_key(Path::new("/res/MLO_A/Data.YMAP")).as_deref(), Some("data.ymap"));
/// ```
#[must_use]
pub fn name_key(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| normalize_str(&name.to_string_lossy()).to_lowercase())
}

/// Name of the resource that owns `path`: its first component under `root`.
///
/// Files lying directly in the root belong to no resource and report
/// `"ROOT_DIR"`.
#[must_use]
pub fn resource_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let mut components = relative.components().filter_map(|c| match c {
        Component::Normal(name) => Some(name),
        _ => None,
    });
    match (components.next(), components.next()) {
        (Some(first), Some(_)) => first.to_string_lossy().into_owned(),
        _ => "ROOT_DIR".to_string(),
    }
}
