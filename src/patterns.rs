//! Asset filename patterns and the active selection for a run.
//!
//! The catalog lists every streamed asset type the scanner knows about. A
//! [`PatternSet`] is the subset enabled for one scan; a file is a candidate
//! when its name matches at least one enabled rule.
//!
//! # Example
//!
//! ```
//! use mapclash::patterns::PatternSet;
//! use std::collections::BTreeMap;
//!
//! let mut overrides = BTreeMap::new();
//! overrides.insert("*.ydr".to_string(), true);
//! overrides.insert("*.ytd".to_string(), false);
//!
//! let set = PatternSet::from_enablement(&overrides).unwrap();
//! assert!(set.matches("Prop_Fence.YDR"));
//! assert!(!set.matches("textures.ytd"));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Label of the composite light-map rule.
pub const LIGHT_YMAPS: &str = "light_ymaps";

/// How strongly a pattern is recommended for collision scans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternCategory {
    /// Collisions here break placement or collision meshes.
    Critical,
    /// Usually worth scanning.
    Recommended,
    /// Off unless asked for.
    Optional,
}

impl fmt::Display for PatternCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::Recommended => write!(f, "recommended"),
            Self::Optional => write!(f, "optional"),
        }
    }
}

/// Matching strategy of a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Plain filename glob, e.g. `*.ybn`.
    Glob(&'static str),
    /// `lodlights*.ymap` or `vw_*.ymap`.
    LightMap,
}

/// One entry of the pattern catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternRule {
    /// Stable label used in configuration and reports
    pub label: &'static str,
    /// How filenames are matched
    pub kind: PatternKind,
    /// Human description of the asset type
    pub description: &'static str,
    /// Recommendation level
    pub category: PatternCategory,
}

impl PatternRule {
    /// Rules in the critical and recommended categories are on by default.
    #[must_use]
    pub fn default_enabled(&self) -> bool {
        self.category != PatternCategory::Optional
    }
}

/// Every known asset pattern, in presentation order.
pub const CATALOG: &[PatternRule] = &[
    PatternRule {
        label: "*.ymap",
        kind: PatternKind::Glob("*.ymap"),
        description: "Map Data (Map Placement/Details)",
        category: PatternCategory::Critical,
    },
    PatternRule {
        label: LIGHT_YMAPS,
        kind: PatternKind::LightMap,
        description: "Light Map Files (lodlights*.ymap / vw_*.ymap)",
        category: PatternCategory::Recommended,
    },
    PatternRule {
        label: "*.ybn",
        kind: PatternKind::Glob("*.ybn"),
        description: "Bounds/Collision Data",
        category: PatternCategory::Critical,
    },
    PatternRule {
        label: "*.ymt",
        kind: PatternKind::Glob("*.ymt"),
        description: "Meta/Config Files",
        category: PatternCategory::Recommended,
    },
    PatternRule {
        label: "*.ytd",
        kind: PatternKind::Glob("*.ytd"),
        description: "Textures Dictionary",
        category: PatternCategory::Recommended,
    },
    PatternRule {
        label: "*.ydr",
        kind: PatternKind::Glob("*.ydr"),
        description: "Drawable (3D Models)",
        category: PatternCategory::Optional,
    },
    PatternRule {
        label: "*.ydd",
        kind: PatternKind::Glob("*.ydd"),
        description: "Drawable Dictionary (Model Container)",
        category: PatternCategory::Optional,
    },
    PatternRule {
        label: "*.ytyp",
        kind: PatternKind::Glob("*.ytyp"),
        description: "Types/Manifest (Map/MLO Definitions)",
        category: PatternCategory::Optional,
    },
    PatternRule {
        label: "*.ycd",
        kind: PatternKind::Glob("*.ycd"),
        description: "Clip Dictionary (Animations)",
        category: PatternCategory::Optional,
    },
    PatternRule {
        label: "*.ynv",
        kind: PatternKind::Glob("*.ynv"),
        description: "Navigation Mesh (AI Navigation)",
        category: PatternCategory::Optional,
    },
    PatternRule {
        label: "*.ypt",
        kind: PatternKind::Glob("*.ypt"),
        description: "Particle Effects (FX)",
        category: PatternCategory::Optional,
    },
];

/// Check whether a lowercased filename is a light map.
#[must_use]
pub fn is_light_map(name_lower: &str) -> bool {
    name_lower.ends_with(".ymap")
        && (name_lower.starts_with("lodlights") || name_lower.starts_with("vw_"))
}

/// Look up a catalog rule, accepting `ydr`, `.ydr` and `*.ydr` alike.
#[must_use]
pub fn find_rule(label: &str) -> Option<&'static PatternRule> {
    let wanted = normalize_label(label);
    CATALOG.iter().find(|rule| rule.label == wanted)
}

fn normalize_label(label: &str) -> String {
    let label = label.trim().to_lowercase();
    if label == LIGHT_YMAPS || label.starts_with("*.") {
        label
    } else if let Some(ext) = label.strip_prefix('.') {
        format!("*.{ext}")
    } else {
        format!("*.{label}")
    }
}

fn known_labels() -> String {
    CATALOG
        .iter()
        .map(|r| r.label)
        .collect::<Vec<_>>()
        .join(", ")
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A compiled rule, ready for matching.
#[derive(Debug, Clone)]
struct ActiveRule {
    rule: &'static PatternRule,
    glob: Option<Pattern>,
}

impl ActiveRule {
    fn compile(rule: &'static PatternRule) -> Self {
        let glob = match rule.kind {
            // Catalog globs are literals known to be valid.
            PatternKind::Glob(pattern) => Pattern::new(pattern).ok(),
            PatternKind::LightMap => None,
        };
        Self { rule, glob }
    }

    fn matches(&self, name_lower: &str) -> bool {
        match (&self.rule.kind, &self.glob) {
            (PatternKind::LightMap, _) => is_light_map(name_lower),
            (PatternKind::Glob(_), Some(glob)) => glob.matches_with(name_lower, MATCH_OPTIONS),
            (PatternKind::Glob(_), None) => false,
        }
    }
}

/// The enabled patterns for one scan.
#[derive(Debug, Clone)]
pub struct PatternSet {
    active: Vec<ActiveRule>,
}

impl PatternSet {
    /// The default recommendation: critical and recommended rules.
    #[must_use]
    pub fn defaults() -> Self {
        Self::from_rules(CATALOG.iter().filter(|r| r.default_enabled()))
    }

    fn from_rules(rules: impl Iterator<Item = &'static PatternRule>) -> Self {
        Self {
            active: rules.map(ActiveRule::compile).collect(),
        }
    }

    /// Build a set from exactly the given labels.
    ///
    /// # Errors
    ///
    /// Fails on unknown labels or an empty selection.
    pub fn from_labels<S: AsRef<str>>(labels: &[S]) -> Result<Self, ConfigError> {
        let mut wanted = Vec::with_capacity(labels.len());
        for label in labels {
            let rule = find_rule(label.as_ref()).ok_or_else(|| ConfigError::UnknownPattern {
                label: label.as_ref().to_string(),
                known: known_labels(),
            })?;
            wanted.push(rule.label);
        }
        let set = Self::from_rules(CATALOG.iter().filter(|r| wanted.contains(&r.label)));
        if set.active.is_empty() {
            return Err(ConfigError::NoPatternsEnabled);
        }
        Ok(set)
    }

    /// Start from the defaults and apply a label → enabled map.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPattern`] for labels outside the catalog
    /// and [`ConfigError::NoPatternsEnabled`] when nothing is left enabled.
    pub fn from_enablement(overrides: &BTreeMap<String, bool>) -> Result<Self, ConfigError> {
        let mut enabled: Vec<bool> = CATALOG.iter().map(PatternRule::default_enabled).collect();

        for (label, &on) in overrides {
            let idx = CATALOG
                .iter()
                .position(|r| r.label == normalize_label(label))
                .ok_or_else(|| ConfigError::UnknownPattern {
                    label: label.clone(),
                    known: known_labels(),
                })?;
            enabled[idx] = on;
        }

        let set = Self::from_rules(
            CATALOG
                .iter()
                .zip(enabled)
                .filter_map(|(rule, on)| on.then_some(rule)),
        );
        if set.active.is_empty() {
            return Err(ConfigError::NoPatternsEnabled);
        }
        Ok(set)
    }

    /// Check a filename against the enabled rules (case-insensitive).
    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        self.active.iter().any(|r| r.matches(&lower))
    }

    /// Labels of every enabled rule matching `file_name`.
    #[must_use]
    pub fn matching_labels(&self, file_name: &str) -> Vec<&'static str> {
        let lower = file_name.to_lowercase();
        self.active
            .iter()
            .filter(|r| r.matches(&lower))
            .map(|r| r.rule.label)
            .collect()
    }

    /// Whether a rule is part of this set.
    #[must_use]
    pub fn is_enabled(&self, label: &str) -> bool {
        find_rule(label).is_some_and(|rule| self.active.iter().any(|r| r.rule.label == rule.label))
    }

    /// Labels of the enabled rules, in catalog order.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.active.iter().map(|r| r.rule.label.to_string()).collect()
    }

    /// Labels of the catalog rules that are not enabled.
    #[must_use]
    pub fn disabled_labels(&self) -> Vec<String> {
        CATALOG
            .iter()
            .filter(|rule| !self.active.iter().any(|r| r.rule.label == rule.label))
            .map(|rule| rule.label.to_string())
            .collect()
    }

    /// Number of enabled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// True when no rule is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::defaults()
    }
}
