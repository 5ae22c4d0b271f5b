//! Detector catalog: filename suffix vocabulary for result files
//!
//! The harness names every result file `<scenario>_<feature>[_lock_order]`,
//! where `<feature>` identifies the detector build. The catalog maps those
//! suffixes to short column labels and human descriptions.
//!
//! Entries are consulted in order and the first suffix match wins, so a
//! specific compound suffix must be listed before any shorter suffix it ends
//! with. [`DetectorCatalog::new`] rejects catalogs that break this rule.
//!
//! The catalog is built once at startup and passed by reference to the
//! classifier and the report renderers.

use crate::error::{AnalysisError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default suffix marking a detector paired with the lock-order checker
pub const LOCK_ORDER_TOKEN: &str = "lock_order";

/// Suffix appended to a column label for its lock-order pairing
pub const LOCK_ORDER_COLUMN_SUFFIX: &str = "+LO";

/// Scenarios built to trip lock-order graphs without a real circular wait
pub const DEFAULT_LOCK_ORDER_FP_SCENARIOS: [&str; 2] =
    ["lock_order_inversion_fp", "complex_lock_order_fp"];

/// Broad family of a detector, used for column ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectorKind {
    /// Plain Deloxide without stress injection
    Vanilla,
    /// Deloxide with a stress-injection mode
    Stress,
    /// Detectors from other crates, and baselines without a detector
    ThirdParty,
}

/// One catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorEntry {
    /// Filename suffix without the leading underscore
    pub suffix: String,
    /// Short column label (e.g. `DX-Agg`)
    pub label: String,
    pub description: String,
    pub kind: DetectorKind,
    /// Detector checks lock order even without the lock-order suffix
    #[serde(default)]
    pub lock_order_aware: bool,
}

impl DetectorEntry {
    fn new(suffix: &str, label: &str, description: &str, kind: DetectorKind) -> Self {
        Self {
            suffix: suffix.to_string(),
            label: label.to_string(),
            description: description.to_string(),
            kind,
            lock_order_aware: false,
        }
    }

    fn token(&self) -> String {
        format!("_{}", self.suffix)
    }
}

/// On-disk catalog layout (TOML)
///
/// ```toml
/// lock_order_fp_scenarios = ["lock_order_inversion_fp"]
///
/// [[detector]]
/// suffix = "parking_lot"
/// label = "PL"
/// description = "parking_lot deadlock detector"
/// kind = "third_party"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default, rename = "detector")]
    detectors: Vec<DetectorEntry>,
    #[serde(default)]
    lock_order_token: Option<String>,
    #[serde(default)]
    lock_order_fp_scenarios: Option<Vec<String>>,
}

/// A suffix match against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuffixMatch<'a> {
    pub entry: &'a DetectorEntry,
    /// Text before `_<suffix>`
    pub prefix: &'a str,
}

/// Immutable, priority-ordered detector vocabulary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorCatalog {
    entries: Vec<DetectorEntry>,
    lock_order_token: String,
    lock_order_fp_scenarios: Vec<String>,
}

impl Default for DetectorCatalog {
    fn default() -> Self {
        use DetectorKind::{Stress, ThirdParty, Vanilla};

        let entries = vec![
            DetectorEntry::new("parking_lot", "PL", "parking_lot deadlock detector", ThirdParty),
            DetectorEntry::new("no_deadlocks", "ND", "no_deadlocks detector", ThirdParty),
            DetectorEntry::new("deloxide_random_default", "DX-Rand", "Deloxide + Random Stress", Stress),
            DetectorEntry::new("deloxide_aggressive", "DX-Agg", "Deloxide + Aggressive Stress", Stress),
            DetectorEntry::new("deloxide_gentle", "DX-Gent", "Deloxide + Gentle Stress", Stress),
            DetectorEntry::new(
                "deloxide_component_based_delays",
                "DX-Comp",
                "Deloxide + Component Stress",
                Stress,
            ),
            // Feature names written by newer harness builds
            DetectorEntry::new("stress_random", "DX-Rand", "Deloxide + Random Stress", Stress),
            DetectorEntry::new("stress_aggressive", "DX-Agg", "Deloxide + Aggressive Stress", Stress),
            DetectorEntry::new("stress_gentle", "DX-Gent", "Deloxide + Gentle Stress", Stress),
            DetectorEntry::new("stress_component", "DX-Comp", "Deloxide + Component Stress", Stress),
            DetectorEntry::new("deloxide", "DX", "Deloxide (vanilla)", Vanilla),
            DetectorEntry::new("std", "STD", "std::sync (no detector)", ThirdParty),
        ];

        Self {
            entries,
            lock_order_token: LOCK_ORDER_TOKEN.to_string(),
            lock_order_fp_scenarios: DEFAULT_LOCK_ORDER_FP_SCENARIOS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl DetectorCatalog {
    /// Build a catalog, validating suffix priority
    pub fn new(entries: Vec<DetectorEntry>) -> Result<Self> {
        Self::with_options(
            entries,
            LOCK_ORDER_TOKEN.to_string(),
            DEFAULT_LOCK_ORDER_FP_SCENARIOS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    fn with_options(
        entries: Vec<DetectorEntry>,
        lock_order_token: String,
        lock_order_fp_scenarios: Vec<String>,
    ) -> Result<Self> {
        if entries.is_empty() {
            return Err(AnalysisError::InvalidCatalog(
                "catalog has no detector entries".to_string(),
            ));
        }
        if lock_order_token.is_empty() {
            return Err(AnalysisError::InvalidCatalog(
                "lock order token must not be empty".to_string(),
            ));
        }

        for (i, entry) in entries.iter().enumerate() {
            if entry.suffix.is_empty() || entry.label.is_empty() {
                return Err(AnalysisError::InvalidCatalog(format!(
                    "entry {} has an empty suffix or label",
                    i + 1
                )));
            }
            if entry.label.ends_with(LOCK_ORDER_COLUMN_SUFFIX) {
                return Err(AnalysisError::InvalidCatalog(format!(
                    "label '{}' must not end with '{}'",
                    entry.label, LOCK_ORDER_COLUMN_SUFFIX
                )));
            }

            let token = entry.token();
            for later in &entries[i + 1..] {
                if later.suffix == entry.suffix {
                    return Err(AnalysisError::InvalidCatalog(format!(
                        "suffix '{}' is listed twice",
                        entry.suffix
                    )));
                }
                if later.token().ends_with(&token) {
                    return Err(AnalysisError::InvalidCatalog(format!(
                        "suffix '{}' shadows the more specific '{}'; list '{}' first",
                        entry.suffix, later.suffix, later.suffix
                    )));
                }
            }
        }

        Ok(Self {
            entries,
            lock_order_token,
            lock_order_fp_scenarios,
        })
    }

    /// Parse a TOML catalog
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile =
            toml::from_str(text).map_err(|e| AnalysisError::InvalidCatalog(e.to_string()))?;

        let lock_order_fp_scenarios = file.lock_order_fp_scenarios.unwrap_or_else(|| {
            DEFAULT_LOCK_ORDER_FP_SCENARIOS
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

        Self::with_options(
            file.detectors,
            file.lock_order_token
                .unwrap_or_else(|| LOCK_ORDER_TOKEN.to_string()),
            lock_order_fp_scenarios,
        )
    }

    /// Load a TOML catalog from disk
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::InvalidCatalog(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }

    pub fn entries(&self) -> &[DetectorEntry] {
        &self.entries
    }

    pub fn lock_order_token(&self) -> &str {
        &self.lock_order_token
    }

    pub fn lock_order_fp_scenarios(&self) -> &[String] {
        &self.lock_order_fp_scenarios
    }

    pub fn is_lock_order_fp_scenario(&self, scenario: &str) -> bool {
        self.lock_order_fp_scenarios.iter().any(|s| s == scenario)
    }

    /// Match the end of `name` against the catalog, first entry wins
    ///
    /// The text before the suffix must be non-empty.
    pub fn match_suffix<'a>(&'a self, name: &'a str) -> Option<SuffixMatch<'a>> {
        self.entries.iter().find_map(|entry| {
            let prefix = name.strip_suffix(entry.token().as_str())?;
            if prefix.is_empty() {
                None
            } else {
                Some(SuffixMatch { entry, prefix })
            }
        })
    }

    /// Look up an entry whose suffix is exactly `suffix`
    pub fn lookup(&self, suffix: &str) -> Option<&DetectorEntry> {
        self.entries.iter().find(|e| e.suffix == suffix)
    }

    /// Description for a column label, including `+LO` pairings
    pub fn describe(&self, column: &str) -> Option<String> {
        if let Some(base) = column.strip_suffix(LOCK_ORDER_COLUMN_SUFFIX) {
            return self
                .describe_label(base)
                .map(|d| format!("{} + Lock Order", d));
        }
        self.describe_label(column).map(str::to_string)
    }

    fn describe_label(&self, label: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.label == label)
            .map(|e| e.description.as_str())
    }

    /// Preferred column order for comparison tables
    ///
    /// Vanilla, then stress variants, then third-party detectors. Labels keep
    /// their first catalog position within a kind, and each label is followed
    /// by its lock-order pairing.
    pub fn column_order(&self) -> Vec<String> {
        let mut labels: Vec<(DetectorKind, usize, &str)> = Vec::new();
        for (position, entry) in self.entries.iter().enumerate() {
            if !labels.iter().any(|(_, _, l)| *l == entry.label) {
                labels.push((entry.kind, position, entry.label.as_str()));
            }
        }
        labels.sort();

        labels
            .into_iter()
            .flat_map(|(_, _, label)| {
                [
                    label.to_string(),
                    format!("{}{}", label, LOCK_ORDER_COLUMN_SUFFIX),
                ]
            })
            .collect()
    }
}

/// Column label for a detector label, with the lock-order pairing if present
pub fn column_label(label: &str, has_lock_order_variant: bool) -> String {
    if has_lock_order_variant {
        format!("{}{}", label, LOCK_ORDER_COLUMN_SUFFIX)
    } else {
        label.to_string()
    }
}
