//! Filename classifier
//!
//! Decomposes a result-file stem into scenario, detector and lock-order
//! variant, and assigns the test category that decides how rows are judged.
//!
//! ```text
//! lock_order_inversion_fp_deloxide_lock_order
//! └────── scenario ─────┘ └detector┘└variant─┘
//! ```

use crate::catalog::{column_label, DetectorCatalog, DetectorEntry};
use crate::discovery::Collection;
use crate::error::{AnalysisError, Result};
use serde::Serialize;

/// Separator between a false-positive scenario and its detector suffix
pub const FP_MARKER: &str = "_fp_";

/// How the rows of a result file are judged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TestCategory {
    /// Heisenbug deadlock test
    Probabilistic,
    /// Barrier-synchronized deadlock test
    Guaranteed,
    /// Must never be flagged by any detector
    FalsePositiveTraditional,
    /// Lock-order scenario observed by a lock-order detector: flags are a
    /// known limitation of lock-order graphs
    FalsePositiveLockOrder,
}

impl TestCategory {
    pub fn is_false_positive(self) -> bool {
        matches!(
            self,
            TestCategory::FalsePositiveTraditional | TestCategory::FalsePositiveLockOrder
        )
    }
}

/// Semantic fields derived from a result-file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub scenario: String,
    /// Catalog label, e.g. `DX-Agg`
    pub detector_label: String,
    /// Matched catalog suffix, e.g. `deloxide_aggressive`
    pub detector_suffix: String,
    pub has_lock_order_variant: bool,
    /// Detector checks lock order (variant suffix or catalog flag)
    pub lock_order_detector: bool,
    pub category: TestCategory,
}

impl Classification {
    /// Comparison column: label plus `+LO` for lock-order variants
    pub fn column(&self) -> String {
        column_label(&self.detector_label, self.has_lock_order_variant)
    }
}

/// Table-driven classifier over a detector catalog
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    catalog: &'a DetectorCatalog,
}

impl<'a> Classifier<'a> {
    pub fn new(catalog: &'a DetectorCatalog) -> Self {
        Self { catalog }
    }

    /// Classify a bare file stem found in `collection`
    pub fn classify(&self, name: &str, collection: Collection) -> Result<Classification> {
        let unrecognized = || AnalysisError::Unrecognized {
            name: name.to_string(),
        };

        let variant_token = format!("_{}", self.catalog.lock_order_token());
        let (stem, has_lock_order_variant) = match name.strip_suffix(variant_token.as_str()) {
            Some(stem) if !stem.is_empty() => (stem, true),
            _ => (name, false),
        };

        let (scenario, entry, false_positive) = match self.split_false_positive(stem) {
            Some((scenario, entry)) => (scenario, entry, true),
            None => {
                let m = self.catalog.match_suffix(stem).ok_or_else(unrecognized)?;
                let marked = m.prefix.contains(FP_MARKER) || m.prefix.ends_with("_fp");
                (m.prefix.to_string(), m.entry, marked)
            }
        };

        let lock_order_detector = has_lock_order_variant || entry.lock_order_aware;
        let category = if false_positive {
            if self.catalog.is_lock_order_fp_scenario(&scenario) && lock_order_detector {
                TestCategory::FalsePositiveLockOrder
            } else {
                TestCategory::FalsePositiveTraditional
            }
        } else if collection == Collection::Guaranteed {
            TestCategory::Guaranteed
        } else {
            TestCategory::Probabilistic
        };

        Ok(Classification {
            scenario,
            detector_label: entry.label.clone(),
            detector_suffix: entry.suffix.clone(),
            has_lock_order_variant,
            lock_order_detector,
            category,
        })
    }

    /// Split `<scenario>_fp_<detector>` where `<detector>` is a catalog suffix
    ///
    /// The scenario keeps its `_fp` ending. Every marker position is tried so
    /// a scenario that itself contains the marker still splits correctly.
    fn split_false_positive(&self, stem: &str) -> Option<(String, &'a DetectorEntry)> {
        stem.match_indices(FP_MARKER).find_map(|(index, _)| {
            let prefix = &stem[..index];
            let detector = &stem[index + FP_MARKER.len()..];
            if prefix.is_empty() {
                return None;
            }
            let entry = self.catalog.lookup(detector)?;
            Some((format!("{}_fp", prefix), entry))
        })
    }
}
