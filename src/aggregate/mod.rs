// Aggregation of classified result files into report statistics
//
// Three independent modes share the same input: a parsed result file paired
// with its filename classification.
//
// - detection: per-file detection, timeout and latency rates over all rows
// - comparison: per-scenario detector grid; timed-out rows are excluded
//   because their detection outcome is indeterminate
// - false_positive: per-file verdicts for tests that must never be flagged
//
// Everything here is a pure reduction over immutable data, so running it twice
// over the same inputs gives identical numbers.

mod comparison;
mod detection;
mod false_positive;

pub use comparison::{
    order_columns, BestDetector, ColumnAverage, ComparisonCell, ComparisonMatrix, ScenarioSummary,
};
pub use detection::{summarize_file, DetectionReport, DetectionSummary};
pub use false_positive::{
    verify_file, DetectorFamily, FpStatus, FpSummary, FpTestType, FpVerification,
    FpVerificationReport,
};

use crate::classify::Classification;
use crate::discovery::Collection;
use crate::schema::{ResultFile, ResultRow};

/// A parsed result file together with its classification
#[derive(Debug, Clone)]
pub struct ClassifiedFile {
    pub file: ResultFile,
    pub classification: Classification,
    pub collection: Collection,
}

/// Percentage of `part` in `whole`; `None` when `whole` is zero
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64 * 100.0)
    }
}

/// Mean of the elapsed times in seconds; `None` for no rows
pub fn mean_elapsed_seconds(rows: &[ResultRow]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let total: f64 = rows.iter().map(|r| r.elapsed_seconds).sum();
    Some(total / rows.len() as f64)
}

/// Mean of the present values; `None` when all are absent
pub fn mean_present(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}
