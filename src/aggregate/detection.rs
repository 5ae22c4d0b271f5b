// Detection-rate mode: one summary per result file, all rows counted

use super::{mean_elapsed_seconds, mean_present, percentage, ClassifiedFile};
use crate::discovery::Collection;
use serde::Serialize;

/// Detection statistics for a single result file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionSummary {
    /// Result-file stem
    pub test: String,
    pub collection: Collection,
    pub scenario: String,
    /// Comparison column of the detector (e.g. `DX+LO`)
    pub detector: String,
    pub total_runs: usize,
    pub detected: usize,
    pub timed_out: usize,
    /// Percentage of runs flagged
    pub detection_rate: f64,
    /// Percentage of runs that timed out
    pub timeout_rate: f64,
    /// Mean elapsed time over all runs, in milliseconds
    pub avg_runtime_ms: f64,
}

/// Summarize one file; `None` if it has no rows
pub fn summarize_file(input: &ClassifiedFile) -> Option<DetectionSummary> {
    let rows = &input.file.rows;
    let total_runs = rows.len();
    let detected = rows.iter().filter(|r| r.flagged).count();
    let timed_out = rows.iter().filter(|r| r.timed_out).count();

    Some(DetectionSummary {
        test: input.file.name.clone(),
        collection: input.collection,
        scenario: input.classification.scenario.clone(),
        detector: input.classification.column(),
        total_runs,
        detected,
        timed_out,
        detection_rate: percentage(detected, total_runs)?,
        timeout_rate: percentage(timed_out, total_runs)?,
        avg_runtime_ms: mean_elapsed_seconds(rows)? * 1000.0,
    })
}

/// Detection-rate report over every non-empty file
#[derive(Debug, Clone, Serialize)]
pub struct DetectionReport {
    /// Summaries in input order
    pub summaries: Vec<DetectionSummary>,
    /// Files excluded because they had no rows
    pub empty_files: Vec<String>,
}

impl DetectionReport {
    /// Build the report, excluding empty files
    pub fn from_files(files: &[ClassifiedFile]) -> Self {
        let mut summaries = Vec::new();
        let mut empty_files = Vec::new();

        for input in files {
            match summarize_file(input) {
                Some(summary) => summaries.push(summary),
                None => {
                    tracing::warn!("{} is empty", input.file.name);
                    empty_files.push(input.file.name.clone());
                }
            }
        }

        Self {
            summaries,
            empty_files,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }

    /// Number of summaries from a collection
    pub fn count(&self, collection: Collection) -> usize {
        self.summaries
            .iter()
            .filter(|s| s.collection == collection)
            .count()
    }

    /// Mean detection rate over the files of a collection
    pub fn average_detection_rate(&self, collection: Collection) -> Option<f64> {
        mean_present(
            self.summaries
                .iter()
                .filter(|s| s.collection == collection)
                .map(|s| Some(s.detection_rate)),
        )
    }

    /// Highest detection rate; the earliest file wins ties
    pub fn best(&self) -> Option<&DetectionSummary> {
        self.summaries.iter().fold(None, |best, s| match best {
            Some(b) if b.detection_rate >= s.detection_rate => Some(b),
            _ => Some(s),
        })
    }

    /// Lowest detection rate; the earliest file wins ties
    pub fn worst(&self) -> Option<&DetectionSummary> {
        self.summaries.iter().fold(None, |worst, s| match worst {
            Some(w) if w.detection_rate <= s.detection_rate => Some(w),
            _ => Some(s),
        })
    }
}
