// Report rendering
//
// Each aggregate is rendered three ways from the same data: an aligned console
// table for stdout, a markdown document written next to the results, and a
// JSON value for `--format json`. Numbers use fixed precision so two runs over
// the same inputs render byte-identical output.

mod comparison;
mod detection;
mod false_positive;
mod table;

pub use comparison::render_comparison;
pub use detection::render_detection;
pub use false_positive::render_false_positives;
pub use table::{rule, Align, Table};

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// The three analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportKind {
    Detection,
    Comparison,
    FalsePositive,
}

impl ReportKind {
    /// Order used when every analysis runs
    pub const ALL: [ReportKind; 3] = [
        ReportKind::Detection,
        ReportKind::FalsePositive,
        ReportKind::Comparison,
    ];

    /// Short machine name, also the JSON key in combined output
    pub fn name(self) -> &'static str {
        match self {
            ReportKind::Detection => "detection",
            ReportKind::Comparison => "comparison",
            ReportKind::FalsePositive => "false_positive",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Detection => "Detection Rate Analysis",
            ReportKind::Comparison => "Detector Comparison",
            ReportKind::FalsePositive => "False Positive Verification",
        }
    }

    /// Markdown file name of the report
    pub fn file_name(self) -> &'static str {
        match self {
            ReportKind::Detection => "DETECTION_ANALYSIS.md",
            ReportKind::Comparison => "DETECTOR_COMPARISON.md",
            ReportKind::FalsePositive => "FALSE_POSITIVE_ANALYSIS.md",
        }
    }
}

/// A fully rendered report
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub kind: ReportKind,
    pub console: String,
    pub markdown: String,
    pub json: serde_json::Value,
}

impl RenderedReport {
    /// Write the markdown document into `dir`, replacing any previous copy
    ///
    /// The document goes to a temporary sibling first and is renamed into
    /// place, so an interrupted write never leaves a truncated report.
    pub fn write_markdown(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;

        let path = dir.join(self.kind.file_name());
        let tmp = dir.join(format!(".{}.tmp", self.kind.file_name()));
        fs::write(&tmp, &self.markdown)?;
        fs::rename(&tmp, &path)?;

        tracing::info!("wrote {}", path.display());
        Ok(path)
    }
}

/// Percentage with one decimal
pub(crate) fn fmt_rate(value: f64) -> String {
    format!("{:.1}", value)
}

pub(crate) fn fmt_ms(value: f64) -> String {
    format!("{:.2}", value)
}

pub(crate) fn fmt_seconds(value: f64) -> String {
    format!("{:.4}", value)
}
