//! Error taxonomy for result ingestion and report generation
//!
//! Per-file failures (`MalformedRow`, `Unreadable`, `Unrecognized`) are
//! recoverable: the pipeline logs them and skips the file. Only
//! `FileDiscoveryEmpty` and `NoAggregateData` end a report.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors produced while reading, classifying and aggregating result files
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No CSV result files found in {}", display_dirs(.dirs))]
    FileDiscoveryEmpty { dirs: Vec<PathBuf> },

    #[error("Malformed row in {}:{line}: {reason}", .path.display())]
    MalformedRow {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Cannot read {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse detector from {name}")]
    Unrecognized { name: String },

    #[error("No usable results for {report}")]
    NoAggregateData { report: &'static str },

    #[error("Invalid detector catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// True for errors that only invalidate a single result file
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            AnalysisError::MalformedRow { .. }
                | AnalysisError::Unreadable { .. }
                | AnalysisError::Unrecognized { .. }
        )
    }
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn unreadable(path: &Path, source: std::io::Error) -> AnalysisError {
    AnalysisError::Unreadable {
        path: path.to_path_buf(),
        source,
    }
}
