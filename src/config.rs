//! Analysis configuration: where results live and where reports go

use crate::discovery::Collection;
use crate::error::{AnalysisError, Result};
use regex::Regex;
use std::path::PathBuf;

/// Configuration shared by every report
///
/// # Example
/// ```
/// use deadlock_report::config::AnalysisConfig;
/// use deadlock_report::discovery::Collection;
///
/// let config = AnalysisConfig::default();
/// assert!(config.validate().is_ok());
/// assert!(config.dir_for(Collection::FalsePositive).ends_with("fp_tests"));
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Directory holding `deadlock_tests/`, `guaranteed_deadlock_tests/` and `fp_tests/`
    pub root: PathBuf,

    /// Overrides `<root>/deadlock_tests`
    pub probabilistic_dir: Option<PathBuf>,

    /// Overrides `<root>/guaranteed_deadlock_tests`
    pub guaranteed_dir: Option<PathBuf>,

    /// Overrides `<root>/fp_tests`
    pub fp_dir: Option<PathBuf>,

    /// Directory that receives the markdown reports
    pub output_dir: PathBuf,

    /// Write markdown reports (console output is always produced)
    pub write_markdown: bool,

    /// Only analyze result files whose stem matches this regex
    pub filter: Option<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            probabilistic_dir: None,
            guaranteed_dir: None,
            fp_dir: None,
            output_dir: PathBuf::from("."),
            write_markdown: true,
            filter: None,
        }
    }
}

impl AnalysisConfig {
    /// Directory for a result collection
    pub fn dir_for(&self, collection: Collection) -> PathBuf {
        let explicit = match collection {
            Collection::Probabilistic => &self.probabilistic_dir,
            Collection::Guaranteed => &self.guaranteed_dir,
            Collection::FalsePositive => &self.fp_dir,
        };
        explicit
            .clone()
            .unwrap_or_else(|| self.root.join(collection.dir_name()))
    }

    /// Compiled file-name filter, if any
    pub fn compiled_filter(&self) -> Result<Option<Regex>> {
        self.filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| {
                    AnalysisError::InvalidConfig(format!("invalid filter '{}': {}", pattern, e))
                })
            })
            .transpose()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.compiled_filter()?;

        if self.write_markdown && self.output_dir.is_file() {
            return Err(AnalysisError::InvalidConfig(format!(
                "output directory {} is a file",
                self.output_dir.display()
            )));
        }

        Ok(())
    }
}
