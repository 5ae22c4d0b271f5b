//! Report pipeline: discover → read → classify → aggregate → render
//!
//! A file that cannot be read, parsed or classified is logged and skipped.
//! A report only fails when discovery finds nothing or when no file survives
//! to contribute data.

use crate::aggregate::{ClassifiedFile, ComparisonMatrix, DetectionReport, FpVerificationReport};
use crate::catalog::DetectorCatalog;
use crate::classify::Classifier;
use crate::config::AnalysisConfig;
use crate::discovery::{discover, Collection};
use crate::error::{AnalysisError, Result};
use crate::report::{
    render_comparison, render_detection, render_false_positives, RenderedReport, ReportKind,
};
use crate::schema::{file_stem, read_result_file};
use regex::Regex;
use std::path::PathBuf;

/// Runs analyses for one configuration and catalog
#[derive(Debug)]
pub struct Analyzer<'a> {
    config: &'a AnalysisConfig,
    catalog: &'a DetectorCatalog,
    filter: Option<Regex>,
}

impl<'a> Analyzer<'a> {
    /// Validate the configuration and prepare the analyzer
    pub fn new(config: &'a AnalysisConfig, catalog: &'a DetectorCatalog) -> Result<Self> {
        config.validate()?;
        let filter = config.compiled_filter()?;

        Ok(Self {
            config,
            catalog,
            filter,
        })
    }

    pub fn config(&self) -> &AnalysisConfig {
        self.config
    }

    /// Load and classify every usable result file of the given collections
    pub fn load(&self, collections: &[Collection]) -> Result<Vec<ClassifiedFile>> {
        let discovered = discover(collections, |c| self.config.dir_for(c))?;
        let classifier = Classifier::new(self.catalog);
        let mut files = Vec::with_capacity(discovered.len());

        for found in discovered {
            let name = file_stem(&found.path);
            if let Some(filter) = &self.filter {
                if !filter.is_match(&name) {
                    tracing::debug!("filtered out {}", name);
                    continue;
                }
            }

            let file = match read_result_file(&found.path) {
                Ok(file) => file,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                    continue;
                }
            };

            let classification = match classifier.classify(&name, found.collection) {
                Ok(classification) => classification,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", name, e);
                    continue;
                }
            };

            tracing::debug!(
                "{} -> scenario={} column={} rows={}",
                name,
                classification.scenario,
                classification.column(),
                file.len()
            );
            files.push(ClassifiedFile {
                file,
                classification,
                collection: found.collection,
            });
        }

        Ok(files)
    }

    /// Detection-rate report over probabilistic and guaranteed results
    pub fn detection(&self) -> Result<DetectionReport> {
        let files = self.load(&Collection::DEADLOCK)?;
        let report = DetectionReport::from_files(&files);
        if report.is_empty() {
            return Err(no_data(ReportKind::Detection));
        }
        Ok(report)
    }

    /// Detector-comparison grid over probabilistic and guaranteed results
    pub fn compare(&self) -> Result<ComparisonMatrix> {
        let files = self.load(&Collection::DEADLOCK)?;
        let matrix = ComparisonMatrix::from_files(&files, &self.catalog.column_order());
        if !matrix.has_data() {
            return Err(no_data(ReportKind::Comparison));
        }
        Ok(matrix)
    }

    /// False-positive verification over the false-positive collection
    pub fn verify_fp(&self) -> Result<FpVerificationReport> {
        let files = self.load(&[Collection::FalsePositive])?;
        let report = FpVerificationReport::from_files(&files, self.catalog);
        if report.is_empty() {
            return Err(no_data(ReportKind::FalsePositive));
        }
        Ok(report)
    }

    /// Aggregate and render one report
    pub fn run(&self, kind: ReportKind) -> Result<RenderedReport> {
        match kind {
            ReportKind::Detection => render_detection(&self.detection()?),
            ReportKind::Comparison => render_comparison(&self.compare()?, self.catalog),
            ReportKind::FalsePositive => render_false_positives(&self.verify_fp()?),
        }
    }

    /// Write the markdown document if the configuration asks for it
    pub fn write(&self, report: &RenderedReport) -> Result<Option<PathBuf>> {
        if !self.config.write_markdown {
            return Ok(None);
        }
        report.write_markdown(&self.config.output_dir).map(Some)
    }
}

fn no_data(kind: ReportKind) -> AnalysisError {
    AnalysisError::NoAggregateData { report: kind.name() }
}
