//! CLI argument parsing for deadlock-report

use crate::config::AnalysisConfig;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports on stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned console tables (default)
    Text,
    /// JSON aggregates for machine parsing
    Json,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Detection, timeout and runtime rates per result file
    Detection,
    /// Detection rates per scenario across detectors (timeouts excluded)
    Compare,
    /// Verify that false-positive tests were never flagged
    #[command(name = "verify-fp")]
    VerifyFp,
    /// Run every analysis and print a PASS/FAIL summary
    All,
}

#[derive(Parser, Debug)]
#[command(name = "deadlock-report")]
#[command(version)]
#[command(
    about = "Analyze deadlock-detector test results into detection, comparison and false-positive reports",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding deadlock_tests/, guaranteed_deadlock_tests/ and fp_tests/
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    pub root: PathBuf,

    /// Override the probabilistic results directory
    #[arg(long = "probabilistic-dir", value_name = "DIR", global = true)]
    pub probabilistic_dir: Option<PathBuf>,

    /// Override the guaranteed-deadlock results directory
    #[arg(long = "guaranteed-dir", value_name = "DIR", global = true)]
    pub guaranteed_dir: Option<PathBuf>,

    /// Override the false-positive results directory
    #[arg(long = "fp-dir", value_name = "DIR", global = true)]
    pub fp_dir: Option<PathBuf>,

    /// Directory receiving the markdown reports
    #[arg(long = "output-dir", value_name = "DIR", default_value = ".", global = true)]
    pub output_dir: PathBuf,

    /// Print reports without writing markdown files
    #[arg(long = "no-write", global = true)]
    pub no_write: bool,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Only analyze result files whose name matches this regex
    #[arg(long = "filter", value_name = "REGEX", global = true)]
    pub filter: Option<String>,

    /// TOML detector catalog replacing the built-in one
    #[arg(long = "catalog", value_name = "FILE", global = true)]
    pub catalog: Option<PathBuf>,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug", global = true)]
    pub debug: bool,
}

impl Cli {
    /// Analysis configuration described by the arguments
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            root: self.root.clone(),
            probabilistic_dir: self.probabilistic_dir.clone(),
            guaranteed_dir: self.guaranteed_dir.clone(),
            fp_dir: self.fp_dir.clone(),
            output_dir: self.output_dir.clone(),
            write_markdown: !self.no_write,
            filter: self.filter.clone(),
        }
    }
}
