//! deadlock-report - analysis of deadlock-detector test results
//!
//! Reads the CSV run records written by a deadlock-detector test harness,
//! classifies each result file from its name, and produces three reports:
//! per-file detection rates, a scenario × detector comparison grid, and a
//! false-positive verification.

pub mod aggregate;
pub mod catalog;
pub mod classify;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod schema;

pub use error::{AnalysisError, Result};
