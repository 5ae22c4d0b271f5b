//! Result-file schema reader
//!
//! The harness appends one headerless row per test run:
//!
//! ```text
//! flagged, timed_out, elapsed_seconds[, seed]
//! ```
//!
//! Older harness builds did not write the seed column. Each row is tried
//! against the seeded layout first and the legacy layout second, so files that
//! straddle a harness upgrade still parse.

use crate::error::{unreadable, AnalysisError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// One test execution record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResultRow {
    /// The detector under test reported a deadlock
    pub flagged: bool,
    /// The run exceeded its time budget
    pub timed_out: bool,
    pub elapsed_seconds: f64,
    pub seed: Option<i64>,
}

/// Row layouts written by the harness over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SchemaVersion {
    /// `flagged, timed_out, elapsed, seed`
    Seeded,
    /// `flagged, timed_out, elapsed`
    Legacy,
}

impl SchemaVersion {
    /// Attempt order: newest layout first
    pub const ATTEMPT_ORDER: [SchemaVersion; 2] = [SchemaVersion::Seeded, SchemaVersion::Legacy];

    pub fn column_count(self) -> usize {
        match self {
            SchemaVersion::Seeded => 4,
            SchemaVersion::Legacy => 3,
        }
    }
}

/// A row together with the layout that matched it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsedRow {
    pub row: ResultRow,
    pub schema: SchemaVersion,
}

/// A parsed result file, immutable once read
#[derive(Debug, Clone)]
pub struct ResultFile {
    pub path: PathBuf,
    /// File stem, used for classification
    pub name: String,
    pub rows: Vec<ResultRow>,
    /// Layouts seen in this file, in attempt order
    pub schemas: Vec<SchemaVersion>,
}

impl ResultFile {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Parse a boolean column as serialized by the harness
fn parse_bool(field: &str) -> std::result::Result<bool, String> {
    let field = field.trim();
    if field.eq_ignore_ascii_case("true") || field == "1" {
        Ok(true)
    } else if field.eq_ignore_ascii_case("false") || field == "0" {
        Ok(false)
    } else {
        Err(format!("invalid boolean '{}'", field))
    }
}

fn parse_elapsed(field: &str) -> std::result::Result<f64, String> {
    let field = field.trim();
    match field.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(format!("invalid elapsed time '{}'", field)),
    }
}

/// Seeds are `u64` in the harness; values above `i64::MAX` keep their bit pattern.
fn parse_seed(field: &str) -> std::result::Result<i64, String> {
    let field = field.trim();
    field
        .parse::<i64>()
        .or_else(|_| field.parse::<u64>().map(|v| v as i64))
        .map_err(|_| format!("invalid seed '{}'", field))
}

/// Parse one line against a single schema version
fn parse_with(fields: &[&str], schema: SchemaVersion) -> std::result::Result<ResultRow, String> {
    if fields.len() != schema.column_count() {
        return Err(format!(
            "expected {} columns, got {}",
            schema.column_count(),
            fields.len()
        ));
    }

    let seed = match schema {
        SchemaVersion::Seeded => Some(parse_seed(fields[3])?),
        SchemaVersion::Legacy => None,
    };

    Ok(ResultRow {
        flagged: parse_bool(fields[0])?,
        timed_out: parse_bool(fields[1])?,
        elapsed_seconds: parse_elapsed(fields[2])?,
        seed,
    })
}

/// Parse a single CSV line, trying each schema version in order
///
/// Returns the row tagged with the schema that matched. On failure the reason
/// comes from the schema whose column count fit, if any.
pub fn parse_row(line: &str) -> std::result::Result<ParsedRow, String> {
    let fields: Vec<&str> = line.split(',').collect();
    let mut mismatch = None;

    for schema in SchemaVersion::ATTEMPT_ORDER {
        match parse_with(&fields, schema) {
            Ok(row) => return Ok(ParsedRow { row, schema }),
            Err(reason) if fields.len() == schema.column_count() => mismatch = Some(reason),
            Err(_) => {}
        }
    }

    Err(mismatch.unwrap_or_else(|| format!("expected 3 or 4 columns, got {}", fields.len())))
}

/// Parse the full contents of a result file
pub fn parse_contents(path: &Path, reader: impl BufRead) -> Result<ResultFile> {
    let mut rows = Vec::new();
    let mut schemas = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| unreadable(path, e))?;
        if line.trim().is_empty() {
            continue;
        }

        let parsed = parse_row(&line).map_err(|reason| AnalysisError::MalformedRow {
            path: path.to_path_buf(),
            line: index + 1,
            reason,
        })?;

        if !schemas.contains(&parsed.schema) {
            schemas.push(parsed.schema);
        }
        rows.push(parsed.row);
    }

    schemas.sort();
    tracing::trace!(
        path = %path.display(),
        rows = rows.len(),
        ?schemas,
        "parsed result file"
    );

    Ok(ResultFile {
        path: path.to_path_buf(),
        name: file_stem(path),
        rows,
        schemas,
    })
}

/// Read and parse one result file from disk
///
/// The handle is dropped before returning, whether or not parsing succeeded.
pub fn read_result_file(path: &Path) -> Result<ResultFile> {
    let file = File::open(path).map_err(|e| unreadable(path, e))?;
    parse_contents(path, BufReader::new(file))
}

/// Bare file name without directory or extension
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
