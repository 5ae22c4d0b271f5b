//! Result-file discovery across the harness output directories

use crate::error::{AnalysisError, Result};
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Harness output collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Collection {
    /// Heisenbug tests driven by random seeds
    Probabilistic,
    /// Barrier-synchronized tests that always deadlock
    Guaranteed,
    /// Tests that must never deadlock
    FalsePositive,
}

impl Collection {
    /// Collections read by detection-rate and comparison reports
    pub const DEADLOCK: [Collection; 2] = [Collection::Probabilistic, Collection::Guaranteed];

    /// Default directory name under the results root
    pub fn dir_name(self) -> &'static str {
        match self {
            Collection::Probabilistic => "deadlock_tests",
            Collection::Guaranteed => "guaranteed_deadlock_tests",
            Collection::FalsePositive => "fp_tests",
        }
    }

    /// Short marker used in report tables
    pub fn marker(self) -> &'static str {
        match self {
            Collection::Probabilistic => "P",
            Collection::Guaranteed => "G",
            Collection::FalsePositive => "FP",
        }
    }
}

/// A discovered result file and the collection it came from
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub collection: Collection,
}

/// List `*.csv` files directly inside `dir`, sorted by path
///
/// A missing directory yields an empty list.
pub fn discover_csv_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_csv = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);
        if is_csv && path.is_file() {
            results.push(path);
        }
    }

    results.sort();
    Ok(results)
}

/// Discover result files for a set of collections
///
/// `dir_for` maps a collection to its directory. Unreadable directories are
/// logged and treated as empty. Fails with `FileDiscoveryEmpty` when no
/// collection contains any file.
pub fn discover<F>(collections: &[Collection], dir_for: F) -> Result<Vec<DiscoveredFile>>
where
    F: Fn(Collection) -> PathBuf,
{
    let mut files = Vec::new();
    let mut searched = Vec::new();

    for &collection in collections {
        let dir = dir_for(collection);
        let found = match discover_csv_files(&dir) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Cannot list {}: {}", dir.display(), e);
                Vec::new()
            }
        };

        tracing::info!(
            "{:?} tests: {} file(s) in {}",
            collection,
            found.len(),
            dir.display()
        );
        files.extend(
            found
                .into_iter()
                .map(|path| DiscoveredFile { path, collection }),
        );
        searched.push(dir);
    }

    if files.is_empty() {
        return Err(AnalysisError::FileDiscoveryEmpty { dirs: searched });
    }

    Ok(files)
}
