// Integration test utilities
//
// A throwaway results tree laid out the way the test harness writes it, plus a
// command builder pointed at it.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const PROBABILISTIC: &str = "deadlock_tests";
pub const GUARANTEED: &str = "guaranteed_deadlock_tests";
pub const FALSE_POSITIVE: &str = "fp_tests";

/// Results root with an `out/` directory for reports
pub struct ResultsFixture {
    dir: TempDir,
}

impl ResultsFixture {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.root().join("out")
    }

    /// Write `<collection>/<name>.csv` with one line per row
    pub fn add(&self, collection: &str, name: &str, rows: &[&str]) -> PathBuf {
        let dir = self.root().join(collection);
        fs::create_dir_all(&dir).expect("create collection dir");
        let path = dir.join(format!("{}.csv", name));
        let mut contents = rows.join("\n");
        if !rows.is_empty() {
            contents.push('\n');
        }
        fs::write(&path, contents).expect("write result file");
        path
    }

    /// Binary invocation rooted at the fixture
    #[allow(deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("deadlock-report").expect("binary built");
        cmd.arg("--root")
            .arg(self.root())
            .arg("--output-dir")
            .arg(self.output_dir())
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn report(&self, file_name: &str) -> String {
        fs::read_to_string(self.output_dir().join(file_name)).expect("report written")
    }

    pub fn report_exists(&self, file_name: &str) -> bool {
        self.output_dir().join(file_name).exists()
    }
}
