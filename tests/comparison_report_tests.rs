//! Detector comparison report end to end
#![allow(deprecated)] // suppress assert_cmd::Command::cargo_bin deprecation in tests

mod utils;

use predicates::prelude::*;
use std::fs;
use utils::{ResultsFixture, GUARANTEED, PROBABILISTIC};

const REPORT: &str = "DETECTOR_COMPARISON.md";

#[test]
fn test_comparison_excludes_timeouts() {
    let fixture = ResultsFixture::new();
    fixture.add(
        PROBABILISTIC,
        "two_lock_deloxide",
        &["true, false, 0.1", "false, true, 5.0"],
    );
    fixture.add(
        PROBABILISTIC,
        "two_lock_deloxide_lock_order",
        &["false, false, 0.1", "false, false, 0.1"],
    );
    fixture.add(
        PROBABILISTIC,
        "dining_parking_lot",
        &["false, true, 5.0", "false, true, 5.0"],
    );

    fixture
        .cmd()
        .arg("compare")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "DETECTOR COMPARISON - Detection Rates by Test Scenario",
        ))
        .stdout(predicate::str::contains("DX+LO         = Deloxide (vanilla) + Lock Order"))
        .stdout(predicate::str::contains("Best performer: DX (100.0% avg detection)"));

    let md = fixture.report(REPORT);
    assert!(md.contains("| Scenario | DX | DX+LO |"));
    assert!(md.contains("| two_lock | 100.0% | 0.0% |"));
    assert!(md.contains("- **two_lock**: DX (100.0%)"));
    assert!(md.contains("- **DX+LO**: Average detection rate = 0.0%"));
}

#[test]
fn test_comparison_drops_fully_timed_out_rows_and_columns() {
    let fixture = ResultsFixture::new();
    fixture.add(PROBABILISTIC, "two_lock_deloxide", &["true, false, 0.1"]);
    fixture.add(PROBABILISTIC, "barrier_parking_lot", &["false, false, 0.1"]);
    fixture.add(PROBABILISTIC, "dining_no_deadlocks", &["false, true, 5.0"]);

    fixture
        .cmd()
        .arg("compare")
        .assert()
        .success()
        .stdout(predicate::str::contains("N/A"))
        .stdout(predicate::str::contains("2 detectors evaluated"));

    let md = fixture.report(REPORT);
    assert!(md.contains("| Scenario | DX | PL |"));
    assert!(md.contains("| barrier | N/A | 0.0% |"));
    assert!(md.contains("| two_lock | 100.0% | N/A |"));
    assert!(!md.contains("dining"));
    assert!(!md.contains("- **ND**"));
}

#[test]
fn test_comparison_merges_collections() {
    let fixture = ResultsFixture::new();
    fixture.add(PROBABILISTIC, "barrier_deloxide", &["true, false, 0.1"]);
    fixture.add(GUARANTEED, "barrier_deloxide", &["false, false, 0.1"]);

    fixture.cmd().arg("compare").assert().success();

    assert!(fixture.report(REPORT).contains("| barrier | 50.0% |"));
}

#[test]
fn test_comparison_column_order_follows_catalog() {
    let fixture = ResultsFixture::new();
    for name in [
        "s_parking_lot",
        "s_deloxide_aggressive",
        "s_deloxide",
        "s_deloxide_aggressive_lock_order",
    ] {
        fixture.add(PROBABILISTIC, name, &["true, false, 0.1"]);
    }

    fixture.cmd().args(["compare"]).assert().success();

    assert!(fixture
        .report(REPORT)
        .contains("| Scenario | DX | DX-Agg | DX-Agg+LO | PL |"));
}

#[test]
fn test_comparison_all_timeouts_fails() {
    let fixture = ResultsFixture::new();
    fixture.add(PROBABILISTIC, "two_lock_deloxide", &["false, true, 5.0"]);

    fixture
        .cmd()
        .arg("compare")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No usable results for comparison"));

    assert!(!fixture.report_exists(REPORT));
}

#[test]
fn test_comparison_custom_catalog() {
    let fixture = ResultsFixture::new();
    fixture.add(PROBABILISTIC, "ring_lockbud", &["true, false, 0.1"]);
    fixture.add(PROBABILISTIC, "ring_deloxide", &["false, false, 0.1"]);

    let catalog = fixture.root().join("catalog.toml");
    fs::write(
        &catalog,
        r#"
[[detector]]
suffix = "lockbud"
label = "LB"
description = "lockbud checker"
kind = "third_party"

[[detector]]
suffix = "deloxide"
label = "DX"
description = "Deloxide (vanilla)"
kind = "vanilla"
"#,
    )
    .unwrap();

    fixture
        .cmd()
        .arg("compare")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .success()
        .stdout(predicate::str::contains("LB            = lockbud checker"));

    assert!(fixture.report(REPORT).contains("| ring | 0.0% | 100.0% |"));
}

#[test]
fn test_comparison_invalid_catalog_fails() {
    let fixture = ResultsFixture::new();
    fixture.add(PROBABILISTIC, "ring_deloxide", &["true, false, 0.1"]);

    let catalog = fixture.root().join("catalog.toml");
    fs::write(
        &catalog,
        r#"
[[detector]]
suffix = "aggressive"
label = "AG"
description = "Any aggressive mode"
kind = "stress"

[[detector]]
suffix = "deloxide_aggressive"
label = "DX-Agg"
description = "Deloxide + Aggressive Stress"
kind = "stress"
"#,
    )
    .unwrap();

    fixture
        .cmd()
        .arg("compare")
        .arg("--catalog")
        .arg(&catalog)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid detector catalog"));
}
