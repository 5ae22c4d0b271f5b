//! Property-based tests for parsing, classification and aggregation
//!
//! Core properties:
//! 1. Rows written by the harness read back unchanged, in either schema
//! 2. The row parser never panics on arbitrary input
//! 3. Classification is deterministic and recovers the scenario
//! 4. Aggregation is a pure function of its input

use deadlock_report::aggregate::{ClassifiedFile, ComparisonMatrix, DetectionReport};
use deadlock_report::catalog::DetectorCatalog;
use deadlock_report::classify::Classifier;
use deadlock_report::discovery::Collection;
use deadlock_report::schema::{parse_contents, parse_row, ResultRow, SchemaVersion};
use proptest::prelude::*;
use std::io::Cursor;
use std::path::Path;

const SUFFIXES: [&str; 8] = [
    "deloxide",
    "deloxide_aggressive",
    "deloxide_random_default",
    "deloxide_gentle",
    "deloxide_component_based_delays",
    "parking_lot",
    "no_deadlocks",
    "std",
];

fn harness_row(flagged: bool, timed_out: bool, elapsed: f64, seed: Option<u64>) -> String {
    match seed {
        Some(seed) => format!("{}, {}, {:.6}, {}", flagged, timed_out, elapsed, seed),
        None => format!("{}, {}, {:.6}", flagged, timed_out, elapsed),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_harness_rows_round_trip(
        flagged in any::<bool>(),
        timed_out in any::<bool>(),
        micros in 0u64..100_000_000,
        seed in proptest::option::of(any::<u64>()),
    ) {
        let elapsed = micros as f64 / 1_000_000.0;
        let line = harness_row(flagged, timed_out, elapsed, seed);
        let parsed = parse_row(&line).unwrap();

        prop_assert_eq!(parsed.row.flagged, flagged);
        prop_assert_eq!(parsed.row.timed_out, timed_out);
        prop_assert!((parsed.row.elapsed_seconds - elapsed).abs() < 1e-9);
        prop_assert_eq!(parsed.row.seed, seed.map(|s| s as i64));
        let expected_schema = if seed.is_some() { SchemaVersion::Seeded } else { SchemaVersion::Legacy };
        prop_assert_eq!(parsed.schema, expected_schema);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn prop_parse_row_never_panics(line in "\\PC{0,64}") {
        let _ = parse_row(&line);
    }

    #[test]
    fn prop_parse_contents_never_panics(text in "[a-z0-9, .\\n-]{0,200}") {
        let _ = parse_contents(Path::new("fuzz.csv"), Cursor::new(text));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_classifier_recovers_scenario(
        scenario in "[a-z]{1,8}(_[a-z]{1,8}){0,2}",
        suffix_index in 0usize..SUFFIXES.len(),
        lock_order in any::<bool>(),
    ) {
        let catalog = DetectorCatalog::default();
        let classifier = Classifier::new(&catalog);
        let suffix = SUFFIXES[suffix_index];
        let mut name = format!("{}_{}", scenario, suffix);
        if lock_order {
            name.push_str("_lock_order");
        }

        let first = classifier.classify(&name, Collection::Probabilistic);
        let second = classifier.classify(&name, Collection::Probabilistic);
        prop_assert_eq!(&first.as_ref().ok(), &second.as_ref().ok());

        // A scenario that itself ends in a catalog suffix is legitimately
        // ambiguous, so only check recovery when it does not.
        let ambiguous = SUFFIXES
            .iter()
            .any(|s| scenario == *s || scenario.ends_with(&format!("_{}", s)))
            || scenario == "lock_order"
            || scenario.ends_with("_lock_order");
        if !ambiguous {
            let classification = first.unwrap();
            prop_assert_eq!(&classification.scenario, &scenario);
            prop_assert_eq!(classification.has_lock_order_variant, lock_order);
        }
    }

    #[test]
    fn prop_classifier_never_panics(name in "\\PC{0,48}") {
        let catalog = DetectorCatalog::default();
        let classifier = Classifier::new(&catalog);
        let _ = classifier.classify(&name, Collection::FalsePositive);
    }
}

fn classified(name: &str, rows: Vec<ResultRow>, catalog: &DetectorCatalog) -> Option<ClassifiedFile> {
    let classification = Classifier::new(catalog)
        .classify(name, Collection::Probabilistic)
        .ok()?;
    let text: String = rows
        .iter()
        .map(|r| format!("{}, {}, {}\n", r.flagged, r.timed_out, r.elapsed_seconds))
        .collect();
    let file = parse_contents(Path::new(&format!("{}.csv", name)), Cursor::new(text)).ok()?;
    Some(ClassifiedFile {
        file,
        classification,
        collection: Collection::Probabilistic,
    })
}

fn row_strategy() -> impl Strategy<Value = ResultRow> {
    (any::<bool>(), any::<bool>(), 0u32..10_000).prop_map(|(flagged, timed_out, ms)| ResultRow {
        flagged,
        timed_out,
        elapsed_seconds: ms as f64 / 1000.0,
        seed: None,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_aggregation_is_deterministic(
        rows_a in prop::collection::vec(row_strategy(), 0..20),
        rows_b in prop::collection::vec(row_strategy(), 0..20),
    ) {
        let catalog = DetectorCatalog::default();
        let files: Vec<ClassifiedFile> = [
            classified("two_lock_deloxide", rows_a, &catalog),
            classified("two_lock_parking_lot", rows_b, &catalog),
        ]
        .into_iter()
        .flatten()
        .collect();

        let first = DetectionReport::from_files(&files);
        let second = DetectionReport::from_files(&files);
        prop_assert_eq!(&first.summaries, &second.summaries);

        let preferred = catalog.column_order();
        let matrix = ComparisonMatrix::from_files(&files, &preferred);
        prop_assert_eq!(&matrix, &ComparisonMatrix::from_files(&files, &preferred));

        for summary in &matrix.scenarios {
            for cell in summary.cells.iter().flatten() {
                prop_assert!(cell.detection_rate >= 0.0 && cell.detection_rate <= 100.0);
                prop_assert!(cell.flagged <= cell.completed);
            }
        }
        for summary in &first.summaries {
            prop_assert!(summary.detected <= summary.total_runs);
            prop_assert!(summary.timed_out <= summary.total_runs);
        }
    }
}
