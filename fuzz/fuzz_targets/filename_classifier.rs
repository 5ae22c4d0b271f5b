#![no_main]

use deadlock_report::catalog::DetectorCatalog;
use deadlock_report::classify::Classifier;
use deadlock_report::discovery::Collection;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(name) = std::str::from_utf8(data) {
        let catalog = DetectorCatalog::default();
        let classifier = Classifier::new(&catalog);
        for collection in [
            Collection::Probabilistic,
            Collection::Guaranteed,
            Collection::FalsePositive,
        ] {
            let _ = classifier.classify(name, collection);
        }
    }
});
