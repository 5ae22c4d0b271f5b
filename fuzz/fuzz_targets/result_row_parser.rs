#![no_main]

use deadlock_report::schema::{parse_contents, parse_row};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;
use std::path::Path;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Neither a single row nor a whole file may panic
        let _ = parse_row(input);
        let _ = parse_contents(Path::new("fuzz.csv"), Cursor::new(input));
    }
});
