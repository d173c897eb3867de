//! Fuzz target for the delimited-text loader.
//!
//! The loader must never panic on malformed input, whatever the
//! delimiter guess.

#![no_main]

use libfuzzer_sys::fuzz_target;
use std::io::Write;
use tabprep::{LoadOptions, Parser, load_path};

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    for delimiter in [b',', b'\t', b';'] {
        let _ = parser.parse_bytes(data, delimiter);
    }

    // Full load path with auto-detection
    if let Ok(mut temp_file) = tempfile::Builder::new().suffix(".txt").tempfile() {
        if temp_file.write_all(data).is_ok() {
            let options = LoadOptions::new().with_alternate_forms(true);
            let _ = load_path(temp_file.path(), &options);
        }
    }
});
