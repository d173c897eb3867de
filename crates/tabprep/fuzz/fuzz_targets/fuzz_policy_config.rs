//! Fuzz target for preprocessing configuration parsing.
//!
//! Arbitrary JSON and CLI policy strings must parse or fail cleanly, and
//! any configuration that parses must survive a JSON round trip.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabprep::{DropStrategy, PreprocessConfig, TypeCoercion, ValuePolicy};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = text.parse::<ValuePolicy>();
    let _ = text.parse::<DropStrategy>();
    let _ = text.parse::<TypeCoercion>();

    if let Ok(config) = PreprocessConfig::from_json(text) {
        let json = config.to_json().expect("config serializes");
        let reparsed = PreprocessConfig::from_json(&json).expect("serialized config parses");
        assert_eq!(reparsed.columns, config.columns);
        assert_eq!(reparsed.drop_strategy, config.drop_strategy);
    }
});
