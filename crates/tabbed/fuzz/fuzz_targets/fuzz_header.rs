//! Fuzz target for header schema inference.

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabbed::{OrdinalRule, derive_schema_with};

fuzz_target!(|data: &[u8]| {
    let Ok(header) = std::str::from_utf8(data) else {
        return;
    };

    for rule in [OrdinalRule::Declared, OrdinalRule::TagOrder] {
        if let Ok(schema) = derive_schema_with(header, b'\t', rule) {
            // Inference is a pure function of the header.
            assert_eq!(Some(schema), derive_schema_with(header, b'\t', rule).ok());
        }
    }
});
