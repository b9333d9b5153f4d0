//! Fuzz target for the record reader.
//!
//! This fuzzer checks that the reader:
//! 1. Never panics on malformed input
//! 2. Always terminates, yielding at most one item per line

#![no_main]

use libfuzzer_sys::fuzz_target;
use tabbed::{ReaderOptions, TabbedFile};

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let lines = data.iter().filter(|&&b| b == b'\n').count() + 1;

    for quote in [None, Some(b'"')] {
        let options = ReaderOptions {
            quote,
            comment: Some(b'#'),
            ..Default::default()
        };
        if let Ok(reader) = TabbedFile::from_reader(data, options) {
            assert!(reader.count() <= lines);
        }
    }
});
