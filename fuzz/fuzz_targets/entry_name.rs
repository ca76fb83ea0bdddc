//! Fuzz target for EntryName::new with arbitrary string input.
//!
//! Run with: cargo +nightly fuzz run entry_name
//!
//! An accepted name must be a single path segment.

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(name) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(entry) = depipe::EntryName::new(name) {
        let s = entry.as_str();
        assert!(!s.is_empty());
        assert!(!s.contains(['/', '\\', '\0']), "Separator accepted: {:?}", s);
        assert!(s != "." && s != "..", "Relative segment accepted: {:?}", s);
        assert_eq!(std::path::Path::new(s).components().count(), 1);
    }
});
