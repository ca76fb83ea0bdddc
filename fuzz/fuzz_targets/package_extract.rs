//! Fuzz target for ZipStore::extract with arbitrary package bytes.
//!
//! Run with: cargo +nightly fuzz run package_extract
//!
//! Every extracted path must sit directly in the destination directory, and
//! a failed extraction must leave the directory empty.

#![no_main]

use depipe::{PackageStore, ZipStore};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(dir) = tempfile::TempDir::new() else {
        return;
    };
    let package = dir.path().join("input.zip");
    if std::fs::write(&package, data).is_err() {
        return;
    }
    let dest = dir.path().join("out");
    if std::fs::create_dir(&dest).is_err() {
        return;
    }

    match ZipStore::new().extract(&package, &dest) {
        Ok(paths) => {
            for path in paths {
                assert_eq!(
                    path.parent(),
                    Some(dest.as_path()),
                    "Extracted outside destination: {:?}",
                    path
                );
            }
        }
        Err(_) => {
            let leftovers = std::fs::read_dir(&dest)
                .map(|entries| entries.count())
                .unwrap_or(0);
            assert_eq!(leftovers, 0, "Failed extraction left entries behind");
        }
    }
});
