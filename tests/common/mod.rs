//! Shared test utilities for integration tests.
//!
//! Note: `#![allow(dead_code)]` is required because each integration test file
//! compiles as a separate crate and may only use a subset of these helpers.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use depipe::{Layout, LogicalFile, parse_date};
use tempfile::TempDir;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// A scratch root holding one facility directory.
pub struct Facility {
    root: TempDir,
    layout: Layout,
}

impl Facility {
    /// Creates `<tmp>/BHTN` with the RETRO/01D naming used across the tests.
    pub fn bhtn() -> Self {
        Self::new(Layout::new("BHTN", "RETRO", "01D"))
    }

    /// Creates a root for `layout`, replacing its root with a temp directory.
    pub fn new(layout: Layout) -> Self {
        let root = TempDir::new().expect("Failed to create temp dir");
        let layout = layout.root(root.path());
        fs::create_dir_all(layout.facility_dir()).expect("Failed to create facility dir");
        Self { root, layout }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns the logical file for a `YYYYMMDD` date.
    pub fn file(&self, date: &str) -> LogicalFile {
        self.layout
            .file(parse_date(date).expect("Invalid test date"))
    }

    /// Writes the package for `date` holding one correctly named entry.
    pub fn add_package(&self, date: &str, content: &[u8]) -> LogicalFile {
        let file = self.file(date);
        fs::create_dir_all(file.dir()).expect("Failed to create date dir");
        write_zip(&file.package_path(), &[(file.name(), content)]);
        file
    }
}

/// Writes a zip file with the given entries.
pub fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let mut writer = ZipWriter::new(File::create(path).expect("Failed to create zip"));
    for (name, data) in entries {
        writer
            .start_file(*name, FileOptions::default())
            .expect("Failed to start entry");
        writer.write_all(data).expect("Failed to write entry");
    }
    writer.finish().expect("Failed to finish zip");
}

/// Reads every entry of a zip file as (name, content).
pub fn read_zip(path: &Path) -> Vec<(String, Vec<u8>)> {
    let file = File::open(path).expect("Failed to open zip");
    let mut archive = ZipArchive::new(file).expect("Failed to read zip");
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("Failed to read entry");
        let mut data = Vec::new();
        entry.read_to_end(&mut data).expect("Failed to read entry data");
        entries.push((entry.name().to_string(), data));
    }
    entries
}

/// Lists the names in a directory, sorted.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .expect("Failed to read dir")
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Captures every file under `dir` with its bytes; directories map to `None`.
pub fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    let mut state = BTreeMap::new();
    collect(dir, dir, &mut state);
    state
}

fn collect(base: &Path, dir: &Path, state: &mut BTreeMap<PathBuf, Option<Vec<u8>>>) {
    for entry in fs::read_dir(dir).expect("Failed to read dir") {
        let path = entry.unwrap().path();
        let relative = path.strip_prefix(base).unwrap().to_path_buf();
        if path.is_dir() {
            state.insert(relative, None);
            collect(base, &path, state);
        } else {
            state.insert(relative, Some(fs::read(&path).unwrap()));
        }
    }
}
