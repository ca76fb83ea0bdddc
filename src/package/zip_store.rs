//! Zip-backed package store.

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate, TimeZone};
use filetime::FileTime;
use zip::result::ZipResult;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::{EntryName, Error, Result};

use super::dir_scope::DirScope;
use super::{PackageOptions, PackageStore};

/// Reads and writes packages as zip files.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipStore {
    options: PackageOptions,
}

impl ZipStore {
    /// Creates a store with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the options used for new packages.
    pub fn with_options(mut self, options: PackageOptions) -> Self {
        self.options = options;
        self
    }
}

impl PackageStore for ZipStore {
    fn extract(&self, package: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        match extract_entries(package, dest_dir, &mut created) {
            Ok(()) => {
                log::debug!(
                    "Extracted {} entries from '{}'",
                    created.len(),
                    package.display()
                );
                Ok(created)
            }
            Err(e) => {
                for path in created.iter().rev() {
                    if let Err(cleanup) = fs::remove_file(path) {
                        log::warn!(
                            "Failed to remove partial extract '{}': {}",
                            path.display(),
                            cleanup
                        );
                    }
                }
                Err(e)
            }
        }
    }

    fn create_single_file_archive(
        &self,
        package_dir: &Path,
        package_name: &str,
        source: &Path,
    ) -> Result<PathBuf> {
        let package_path = package_dir.join(package_name);
        let package_file = EntryName::new(package_name)?;
        let entry = EntryName::from_path(source)?;

        let mut input = File::open(source).map_err(|e| Error::package_write(&package_path, e))?;
        let modified = input.metadata().and_then(|meta| meta.modified()).ok();
        let options = self.options.file_options(modified);

        // Inside the package directory both names are bare, so nothing in the
        // package can carry a directory prefix.
        let scope =
            DirScope::enter(package_dir).map_err(|e| Error::package_write(&package_path, e))?;
        let written = write_package(package_file.as_str(), entry.as_str(), &mut input, options);
        if written.is_err() {
            if let Err(e) = fs::remove_file(package_file.as_str()) {
                if e.kind() != io::ErrorKind::NotFound {
                    log::warn!(
                        "Failed to remove partial package '{}': {}",
                        package_path.display(),
                        e
                    );
                }
            }
        }
        scope.restore()?;

        written.map_err(|e| Error::package_write(&package_path, e))?;
        log::debug!(
            "Packaged '{}' into '{}'",
            entry,
            package_path.display()
        );
        Ok(package_path)
    }
}

fn extract_entries(package: &Path, dest_dir: &Path, created: &mut Vec<PathBuf>) -> Result<()> {
    let file = File::open(package).map_err(|e| Error::extract(package, e))?;
    let mut archive = ZipArchive::new(BufReader::new(file)).map_err(|e| Error::extract(package, e))?;

    // Validate every entry before anything touches the destination.
    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| Error::extract(package, e))?;
        if entry.enclosed_name().is_none() {
            return Err(Error::PathTraversal {
                entry: entry.name().to_string(),
            });
        }
        if entry.is_dir() {
            return Err(Error::extract(
                package,
                format!("directory entry '{}'", entry.name()),
            ));
        }
        let name = EntryName::new(entry.name())
            .map_err(|e| Error::extract(package, format!("entry '{}': {}", entry.name(), e)))?;
        names.push(name);
    }

    for (index, name) in names.iter().enumerate() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| Error::extract(package, e))?;
        let target = dest_dir.join(name.as_str());

        // Never truncate a file that was already there.
        let out = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .map_err(|e| Error::extract(package, format!("{}: {}", target.display(), e)))?;
        created.push(target.clone());
        let mut writer = BufWriter::new(out);
        io::copy(&mut entry, &mut writer)
            .and_then(|_| writer.flush())
            .map_err(|e| Error::extract(package, e))?;
        drop(writer);

        apply_entry_time(&target, entry.last_modified());
    }

    Ok(())
}

fn write_package(
    package_file: &str,
    entry: &str,
    input: &mut impl Read,
    options: FileOptions,
) -> ZipResult<()> {
    let file = File::create(package_file)?;
    let mut writer = ZipWriter::new(BufWriter::new(file));
    writer.start_file(entry, options)?;
    io::copy(input, &mut writer)?;
    writer.finish()?.flush()?;
    Ok(())
}

/// Sets the extracted file's modification time from the entry's local time.
fn apply_entry_time(path: &Path, stamp: zip::DateTime) {
    let Some(mtime) = from_zip_time(stamp) else {
        return;
    };
    if let Err(e) = filetime::set_file_mtime(path, mtime) {
        log::warn!(
            "Failed to set modification time on '{}': {}",
            path.display(),
            e
        );
    }
}

fn from_zip_time(stamp: zip::DateTime) -> Option<FileTime> {
    let naive = NaiveDate::from_ymd_opt(
        stamp.year().into(),
        stamp.month().into(),
        stamp.day().into(),
    )?
    .and_hms_opt(
        stamp.hour().into(),
        stamp.minute().into(),
        stamp.second().into(),
    )?;
    let local = Local.from_local_datetime(&naive).earliest()?;
    Some(FileTime::from_unix_time(local.timestamp(), 0))
}
