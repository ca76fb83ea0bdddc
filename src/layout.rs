//! On-disk layout of facility packages.
//!
//! Packages live at
//! `<root>/<facility>/<YYYYMMDD>/<YYYYMMDD>.<facility>.<type><version>[.<suffix>].zip`.
//! A [`Layout`] holds everything except the date; [`Layout::file`] binds a
//! date and yields the [`LogicalFile`] with all of its physical paths.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::ledger::backup_path;

/// Extension of package files.
pub const PACKAGE_EXTENSION: &str = "zip";

/// Date format used in directory and file names.
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Naming template shared by every date of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
    facility: String,
    file_type: String,
    version: String,
    suffix: Option<String>,
}

impl Layout {
    /// Creates a layout rooted at `.`.
    pub fn new(
        facility: impl Into<String>,
        file_type: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            root: PathBuf::from("."),
            facility: facility.into(),
            file_type: file_type.into(),
            version: version.into(),
            suffix: None,
        }
    }

    /// Sets the directory that contains the facility directories.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Sets an optional name component appended after the version.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    /// Returns the facility name.
    pub fn facility(&self) -> &str {
        &self.facility
    }

    /// Returns the facility directory.
    pub fn facility_dir(&self) -> PathBuf {
        self.root.join(&self.facility)
    }

    /// Binds a date to this layout.
    pub fn file(&self, date: NaiveDate) -> LogicalFile {
        let stamp = date.format(DATE_FORMAT).to_string();

        let mut name = format!(
            "{}.{}.{}{}",
            stamp, self.facility, self.file_type, self.version
        );
        if let Some(suffix) = &self.suffix {
            name.push('.');
            name.push_str(suffix);
        }

        LogicalFile {
            date,
            dir: self.facility_dir().join(&stamp),
            name,
        }
    }
}

/// One dated file and the paths it occupies over an operation's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalFile {
    date: NaiveDate,
    dir: PathBuf,
    name: String,
}

impl LogicalFile {
    /// Returns the file's date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the directory holding the package.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the content file name (no extension).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the package file name, e.g. `20190901.BHTN.RETRO01D.zip`.
    pub fn package_name(&self) -> String {
        package_name_for(&self.name)
    }

    /// `name.zip`
    pub fn package_path(&self) -> PathBuf {
        self.dir.join(self.package_name())
    }

    /// `name.zip.orig`
    pub fn backup_package_path(&self) -> PathBuf {
        backup_path(&self.package_path())
    }

    /// `name`
    pub fn content_path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }

    /// `name.orig`
    pub fn backup_content_path(&self) -> PathBuf {
        backup_path(&self.content_path())
    }
}

/// Appends the package extension to a content file name.
pub fn package_name_for(content_name: &str) -> String {
    format!("{}.{}", content_name, PACKAGE_EXTENSION)
}
