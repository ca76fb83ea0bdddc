//! Error types for batch file operations.
//!
//! This module provides the [`Error`] enum which represents all possible
//! failure modes of a package operation, along with a convenient
//! [`Result<T>`] type alias.
//!
//! # Recoverable and fatal errors
//!
//! Almost every variant is *recoverable*: the operation for one date is
//! rolled back, reported as a `FAIL` line, and the batch moves on to the next
//! date. The single exception is [`Error::WorkingDirectoryRestore`], which
//! means the process working directory could not be put back after a package
//! was written. Relative paths can no longer be trusted, so the whole batch
//! stops.
//!
//! ```rust
//! use depipe::Error;
//!
//! fn describe(error: &Error) -> &'static str {
//!     if error.is_fatal() {
//!         "aborting the batch"
//!     } else {
//!         "skipping this date"
//!     }
//! }
//! ```

use std::io;
use std::path::PathBuf;

/// The main error type for package operations.
///
/// | Category | Variants | Typical Cause |
/// |----------|----------|---------------|
/// | Input | [`MissingInput`][Self::MissingInput], [`BackupExists`][Self::BackupExists], [`PathOccupied`][Self::PathOccupied] | Expected file absent, already processed, or in the way |
/// | Package | [`Extract`][Self::Extract], [`PackageWrite`][Self::PackageWrite], [`PathTraversal`][Self::PathTraversal] | Corrupt or unwritable zip |
/// | Filesystem | [`Rename`][Self::Rename], [`Transform`][Self::Transform], [`Io`][Self::Io] | Permissions, disk full |
/// | Fatal | [`WorkingDirectoryRestore`][Self::WorkingDirectoryRestore] | Process state corrupted |
/// | Arguments | [`InvalidDate`][Self::InvalidDate], [`InvalidDateRange`][Self::InvalidDateRange], [`InvalidArgument`][Self::InvalidArgument], [`InvalidEntryName`][Self::InvalidEntryName] | Bad user input |
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error occurred outside any specific pipeline step.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An expected input file does not exist.
    #[error("missing input: {}", path.display())]
    MissingInput {
        /// The path that was expected to exist.
        path: PathBuf,
    },

    /// A backup from an earlier run is still present.
    #[error("backup already exists: {}", path.display())]
    BackupExists {
        /// The backup path.
        path: PathBuf,
    },

    /// A path the operation would create already exists.
    #[error("refusing to overwrite existing {}", path.display())]
    PathOccupied {
        /// The existing path.
        path: PathBuf,
    },

    /// The package could not be unpacked.
    #[error("cannot extract {}: {reason}", path.display())]
    Extract {
        /// The package path.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// A package entry would be written outside the destination directory.
    #[error("entry '{entry}' escapes the extraction directory")]
    PathTraversal {
        /// The entry name as stored in the package.
        entry: String,
    },

    /// An entry name is not a valid base-name-only package entry.
    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),

    /// A rename step failed.
    #[error("cannot rename {} to {}: {source}", from.display(), to.display())]
    Rename {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The content rewrite failed.
    #[error("cannot transform {}: {source}", path.display())]
    Transform {
        /// The path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The new package could not be written.
    #[error("cannot write package {}: {reason}", path.display())]
    PackageWrite {
        /// The package path.
        path: PathBuf,
        /// Description of the failure.
        reason: String,
    },

    /// The working directory could not be restored after packaging.
    ///
    /// This is the only fatal error: the batch aborts without further cleanup.
    #[error("cannot restore working directory {}: {source}", dir.display())]
    WorkingDirectoryRestore {
        /// The directory that should have been re-entered.
        dir: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A date argument could not be parsed.
    #[error("invalid date '{input}': expected YYYYMMDD")]
    InvalidDate {
        /// The rejected input.
        input: String,
    },

    /// The start date is after the end date.
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange {
        /// First date of the range.
        start: String,
        /// Last date of the range.
        end: String,
    },

    /// A command argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Returns true if this error must abort the whole batch.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::WorkingDirectoryRestore { .. })
    }

    pub(crate) fn extract(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Extract {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn package_write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::PackageWrite {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

/// A specialized Result type for package operations.
pub type Result<T> = std::result::Result<T, Error>;
