//! Per-date results and their report lines.

use std::fmt;
use std::path::{Path, PathBuf};

/// Why an operation on one date did not pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FailReason {
    /// The package for the date does not exist.
    MissingFile,
    /// A backup from an earlier run would be overwritten.
    BackupExists,
    /// The package could not be extracted.
    Unzip,
    /// The package or its content could not be moved aside.
    Rename,
    /// The content rewrite failed.
    Cleanup,
    /// The new package could not be written.
    Zip,
    /// UNDO found no backup package.
    MissingBackup,
    /// UNDO could not delete the current package.
    RemoveCurrent,
    /// UNDO could not move the backup into place.
    RenameBackup,
}

impl FailReason {
    /// Returns the text printed after `FAIL - `.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFile => "missing file",
            Self::BackupExists => "existing .orig file",
            Self::Unzip => "unable to unzip",
            Self::Rename => "unable to rename",
            Self::Cleanup => "cleanup error",
            Self::Zip => "unable to zip new file",
            Self::MissingBackup => "missing .orig file",
            Self::RemoveCurrent => "unable to remove current",
            Self::RenameBackup => "unable to rename .orig file",
        }
    }
}

impl fmt::Display for FailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one operation on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The operation committed.
    Pass,
    /// The operation was skipped or rolled back.
    Fail {
        /// Category shown in the report line.
        reason: FailReason,
        /// Underlying error message, if any.
        detail: Option<String>,
    },
}

impl Outcome {
    /// A failure with no underlying error.
    pub fn fail(reason: FailReason) -> Self {
        Outcome::Fail {
            reason,
            detail: None,
        }
    }

    /// A failure caused by `error`.
    pub fn fail_with(reason: FailReason, error: impl fmt::Display) -> Self {
        Outcome::Fail {
            reason,
            detail: Some(error.to_string()),
        }
    }

    /// Returns true for [`Outcome::Pass`].
    pub fn is_pass(&self) -> bool {
        matches!(self, Outcome::Pass)
    }

    /// Returns the failure reason, if any.
    pub fn reason(&self) -> Option<FailReason> {
        match self {
            Outcome::Pass => None,
            Outcome::Fail { reason, .. } => Some(*reason),
        }
    }
}

/// The outcome for one date, keyed by its package path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    path: PathBuf,
    outcome: Outcome,
}

impl Report {
    /// Creates a report line.
    pub fn new(path: impl Into<PathBuf>, outcome: Outcome) -> Self {
        Self {
            path: path.into(),
            outcome,
        }
    }

    /// Returns the package path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the outcome.
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Outcome::Pass => write!(f, "{} PASS", self.path.display()),
            Outcome::Fail { reason, .. } => {
                write!(f, "{} FAIL - {}", self.path.display(), reason)
            }
        }
    }
}
