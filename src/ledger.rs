//! Rollback bookkeeping for a single package operation.
//!
//! A [`BackupLedger`] remembers every path an operation created, in creation
//! order, so that a failed step can remove them again. Rollback runs on paths
//! that are already failing, so nothing here returns an error: problems are
//! logged and collected in a [`BestEffort`] value instead.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Suffix appended to a path that is being preserved.
pub const BACKUP_SUFFIX: &str = ".orig";

/// Returns `path` with [`BACKUP_SUFFIX`] appended.
///
/// ```
/// use std::path::Path;
/// use depipe::ledger::backup_path;
///
/// assert_eq!(
///     backup_path(Path::new("a/20190901.BHTN.RETRO01D.zip")),
///     Path::new("a/20190901.BHTN.RETRO01D.zip.orig"),
/// );
/// ```
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Outcome of a cleanup step that must never fail.
///
/// Failures are recorded so callers and tests can inspect them, but a
/// `BestEffort` is never turned into an error.
#[must_use = "best-effort results carry failures that should at least be inspected in tests"]
#[derive(Debug, Default)]
pub struct BestEffort {
    /// Paths that were removed or restored.
    pub completed: Vec<PathBuf>,
    /// Paths that could not be handled, with the reason.
    pub failures: Vec<(PathBuf, io::Error)>,
}

impl BestEffort {
    /// Returns true if every step succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn fail(&mut self, path: &Path, error: io::Error) {
        log::warn!("Cleanup of '{}' failed: {}", path.display(), error);
        self.failures.push((path.to_path_buf(), error));
    }
}

/// Ordered record of the paths created by one operation.
#[derive(Debug, Default)]
pub struct BackupLedger {
    paths: Vec<PathBuf>,
}

impl BackupLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a path created by the current operation.
    pub fn record(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        log::trace!("Ledger: recorded '{}'", path.display());
        self.paths.push(path);
    }

    /// Returns the recorded paths in creation order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Returns the number of recorded paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Deletes every recorded path, newest first, and empties the ledger.
    ///
    /// Paths that no longer exist count as removed. A recorded path that
    /// turned out to be a directory is removed recursively.
    pub fn rollback_all(&mut self) -> BestEffort {
        let mut outcome = BestEffort::default();

        for path in self.paths.drain(..).rev() {
            let removed = match fs::symlink_metadata(&path) {
                Ok(meta) if meta.is_dir() => fs::remove_dir_all(&path),
                Ok(_) => fs::remove_file(&path),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e),
            };

            match removed {
                Ok(()) => outcome.completed.push(path),
                Err(e) => outcome.fail(&path, e),
            }
        }

        outcome
    }

    /// Moves `original.orig` back to `original` if the backup exists.
    ///
    /// Anything at `original` is replaced.
    pub fn revert_backup(&self, original: &Path) -> BestEffort {
        let mut outcome = BestEffort::default();
        let backup = backup_path(original);

        if !backup.exists() {
            return outcome;
        }

        match fs::rename(&backup, original) {
            Ok(()) => {
                log::debug!("Restored '{}' from backup", original.display());
                outcome.completed.push(original.to_path_buf());
            }
            Err(e) => outcome.fail(original, e),
        }

        outcome
    }
}
