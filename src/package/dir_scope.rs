//! Scoped change of the process working directory.
//!
//! The working directory is process-wide. Every change goes through
//! [`DirScope`], which holds a global lock for its whole lifetime and puts
//! the previous directory back when it ends.

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::{Error, Result};

static WORKING_DIR_LOCK: Mutex<()> = Mutex::new(());

/// Guard that keeps the process inside a directory until restored or dropped.
#[must_use = "the previous working directory is restored when the scope ends"]
pub(crate) struct DirScope {
    previous: PathBuf,
    restored: bool,
    _lock: MutexGuard<'static, ()>,
}

impl DirScope {
    /// Locks the working directory and changes into `dir`.
    pub(crate) fn enter(dir: &Path) -> io::Result<Self> {
        let lock = WORKING_DIR_LOCK.lock().unwrap_or_else(|poisoned| {
            log::warn!("Working directory lock was poisoned, recovering");
            PoisonError::into_inner(poisoned)
        });

        let previous = env::current_dir()?;
        env::set_current_dir(dir)?;
        log::trace!("Entered '{}'", dir.display());

        Ok(Self {
            previous,
            restored: false,
            _lock: lock,
        })
    }

    /// Changes back to the previous directory.
    ///
    /// # Errors
    ///
    /// Returns the fatal [`Error::WorkingDirectoryRestore`] if the previous
    /// directory cannot be re-entered. No second attempt is made on drop.
    pub(crate) fn restore(mut self) -> Result<()> {
        self.restored = true;
        env::set_current_dir(&self.previous).map_err(|source| Error::WorkingDirectoryRestore {
            dir: self.previous.clone(),
            source,
        })
    }
}

impl Drop for DirScope {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = env::set_current_dir(&self.previous) {
            log::error!(
                "Failed to restore working directory '{}': {}",
                self.previous.display(),
                e
            );
        }
    }
}
