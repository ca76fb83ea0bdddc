//! The transactional per-file pipeline.
//!
//! REMOVE and ADD-FIELD run the same sequence of steps:
//!
//! 1. check the package exists and nothing the operation will create is
//!    already on disk
//! 2. extract the package next to itself
//! 3. move the package to `.orig` and the content to its staging path
//! 4. rewrite the content (REMOVE only)
//! 5. package the final content
//! 6. delete the intermediate content files
//!
//! Every path created from step 2 on is recorded in a [`BackupLedger`]. When a
//! step fails the ledger is rolled back and the package backup is moved back
//! into place, so the date ends either fully committed or exactly as it
//! started. The only error that escapes [`FileOperation::run`] is the fatal
//! [`Error::WorkingDirectoryRestore`]; everything else becomes an
//! [`Outcome::Fail`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use filetime::FileTime;

use crate::layout::{LogicalFile, package_name_for};
use crate::ledger::BackupLedger;
use crate::operation::{FieldInsertion, Operation};
use crate::package::{PackageStore, ZipStore};
use crate::report::{FailReason, Outcome};
use crate::transform::strip_trailing_char;
use crate::{Error, Result};

/// Content rewrite chosen by the operation.
#[derive(Debug, Clone, Copy)]
enum Rewrite<'a> {
    StripTrailing(char),
    InsertField(&'a FieldInsertion),
}

/// Runs one [`Operation`] against individual dated files.
#[derive(Debug, Clone)]
pub struct FileOperation<S = ZipStore> {
    store: S,
    operation: Operation,
}

impl FileOperation<ZipStore> {
    /// Creates an operation backed by the zip store.
    pub fn new(operation: Operation) -> Self {
        Self::with_store(ZipStore::new(), operation)
    }
}

impl<S: PackageStore> FileOperation<S> {
    /// Creates an operation backed by a custom package store.
    pub fn with_store(store: S, operation: Operation) -> Self {
        Self { store, operation }
    }

    /// Returns the operation being applied.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Applies the operation to `file`.
    ///
    /// # Errors
    ///
    /// Returns an error only when it is fatal to the whole batch
    /// ([`Error::is_fatal`]). Recoverable failures are rolled back and
    /// reported through [`Outcome::Fail`].
    pub fn run(&self, file: &LogicalFile) -> Result<Outcome> {
        log::debug!(
            "{} '{}'",
            self.operation.operation_type(),
            file.package_path().display()
        );

        match &self.operation {
            Operation::Remove { trailing } => self.rewrite(file, Rewrite::StripTrailing(*trailing)),
            Operation::AddField(field) => self.rewrite(file, Rewrite::InsertField(field)),
            Operation::Undo { derived } => Ok(undo(file, derived.as_ref())),
            Operation::Scan => Ok(scan(file)),
        }
    }

    fn rewrite(&self, file: &LogicalFile, rewrite: Rewrite<'_>) -> Result<Outcome> {
        let package = file.package_path();
        let backup_package = file.backup_package_path();

        if !package.is_file() {
            return Ok(Outcome::fail(FailReason::MissingFile));
        }
        if backup_package.exists() {
            let err = Error::BackupExists {
                path: backup_package,
            };
            log::warn!("{}", err);
            return Ok(Outcome::fail_with(FailReason::BackupExists, err));
        }

        if let Some((path, reason)) = occupied_target(file, rewrite) {
            let err = Error::PathOccupied { path };
            log::warn!("{}", err);
            return Ok(Outcome::fail_with(reason, err));
        }

        let mut ledger = BackupLedger::new();

        // Extract
        match self.store.extract(&package, file.dir()) {
            Ok(paths) => paths.into_iter().for_each(|path| ledger.record(path)),
            Err(e) => return Ok(abort(&mut ledger, None, FailReason::Unzip, e)),
        }
        let content = file.content_path();
        if !ledger.paths().contains(&content) {
            let err = Error::extract(&package, format!("no entry named '{}'", file.name()));
            return Ok(abort(&mut ledger, None, FailReason::Unzip, err));
        }

        // Snapshot
        let staged = match rewrite {
            Rewrite::StripTrailing(_) => file.backup_content_path(),
            Rewrite::InsertField(field) => file.dir().join(field.apply(file.name())),
        };
        if let Err(e) = rename(&package, &backup_package) {
            return Ok(abort(&mut ledger, Some(&package), FailReason::Rename, e));
        }
        if let Err(e) = rename(&content, &staged) {
            return Ok(abort(&mut ledger, Some(&package), FailReason::Rename, e));
        }
        ledger.record(&staged);

        // Transform
        let (final_content, new_package_name) = match rewrite {
            Rewrite::StripTrailing(ch) => {
                ledger.record(&content);
                match strip_trailing_char(&staged, &content, ch) {
                    Ok(Some(_)) => copy_mtime(&staged, &content),
                    Ok(None) => {
                        let err = Error::MissingInput { path: staged };
                        return Ok(abort(&mut ledger, Some(&package), FailReason::Cleanup, err));
                    }
                    Err(e) => {
                        return Ok(abort(&mut ledger, Some(&package), FailReason::Cleanup, e));
                    }
                }
                (content, file.package_name())
            }
            Rewrite::InsertField(field) => {
                let name = package_name_for(&field.apply(file.name()));
                (staged, name)
            }
        };

        // Repackage
        match self
            .store
            .create_single_file_archive(file.dir(), &new_package_name, &final_content)
        {
            Ok(_) => {}
            Err(e) if e.is_fatal() => {
                log::error!("Aborting: {}", e);
                return Err(e);
            }
            Err(e) => return Ok(abort(&mut ledger, Some(&package), FailReason::Zip, e)),
        }

        // Commit
        let _ = ledger.rollback_all();
        log::info!(
            "{} committed for '{}'",
            self.operation.operation_type(),
            file.dir().join(&new_package_name).display()
        );
        Ok(Outcome::Pass)
    }
}

/// Returns the first path the rewrite would create that already exists, with
/// the step that would collide with it.
///
/// The ledger deletes whatever the operation creates, so none of these may
/// belong to anyone else.
fn occupied_target(file: &LogicalFile, rewrite: Rewrite<'_>) -> Option<(PathBuf, FailReason)> {
    let mut targets = vec![(file.content_path(), FailReason::Unzip)];
    match rewrite {
        Rewrite::StripTrailing(_) => {
            targets.push((file.backup_content_path(), FailReason::BackupExists));
        }
        Rewrite::InsertField(field) => {
            let name = field.apply(file.name());
            targets.push((file.dir().join(package_name_for(&name)), FailReason::Zip));
            targets.push((file.dir().join(name), FailReason::Rename));
        }
    }

    targets
        .into_iter()
        .find(|(path, _)| fs::symlink_metadata(path).is_ok())
}

/// Rolls back everything recorded and, once the package was moved, its backup.
fn abort(
    ledger: &mut BackupLedger,
    original: Option<&Path>,
    reason: FailReason,
    error: impl Into<Error>,
) -> Outcome {
    let error = error.into();
    log::warn!("{}: {}", reason, error);

    let _ = ledger.rollback_all();
    if let Some(original) = original {
        let _ = ledger.revert_backup(original);
    }
    Outcome::fail_with(reason, error)
}

fn undo(file: &LogicalFile, derived: Option<&FieldInsertion>) -> Outcome {
    let package = file.package_path();
    let backup = file.backup_package_path();

    if !backup.is_file() {
        return Outcome::fail(FailReason::MissingBackup);
    }

    let mut current: Vec<PathBuf> = Vec::with_capacity(2);
    if let Some(field) = derived {
        current.push(file.dir().join(package_name_for(&field.apply(file.name()))));
    }
    current.push(package.clone());

    for path in &current {
        if let Err(e) = remove_if_present(path) {
            log::warn!("Cannot remove '{}': {}", path.display(), e);
            return Outcome::fail_with(FailReason::RemoveCurrent, e);
        }
    }

    if let Err(e) = rename(&backup, &package) {
        log::warn!("{}", e);
        return Outcome::fail_with(FailReason::RenameBackup, e);
    }

    log::info!("Restored '{}'", package.display());
    Outcome::Pass
}

fn scan(file: &LogicalFile) -> Outcome {
    if file.package_path().is_file() {
        Outcome::Pass
    } else {
        Outcome::fail(FailReason::MissingFile)
    }
}

fn rename(from: &Path, to: &Path) -> Result<()> {
    fs::rename(from, to).map_err(|source| Error::Rename {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

/// Carries the original content's modification time over to its rewrite.
fn copy_mtime(from: &Path, to: &Path) {
    let result = fs::metadata(from).and_then(|meta| {
        filetime::set_file_mtime(to, FileTime::from_last_modification_time(&meta))
    });
    if let Err(e) = result {
        log::warn!(
            "Failed to copy modification time to '{}': {}",
            to.display(),
            e
        );
    }
}
