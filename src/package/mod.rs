//! Package (zip) extraction and single-file creation.
//!
//! The pipeline only needs two things from a package format: unpack
//! everything next to the package, and wrap one file into a new package under
//! its bare file name. [`PackageStore`] is that seam; [`ZipStore`] is the
//! implementation used in production.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use depipe::package::{PackageStore, ZipStore};
//!
//! let store = ZipStore::new();
//! let dir = Path::new("./BHTN/20190901");
//! let files = store.extract(&dir.join("20190901.BHTN.RETRO01D.zip"), dir)?;
//! store.create_single_file_archive(dir, "copy.zip", &files[0])?;
//! # Ok::<(), depipe::Error>(())
//! ```

mod dir_scope;
mod options;
mod zip_store;

use std::path::{Path, PathBuf};

use crate::Result;

pub use options::{PackageMethod, PackageOptions};
pub use zip_store::ZipStore;

/// Extracts and creates single-file packages.
///
/// Implementations never retry; every failure is returned to the caller.
pub trait PackageStore {
    /// Unpacks every entry of `package` into `dest_dir`.
    ///
    /// Returns the paths of the files written. Every entry lands directly in
    /// `dest_dir` and existing files are never overwritten. On failure, files
    /// written so far are removed before the error is returned.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Extract`](crate::Error::Extract) if the package is
    /// missing or corrupt, holds a directory or nested entry, an entry would
    /// replace an existing file, or `dest_dir` is unwritable, and
    /// [`Error::PathTraversal`](crate::Error::PathTraversal) if an entry
    /// would land outside `dest_dir`.
    fn extract(&self, package: &Path, dest_dir: &Path) -> Result<Vec<PathBuf>>;

    /// Creates `package_dir/package_name` holding only `source`.
    ///
    /// The entry is stored under the base name of `source`, with no
    /// directory prefix. Returns the path of the new package.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PackageWrite`](crate::Error::PackageWrite) on I/O
    /// failure (any partial package is removed) and the fatal
    /// [`Error::WorkingDirectoryRestore`](crate::Error::WorkingDirectoryRestore)
    /// if the process cannot return to its previous working directory.
    fn create_single_file_archive(
        &self,
        package_dir: &Path,
        package_name: &str,
        source: &Path,
    ) -> Result<PathBuf>;
}
