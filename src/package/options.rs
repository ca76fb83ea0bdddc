//! Options for package creation.

use std::time::SystemTime;

use chrono::{Datelike, Local, Timelike};
use zip::write::FileOptions;

use crate::{Error, Result};

/// Compression applied to the single entry of a new package.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PackageMethod {
    /// No compression.
    Stored,
    /// Deflate compression (requires the `deflate` feature).
    #[cfg(feature = "deflate")]
    Deflated,
}

impl Default for PackageMethod {
    fn default() -> Self {
        #[cfg(feature = "deflate")]
        {
            PackageMethod::Deflated
        }
        #[cfg(not(feature = "deflate"))]
        {
            PackageMethod::Stored
        }
    }
}

impl From<PackageMethod> for zip::CompressionMethod {
    fn from(method: PackageMethod) -> Self {
        match method {
            PackageMethod::Stored => zip::CompressionMethod::Stored,
            #[cfg(feature = "deflate")]
            PackageMethod::Deflated => zip::CompressionMethod::Deflated,
        }
    }
}

/// Options controlling how packages are written.
///
/// # Example
///
/// ```rust
/// use depipe::package::{PackageMethod, PackageOptions};
///
/// let options = PackageOptions::new()
///     .method(PackageMethod::Stored)
///     .level(0)
///     .unwrap();
/// assert_eq!(options.method, PackageMethod::Stored);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackageOptions {
    /// Compression method for the entry.
    pub method: PackageMethod,
    /// Compression level (0-9), or the method's default.
    pub level: Option<u32>,
}

impl PackageOptions {
    /// Creates options with the default method and level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the compression method.
    pub fn method(mut self, method: PackageMethod) -> Self {
        self.method = method;
        self
    }

    /// Sets the compression level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if level is greater than 9.
    pub fn level(mut self, level: u32) -> Result<Self> {
        if level > 9 {
            return Err(Error::InvalidArgument(format!(
                "compression level {} out of range 0-9",
                level
            )));
        }
        self.level = Some(level);
        Ok(self)
    }

    /// Builds zip entry options, stamping the entry with `modified` if given.
    pub(crate) fn file_options(&self, modified: Option<SystemTime>) -> FileOptions {
        let mut options = FileOptions::default()
            .compression_method(self.method.into())
            .compression_level(self.level.map(|level| level as i32));

        if let Some(stamp) = modified.and_then(to_zip_time) {
            options = options.last_modified_time(stamp);
        }
        options
    }
}

/// Converts a filesystem time to the zip entry's local MS-DOS time.
///
/// Returns `None` outside the representable range (1980-2107).
pub(crate) fn to_zip_time(time: SystemTime) -> Option<zip::DateTime> {
    let local: chrono::DateTime<Local> = time.into();
    zip::DateTime::from_date_and_time(
        u16::try_from(local.year()).ok()?,
        local.month() as u8,
        local.day() as u8,
        local.hour() as u8,
        local.minute() as u8,
        local.second() as u8,
    )
    .ok()
}
