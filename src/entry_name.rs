//! Package entry names restricted to a single path segment.

use crate::{Error, Result};
use std::fmt;
use std::path::Path;

/// Maximum length for entry names (in bytes).
const MAX_NAME_LENGTH: usize = 255;

/// Windows reserved device names that cannot be used as filenames.
///
/// Rejected on all platforms so a package written here can be extracted on
/// Windows as well.
const WINDOWS_RESERVED_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Checks if a filename is a Windows reserved name.
///
/// Windows reserved names are case-insensitive and also reserved
/// when followed by an extension (e.g., "CON.txt" is reserved).
fn is_windows_reserved(name: &str) -> bool {
    let base = match name.find('.') {
        Some(pos) => &name[..pos],
        None => name,
    };

    WINDOWS_RESERVED_NAMES
        .iter()
        .any(|reserved| base.eq_ignore_ascii_case(reserved))
}

/// A validated entry name for a single-file package.
///
/// Packages written by this crate hold exactly one entry stored under its
/// base name, so that extracting the package next to itself reproduces the
/// original flat layout. `EntryName` therefore rejects anything with a
/// directory component:
/// - No NUL bytes
/// - No `/` or `\` separators
/// - Not `.` or `..`
/// - Not empty
///
/// # Examples
///
/// ```
/// use depipe::EntryName;
///
/// let name = EntryName::new("20190901.BHTN.RETRO01D").unwrap();
/// assert_eq!(name.as_str(), "20190901.BHTN.RETRO01D");
///
/// assert!(EntryName::new("BHTN/20190901.BHTN.RETRO01D").is_err());
/// assert!(EntryName::new("..").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryName(String);

impl EntryName {
    /// Creates a new `EntryName` from a string, validating it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntryName`] if the name is empty, too long,
    /// contains NUL bytes or path separators, is `.`/`..`, or is a Windows
    /// reserved device name.
    pub fn new(s: &str) -> Result<Self> {
        Self::validate(s)?;
        Ok(Self(s.to_string()))
    }

    /// Creates an entry name from the final component of a filesystem path.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                Error::InvalidEntryName(format!("{} has no UTF-8 file name", path.display()))
            })?;
        Self::new(name)
    }

    fn validate(s: &str) -> Result<()> {
        if s.is_empty() {
            return Err(Error::InvalidEntryName("empty name".into()));
        }

        if s.contains('\0') {
            return Err(Error::InvalidEntryName("contains NUL byte".into()));
        }

        if s.len() > MAX_NAME_LENGTH {
            return Err(Error::InvalidEntryName(format!(
                "name exceeds maximum length of {} bytes",
                MAX_NAME_LENGTH
            )));
        }

        if s.contains('/') || s.contains('\\') {
            return Err(Error::InvalidEntryName(format!(
                "'{}' contains a directory separator",
                s
            )));
        }

        if s == "." || s == ".." {
            return Err(Error::InvalidEntryName(format!("'{}' not allowed", s)));
        }

        if is_windows_reserved(s) {
            return Err(Error::InvalidEntryName(format!(
                "Windows reserved filename '{}' not allowed",
                s
            )));
        }

        Ok(())
    }

    /// Returns the name as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
