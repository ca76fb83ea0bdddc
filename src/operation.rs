//! Operations applied to each dated file of a batch.

use crate::transform::insert_field;
use crate::{Error, Result};

/// An extra dot-delimited token to insert into a file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInsertion {
    name: String,
    position: usize,
}

impl FieldInsertion {
    /// Creates a field insertion, validating the token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `name` is empty or contains a
    /// `.` or a path separator.
    pub fn new(name: impl Into<String>, position: usize) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidArgument("field name is empty".into()));
        }
        if name.contains(['.', '/', '\\', '\0']) {
            return Err(Error::InvalidArgument(format!(
                "field name '{}' must be a single name token",
                name
            )));
        }
        Ok(Self { name, position })
    }

    /// Returns the token.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the 0-indexed insertion position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Applies the insertion to a content file name.
    pub fn apply(&self, file_name: &str) -> String {
        insert_field(file_name, &self.name, self.position)
    }
}

/// The operation run against every date of a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Strip a trailing delimiter from every line and repackage.
    Remove {
        /// Character removed where it ends a line.
        trailing: char,
    },
    /// Insert a token into the content and package names and repackage.
    AddField(FieldInsertion),
    /// Restore the backup package.
    Undo {
        /// Field of an earlier ADD-FIELD whose derived package is removed too.
        derived: Option<FieldInsertion>,
    },
    /// Report which packages exist.
    Scan,
}

impl Operation {
    /// Returns the operation type as a string.
    pub fn operation_type(&self) -> &'static str {
        match self {
            Operation::Remove { .. } => "remove",
            Operation::AddField(_) => "add-field",
            Operation::Undo { .. } => "undo",
            Operation::Scan => "scan",
        }
    }
}
