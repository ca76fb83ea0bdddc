//! Exit codes for the CLI tool.

use depipe::{BatchSummary, Error};

/// Exit code constants
pub const SUCCESS: i32 = 0;
/// At least one date failed
pub const WARNING: i32 = 1;
/// Fatal error occurred
pub const FATAL_ERROR: i32 = 2;
/// I/O error
pub const IO_ERROR: i32 = 5;
/// Ctrl+C (128 + SIGINT)
pub const USER_INTERRUPT: i32 = 130;
/// Invalid command line arguments
pub const BAD_ARGS: i32 = 255;

/// Exit code enum for structured handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    Warning,
    FatalError,
    IoError,
    UserInterrupt,
    BadArgs,
}

impl ExitCode {
    /// Returns the numeric exit code
    pub fn code(self) -> i32 {
        match self {
            Self::Success => SUCCESS,
            Self::Warning => WARNING,
            Self::FatalError => FATAL_ERROR,
            Self::IoError => IO_ERROR,
            Self::UserInterrupt => USER_INTERRUPT,
            Self::BadArgs => BAD_ARGS,
        }
    }
}

/// Converts a finished batch to an exit code
pub fn summary_to_exit_code(summary: &BatchSummary) -> ExitCode {
    if summary.interrupted {
        ExitCode::UserInterrupt
    } else if summary.failed() > 0 {
        ExitCode::Warning
    } else {
        ExitCode::Success
    }
}

/// Converts a depipe error to an exit code
pub fn error_to_exit_code(error: &Error) -> ExitCode {
    match error {
        Error::WorkingDirectoryRestore { .. } => ExitCode::FatalError,
        Error::Io(_) => ExitCode::IoError,
        Error::InvalidDate { .. }
        | Error::InvalidDateRange { .. }
        | Error::InvalidArgument(_)
        | Error::InvalidEntryName(_) => ExitCode::BadArgs,
        // Future error variants - required by #[non_exhaustive]
        _ => ExitCode::FatalError,
    }
}
