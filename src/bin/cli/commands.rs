//! Command implementations for the CLI tool.

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use depipe::{Batch, DateRange, FieldInsertion, FileOperation, Layout, Operation};

use crate::exit_codes::{ExitCode, error_to_exit_code, summary_to_exit_code};
use crate::output::create_formatter;
use crate::progress::BatchProgress;
use crate::{OutputFormat, Target};

/// Settings shared by every batch command.
pub struct BatchConfig<'a> {
    pub root: &'a Path,
    pub suffix: Option<&'a str>,
    pub target: &'a Target,
    pub format: OutputFormat,
    pub quiet: bool,
    pub cancel: Arc<AtomicBool>,
}

/// Remove command implementation
pub fn remove(config: &BatchConfig<'_>, trailing: &str) -> ExitCode {
    let mut chars = trailing.chars();
    let trailing = match (chars.next(), chars.next()) {
        (Some(ch), None) => ch,
        _ => {
            eprintln!("Error: '{}' is not a single character", trailing);
            return ExitCode::BadArgs;
        }
    };

    run_batch(config, Operation::Remove { trailing })
}

/// Add-field command implementation
pub fn add_field(config: &BatchConfig<'_>, field: &str, position: usize) -> ExitCode {
    match FieldInsertion::new(field, position) {
        Ok(field) => run_batch(config, Operation::AddField(field)),
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::BadArgs
        }
    }
}

/// Undo command implementation
///
/// `field` holds the `NAME POSITION` pair given to `--field`, if any.
pub fn undo(config: &BatchConfig<'_>, field: Option<&[String]>) -> ExitCode {
    let derived = match field {
        None => None,
        Some([name, position]) => {
            let position = match position.parse::<usize>() {
                Ok(p) => p,
                Err(_) => {
                    eprintln!("Error: '{}' is not a valid field position", position);
                    return ExitCode::BadArgs;
                }
            };
            match FieldInsertion::new(name.as_str(), position) {
                Ok(field) => Some(field),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::BadArgs;
                }
            }
        }
        Some(_) => {
            eprintln!("Error: --field takes a name and a position");
            return ExitCode::BadArgs;
        }
    };

    run_batch(config, Operation::Undo { derived })
}

/// Scan command implementation
pub fn scan(config: &BatchConfig<'_>) -> ExitCode {
    run_batch(config, Operation::Scan)
}

fn run_batch(config: &BatchConfig<'_>, operation: Operation) -> ExitCode {
    let target = config.target;

    let mut layout = Layout::new(&target.facility, &target.file_type, &target.version)
        .root(config.root);
    if let Some(suffix) = config.suffix {
        layout = layout.suffix(suffix);
    }

    let facility_dir = layout.facility_dir();
    if !facility_dir.is_dir() {
        eprintln!(
            "Error: {} is not a valid facility directory",
            facility_dir.display()
        );
        return ExitCode::BadArgs;
    }

    let range = match DateRange::parse(&target.start, &target.end) {
        Ok(range) => range,
        Err(e) => {
            eprintln!("Error: {}", e);
            return error_to_exit_code(&e);
        }
    };

    let formatter = create_formatter(config.format);
    let progress = BatchProgress::new(range.len() as u64, config.quiet);
    progress.set_message(operation.operation_type());

    let batch = Batch::new(layout, FileOperation::new(operation.clone()))
        .cancel_flag(Arc::clone(&config.cancel));

    let result = batch.run(&range, |report| {
        progress.inc(1);
        if let Some(line) = formatter.format_report(report) {
            progress.suspend(|| writeln!(io::stdout().lock(), "{}", line))?;
        }
        Ok(())
    });

    match result {
        Ok(summary) => {
            if summary.interrupted {
                progress.finish_with_message("Interrupted");
            } else {
                progress.finish();
            }

            let trailer = formatter.format_summary(&operation, &summary);
            if !trailer.is_empty() {
                println!("{}", trailer);
            }
            summary_to_exit_code(&summary)
        }
        Err(e) => {
            progress.finish_with_message("Aborted");
            if e.is_fatal() {
                eprintln!("Fatal: {}", e);
            } else {
                eprintln!("Error: {}", e);
            }
            error_to_exit_code(&e)
        }
    }
}
