//! CLI tool for depipe batch operations.

mod commands;
mod exit_codes;
mod output;
mod progress;

use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use exit_codes::ExitCode;

/// Batch rewrite of dated, zipped, pipe-delimited facility files
#[derive(Parser)]
#[command(name = "depipe")]
#[command(author, version, about = "Batch rewrite of dated, zipped, pipe-delimited facility files", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the facility directories
    #[arg(long, env = "DEPIPE_ROOT", default_value = ".", global = true)]
    root: PathBuf,

    /// Extra name component after the version (e.g. "HIST")
    #[arg(long, global = true)]
    suffix: Option<String>,

    /// Output format
    #[arg(long, short = 'f', value_enum, default_value = "human", global = true)]
    format: OutputFormat,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true)]
    quiet: bool,
}

/// Selects the dated files of one facility.
#[derive(Args)]
pub struct Target {
    /// Facility name, also the name of its directory
    pub facility: String,

    /// File type (e.g. RETRO)
    pub file_type: String,

    /// File version (e.g. 01D)
    #[arg(id = "file_version", value_name = "VERSION")]
    pub version: String,

    /// First date, YYYYMMDD
    pub start: String,

    /// Last date, YYYYMMDD (inclusive)
    pub end: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Remove a trailing character from every line (alias: r)
    #[command(alias = "r")]
    Remove {
        #[command(flatten)]
        target: Target,

        /// Character to strip from the end of each line
        trailing: String,
    },

    /// Insert a field into the file name (alias: a)
    #[command(alias = "a")]
    AddField {
        #[command(flatten)]
        target: Target,

        /// Field to insert
        field: String,

        /// 0-indexed position among the dot-separated name components
        position: usize,
    },

    /// Restore the .orig backup (alias: u)
    #[command(alias = "u")]
    Undo {
        #[command(flatten)]
        target: Target,

        /// Also remove the package created by add-field with this field
        #[arg(long, num_args = 2, value_names = ["NAME", "POSITION"])]
        field: Option<Vec<String>>,
    },

    /// Report which packages are present (alias: s)
    #[command(alias = "s")]
    Scan {
        #[command(flatten)]
        target: Target,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
}

fn batch_config<'a>(
    cli: &'a Cli,
    target: &'a Target,
    cancel: &Arc<AtomicBool>,
) -> commands::BatchConfig<'a> {
    commands::BatchConfig {
        root: &cli.root,
        suffix: cli.suffix.as_deref(),
        target,
        format: cli.format,
        quiet: cli.quiet,
        cancel: Arc::clone(cancel),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() {
                ExitCode::BadArgs
            } else {
                ExitCode::Success
            };
            std::process::exit(code.code());
        }
    };

    // The first Ctrl+C lets the current date finish; a second one exits at once.
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    ctrlc::set_handler(move || {
        if flag.swap(true, Ordering::SeqCst) {
            eprintln!("\nInterrupted");
            std::process::exit(exit_codes::USER_INTERRUPT);
        }
        eprintln!("\nStopping after the current date (Ctrl+C again to exit now)");
    })
    .ok();

    let exit_code = match &cli.command {
        Commands::Remove { target, trailing } => {
            commands::remove(&batch_config(&cli, target, &cancel), trailing)
        }

        Commands::AddField {
            target,
            field,
            position,
        } => commands::add_field(&batch_config(&cli, target, &cancel), field, *position),

        Commands::Undo { target, field } => {
            commands::undo(&batch_config(&cli, target, &cancel), field.as_deref())
        }

        Commands::Scan { target } => commands::scan(&batch_config(&cli, target, &cancel)),

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(*shell, &mut cmd, "depipe", &mut std::io::stdout());
            ExitCode::Success
        }
    };

    std::process::exit(exit_code.code());
}
