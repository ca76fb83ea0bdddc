//! # depipe
//!
//! Batch rewriting of dated, zipped, pipe-delimited facility files with a
//! recoverable backup of every original.
//!
//! Each facility keeps one package per day:
//!
//! ```text
//! <root>/<facility>/<YYYYMMDD>/<YYYYMMDD>.<facility>.<type><version>[.<suffix>].zip
//! ```
//!
//! For every date of a range the crate can
//!
//! - **remove** a trailing delimiter from each line of the packaged file,
//! - **add a field** token to the file and package names,
//! - **undo** either of those by restoring the `.orig` backup, or
//! - **scan** for missing packages,
//!
//! printing one `PASS` / `FAIL - <reason>` line per date.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use depipe::{Batch, DateRange, FileOperation, Layout, Operation, Result};
//!
//! fn main() -> Result<()> {
//!     let layout = Layout::new("BHTN", "RETRO", "01D");
//!     let range = DateRange::parse("20190831", "20190903")?;
//!     let batch = Batch::new(layout, FileOperation::new(Operation::Remove { trailing: '|' }));
//!
//!     let summary = batch.run_to_writer(&range, &mut std::io::stdout())?;
//!     if !summary.is_ok() {
//!         eprintln!("{} dates failed", summary.failed());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Transactions
//!
//! A REMOVE or ADD-FIELD on one date either commits completely (new package,
//! `.orig` backup, no intermediate files) or leaves the directory exactly as
//! it was. See [`pipeline`] for the step sequence and [`ledger`] for the
//! rollback bookkeeping.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `deflate` | Yes | Deflate compression for new packages |
//! | `cli` | No | Command-line interface tool |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

/// Default buffer size for read operations (8 KiB).
pub(crate) const READ_BUFFER_SIZE: usize = 8192;

pub mod batch;
pub mod entry_name;
pub mod error;
pub mod layout;
pub mod ledger;
pub mod operation;
pub mod package;
pub mod pipeline;
pub mod report;
pub mod transform;

pub use entry_name::EntryName;
pub use error::{Error, Result};

// Re-export the batch API at crate root for convenience
pub use batch::{Batch, BatchSummary, DateRange, parse_date};
pub use layout::{Layout, LogicalFile};
pub use operation::{FieldInsertion, Operation};
pub use pipeline::FileOperation;
pub use report::{FailReason, Outcome, Report};

// Re-export package API
pub use package::{PackageMethod, PackageOptions, PackageStore, ZipStore};
