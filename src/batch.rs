//! Date ranges and the batch driver.
//!
//! A [`Batch`] walks a [`DateRange`] in ascending order and runs its
//! [`FileOperation`] once per date. Each date produces exactly one
//! [`Report`]; a failed date never stops the batch. Only a fatal error
//! ([`Error::is_fatal`]) or a cancellation request ends it early, and
//! cancellation is only honoured between dates.
//!
//! # Example
//!
//! ```rust,no_run
//! use depipe::{Batch, DateRange, FileOperation, Layout, Operation};
//!
//! let layout = Layout::new("BHTN", "RETRO", "01D");
//! let range = DateRange::parse("20190831", "20190903")?;
//! let batch = Batch::new(layout, FileOperation::new(Operation::Remove { trailing: '|' }));
//!
//! let summary = batch.run_to_writer(&range, &mut std::io::stdout())?;
//! println!("{} passed, {} failed", summary.passed(), summary.failed());
//! # Ok::<(), depipe::Error>(())
//! ```

use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;

use crate::layout::{DATE_FORMAT, Layout};
use crate::package::{PackageStore, ZipStore};
use crate::pipeline::FileOperation;
use crate::report::Report;
use crate::{Error, Result};

/// Parses a `YYYYMMDD` date.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] for anything but eight digits forming a
/// valid calendar date.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let invalid = || Error::InvalidDate {
        input: input.to_string(),
    };
    if input.len() != 8 || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(input, DATE_FORMAT).map_err(|_| invalid())
}

/// An inclusive, ascending range of dates.
///
/// The range is a plain value: iterating it does not consume it, so the same
/// range can be walked any number of times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range from `start` to `end`, both included.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDateRange`] if `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::InvalidDateRange {
                start: start.format(DATE_FORMAT).to_string(),
                end: end.format(DATE_FORMAT).to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Parses both ends from `YYYYMMDD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Returns the first date.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Returns the last date.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns the number of dates in the range.
    pub fn len(&self) -> usize {
        (self.end - self.start).num_days() as usize + 1
    }

    /// Always false: a range holds at least one date.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the dates.
    pub fn iter(&self) -> Dates {
        Dates {
            next: Some(self.start),
            end: self.end,
        }
    }
}

impl IntoIterator for DateRange {
    type Item = NaiveDate;
    type IntoIter = Dates;

    fn into_iter(self) -> Dates {
        self.iter()
    }
}

impl IntoIterator for &DateRange {
    type Item = NaiveDate;
    type IntoIter = Dates;

    fn into_iter(self) -> Dates {
        self.iter()
    }
}

/// Iterator over the dates of a [`DateRange`].
#[derive(Debug, Clone)]
pub struct Dates {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for Dates {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = if current < self.end {
            current.succ_opt()
        } else {
            None
        };
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self
            .next
            .map_or(0, |next| (self.end - next).num_days() as usize + 1);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Dates {}

/// Reports collected over a batch.
#[must_use = "the summary tells whether any date failed"]
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    /// One report per processed date, in date order.
    pub reports: Vec<Report>,
    /// Whether the batch stopped early on request.
    pub interrupted: bool,
}

impl BatchSummary {
    /// Number of dates that passed.
    pub fn passed(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome().is_pass()).count()
    }

    /// Number of dates that failed.
    pub fn failed(&self) -> usize {
        self.reports.len() - self.passed()
    }

    /// Returns true if every processed date passed and nothing was skipped.
    pub fn is_ok(&self) -> bool {
        !self.interrupted && self.failed() == 0
    }
}

/// Applies one operation to every date of a range.
#[derive(Debug)]
pub struct Batch<S = ZipStore> {
    layout: Layout,
    operation: FileOperation<S>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<S: PackageStore> Batch<S> {
    /// Creates a batch for `layout`.
    pub fn new(layout: Layout, operation: FileOperation<S>) -> Self {
        Self {
            layout,
            operation,
            cancel: None,
        }
    }

    /// Sets a flag that stops the batch before the next date when raised.
    pub fn cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Returns the layout.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Runs the batch, handing each report to `on_report` as it is produced.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error. Reports already handed out stay valid;
    /// no later date is attempted.
    pub fn run<F>(&self, range: &DateRange, mut on_report: F) -> Result<BatchSummary>
    where
        F: FnMut(&Report) -> Result<()>,
    {
        let mut summary = BatchSummary::default();

        for date in range {
            if self.is_cancelled() {
                log::warn!(
                    "Interrupted before {}",
                    date.format(DATE_FORMAT)
                );
                summary.interrupted = true;
                break;
            }

            let file = self.layout.file(date);
            let outcome = match self.operation.run(&file) {
                Ok(outcome) => outcome,
                Err(e) => {
                    log::error!(
                        "Batch aborted at {}: {}",
                        file.package_path().display(),
                        e
                    );
                    return Err(e);
                }
            };

            let report = Report::new(file.package_path(), outcome);
            on_report(&report)?;
            summary.reports.push(report);
        }

        log::info!(
            "{}: {} passed, {} failed",
            self.operation.operation().operation_type(),
            summary.passed(),
            summary.failed()
        );
        Ok(summary)
    }

    /// Runs the batch, writing one report line per date to `out`.
    pub fn run_to_writer<W: Write>(&self, range: &DateRange, out: &mut W) -> Result<BatchSummary> {
        self.run(range, |report| {
            writeln!(out, "{}", report)?;
            Ok(())
        })
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("20190901").unwrap(), date(2019, 9, 1));
        assert!(parse_date("2019091").is_err());
        assert!(parse_date("2019-09-01").is_err());
        assert!(parse_date("20190231").is_err());
        assert!(parse_date("+2019090").is_err());
    }

    #[test]
    fn test_range_crosses_month_end() {
        let range = DateRange::parse("20190830", "20190902").unwrap();
        let dates: Vec<_> = range.iter().collect();
        assert_eq!(
            dates,
            vec![
                date(2019, 8, 30),
                date(2019, 8, 31),
                date(2019, 9, 1),
                date(2019, 9, 2)
            ]
        );
        assert_eq!(range.len(), 4);
    }

    #[test]
    fn test_range_is_restartable() {
        let range = DateRange::parse("20200228", "20200301").unwrap();
        let first: Vec<_> = range.into_iter().collect();
        let second: Vec<_> = (&range).into_iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_single_day_range() {
        let range = DateRange::parse("20190901", "20190901").unwrap();
        let mut dates = range.iter();
        assert_eq!(dates.len(), 1);
        assert_eq!(dates.next(), Some(date(2019, 9, 1)));
        assert_eq!(dates.next(), None);
        assert_eq!(dates.len(), 0);
    }

    #[test]
    fn test_reversed_range_rejected() {
        let err = DateRange::parse("20190903", "20190831").unwrap_err();
        assert!(matches!(err, Error::InvalidDateRange { .. }));
    }

    #[test]
    fn test_range_ending_at_max_date() {
        let range = DateRange::new(NaiveDate::MAX, NaiveDate::MAX).unwrap();
        assert_eq!(range.iter().count(), 1);
    }
}
