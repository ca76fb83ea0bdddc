//! Progress bar implementation for CLI operations.

use indicatif::{ProgressBar, ProgressStyle};

/// Progress display for a batch, one tick per date
pub struct BatchProgress {
    bar: ProgressBar,
}

impl BatchProgress {
    /// Creates a new progress bar
    pub fn new(total_dates: u64, quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let pb = ProgressBar::new(total_dates);
            let style = ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} dates ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-");
            pb.set_style(style);
            pb
        };

        Self { bar }
    }

    /// Increments the progress
    pub fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    /// Sets the message
    pub fn set_message(&self, msg: impl Into<String>) {
        self.bar.set_message(msg.into());
    }

    /// Hides the bar while `f` writes to the terminal
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    /// Finishes the progress bar
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Finishes with a message
    pub fn finish_with_message(&self, msg: impl Into<String>) {
        self.bar.abandon_with_message(msg.into());
    }
}
