//! Progress reporting for the collection stage.
//!
//! Searches and fetch batches are paced, so a run against the live service
//! takes seconds to minutes. The CLI uses `IndicatifReporter` to show where
//! it is; library callers and tests use `NoopReporter`.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Trait for reporting progress of pipeline stages.
pub trait ProgressReporter: Send + Sync {
    /// Begin a new task with an optional total count.
    fn start(&self, task: &str, total: Option<u64>);

    /// Advance progress by the given amount.
    fn advance(&self, amount: u64);

    /// Mark the current task as finished.
    fn finish(&self);
}

/// No-op reporter for library callers that don't need progress output.
#[derive(Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn start(&self, _task: &str, _total: Option<u64>) {}
    fn advance(&self, _amount: u64) {}
    fn finish(&self) {}
}

/// Reporter backed by an `indicatif` progress bar on stderr.
#[derive(Debug)]
pub struct IndicatifReporter {
    bar: ProgressBar,
}

impl Default for IndicatifReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl IndicatifReporter {
    pub fn new() -> Self {
        Self {
            bar: ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr()),
        }
    }

    /// A reporter that draws nothing (used for `--quiet`).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }
}

impl ProgressReporter for IndicatifReporter {
    fn start(&self, task: &str, total: Option<u64>) {
        if let Some(total) = total {
            self.bar.set_length(total);
            let style = ProgressStyle::with_template(
                "{spinner:.green} {msg} [{bar:30.cyan/blue}] {pos}/{len} ({eta})",
            )
            .map_or_else(|_| ProgressStyle::default_bar(), |s| s.progress_chars("=> "));
            self.bar.set_style(style);
        } else {
            self.bar.set_length(0);
            let style = ProgressStyle::with_template("{spinner:.green} {msg} {pos} requests")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            self.bar.set_style(style);
        }
        self.bar.set_message(task.to_string());
        self.bar.reset();
    }

    fn advance(&self, amount: u64) {
        self.bar.inc(amount);
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
