use indicatif::{ProgressBar, ProgressStyle};
use sheetgate_check::BatchObserver;
use sheetgate_core::{BatchSummary, CheckResult};

use crate::ui;

pub struct Progress {
    bar: Option<ProgressBar>,
}

fn terminal_columns() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
}

fn bar_template() -> &'static str {
    match terminal_columns() {
        Some(cols) if cols >= 110 => "{bar:40.cyan/blue} {pos}/{len} {msg}",
        Some(cols) if cols >= 80 => "{wide_bar:.cyan/blue} {pos}/{len} {msg}",
        _ => "{wide_bar:.cyan/blue} {percent}% {msg}",
    }
}

impl Progress {
    /// A hidden progress indicator; `on_start` replaces it with a real bar
    /// when the terminal allows.
    #[must_use]
    pub const fn pending() -> Self {
        Self { bar: None }
    }

    #[must_use]
    pub fn bar(total: u64, message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }
}

/// Drives a progress bar from batch events.
pub struct CheckProgress {
    inner: std::sync::Mutex<Progress>,
}

impl CheckProgress {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: std::sync::Mutex::new(Progress::pending()),
        }
    }

    fn with<F: FnOnce(&mut Progress)>(&self, f: F) {
        if let Ok(mut progress) = self.inner.lock() {
            f(&mut progress);
        }
    }
}

impl Default for CheckProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchObserver for CheckProgress {
    fn on_start(&self, total: usize, workers: usize) {
        self.with(|progress| {
            *progress = Progress::bar(total as u64, &format!("checking with {workers} workers"));
        });
    }

    fn on_result(&self, result: &CheckResult) {
        self.with(|progress| {
            progress.set_message(&result.display_name);
            progress.inc(1);
        });
    }

    fn on_finish(&self, _summary: &BatchSummary) {
        self.with(|progress| progress.finish_clear());
    }
}
