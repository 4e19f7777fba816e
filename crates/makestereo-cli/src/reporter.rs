//! Terminal progress display for engine runs.

use indicatif::{ProgressBar, ProgressStyle};
use makestereo_core::{FailureRecord, Reporter};

/// Create the overall-progress bar, measured in percent.
pub fn progress_bar() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos:>3}% {msg}")?
            .progress_chars("##-"),
    );
    Ok(pb)
}

/// [`Reporter`] that drives an `indicatif` bar from the worker thread.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl Reporter for ProgressReporter {
    fn on_progress(&mut self, _current: u8, overall: u8) {
        self.bar.set_position(u64::from(overall));
    }

    fn on_status(&mut self, message: &str) {
        // Item headers stay in the scrollback; everything else is transient.
        if message.starts_with("===") {
            self.bar.println(message);
        }
        self.bar.set_message(message.to_string());
    }

    fn on_failed_files_changed(&mut self, failures: &[FailureRecord]) {
        if let Some(latest) = failures.last() {
            self.bar.println(format!("  failed: {latest}"));
        }
    }

    fn on_completed(&mut self) {
        self.bar.finish_with_message("done");
    }
}
