//! Observer interface for run progress.
//!
//! Every callback fires on the run's worker thread, in item order.
//! Callers that render on another thread forward events themselves, for
//! example through [`ChannelReporter`].

use crate::FailureRecord;
use crossbeam_channel::{Receiver, Sender, unbounded};

/// Receives events from a running job.
pub trait Reporter: Send {
    /// An item finished. Both values are percentages in `0..=100`.
    fn on_progress(&mut self, current: u8, overall: u8) {
        let _ = (current, overall);
    }

    /// Free-form status text.
    fn on_status(&mut self, message: &str) {
        let _ = message;
    }

    /// The failure list grew. `failures` is the whole list so far.
    fn on_failed_files_changed(&mut self, failures: &[FailureRecord]) {
        let _ = failures;
    }

    /// The run finished without being cancelled. Fires at most once.
    fn on_completed(&mut self) {}
}

/// Reporter that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullReporter;

impl Reporter for NullReporter {}

/// A reporter callback captured as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEvent {
    /// See [`Reporter::on_progress`].
    Progress {
        /// Current item percentage.
        current: u8,
        /// Whole run percentage.
        overall: u8,
    },
    /// See [`Reporter::on_status`].
    Status(String),
    /// See [`Reporter::on_failed_files_changed`].
    FailedFilesChanged(Vec<FailureRecord>),
    /// See [`Reporter::on_completed`].
    Completed,
}

/// Forwards every callback as a [`JobEvent`] over a channel.
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    tx: Sender<JobEvent>,
}

impl ChannelReporter {
    /// Create a reporter and the receiving end of its channel.
    pub fn channel() -> (Self, Receiver<JobEvent>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }

    fn send(&self, event: JobEvent) {
        // The receiver may be gone if the caller stopped listening.
        let _ = self.tx.send(event);
    }
}

impl Reporter for ChannelReporter {
    fn on_progress(&mut self, current: u8, overall: u8) {
        self.send(JobEvent::Progress { current, overall });
    }

    fn on_status(&mut self, message: &str) {
        self.send(JobEvent::Status(message.to_string()));
    }

    fn on_failed_files_changed(&mut self, failures: &[FailureRecord]) {
        self.send(JobEvent::FailedFilesChanged(failures.to_vec()));
    }

    fn on_completed(&mut self) {
        self.send(JobEvent::Completed);
    }
}

impl<R: Reporter + ?Sized> Reporter for Box<R> {
    fn on_progress(&mut self, current: u8, overall: u8) {
        (**self).on_progress(current, overall);
    }

    fn on_status(&mut self, message: &str) {
        (**self).on_status(message);
    }

    fn on_failed_files_changed(&mut self, failures: &[FailureRecord]) {
        (**self).on_failed_files_changed(failures);
    }

    fn on_completed(&mut self) {
        (**self).on_completed();
    }
}
