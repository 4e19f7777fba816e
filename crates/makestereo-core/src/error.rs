//! Error types for the split/merge engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the engine, the transforms, and the audio adapter.
///
/// Variants only carry owned strings and numbers so they can be cloned into
/// [`FailureRecord`](crate::FailureRecord) reasons and run summaries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Reading metadata for a file failed.
    #[error("could not probe '{path}': {reason}")]
    Probe {
        /// File that was probed.
        path: PathBuf,
        /// Adapter-specific description.
        reason: String,
    },

    /// Decoding a file failed.
    #[error("could not read '{path}': {reason}")]
    Read {
        /// File that was read.
        path: PathBuf,
        /// Adapter-specific description.
        reason: String,
    },

    /// Encoding or persisting a file failed.
    #[error("could not write '{path}': {reason}")]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Adapter-specific description.
        reason: String,
    },

    /// A stereo input was required.
    #[error("not a stereo file ({channels} channel(s))")]
    NotStereo {
        /// Channel count actually found.
        channels: usize,
    },

    /// A mono input was required.
    #[error("not a mono file ({channels} channel(s))")]
    NotMono {
        /// Channel count actually found.
        channels: usize,
    },

    /// Left and right inputs disagree on sample rate.
    #[error("sample rate mismatch: {left} Hz vs {right} Hz")]
    SampleRateMismatch {
        /// Left input rate in Hz.
        left: u32,
        /// Right input rate in Hz.
        right: u32,
    },

    /// Left and right inputs disagree on length.
    #[error("length mismatch: {left} frames vs {right} frames")]
    LengthMismatch {
        /// Left input frame count.
        left: usize,
        /// Right input frame count.
        right: usize,
    },

    /// The adapter cannot write the requested container.
    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Merge analysis found nothing to pair.
    #[error("no valid mono pairs found")]
    NoValidPairs,

    /// Split analysis found no stereo input.
    #[error("no valid stereo files found")]
    NoValidFiles,

    /// A run is already active on this engine.
    #[error("a run is already in progress")]
    AlreadyRunning,

    /// Sample data does not match its declared shape.
    #[error("invalid audio buffer: {0}")]
    InvalidBuffer(String),

    /// The worker thread could not be started.
    #[error("could not start worker thread: {0}")]
    WorkerSpawn(String),

    /// The worker thread panicked before producing a summary.
    #[error("worker thread panicked")]
    WorkerPanicked,
}

impl Error {
    /// Create a probe error.
    pub fn probe(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Probe {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a read error.
    pub fn read(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Read {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a write error.
    pub fn write(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Error::Write {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Whether this error ends a run before any item is processed.
    pub fn is_run_level(&self) -> bool {
        matches!(
            self,
            Error::NoValidPairs | Error::NoValidFiles | Error::UnsupportedFormat(_)
        )
    }
}

/// Convenience result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
