//! WAV adapter for the makestereo engine.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`read_wav`], [`read_wav_info`] and [`write_wav`] on
//!   [`AudioBuffer`](makestereo_core::AudioBuffer)s
//! - **Engine adapter**: [`WavIo`], the [`AudioIo`](makestereo_core::AudioIo)
//!   implementation used by the command-line tool
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use makestereo_core::{Engine, Mode, NullReporter, CancelToken, RunRequest};
//! use makestereo_io::WavIo;
//!
//! let engine = Engine::new(WavIo::new());
//! let request = RunRequest::new(Mode::SplitToMono, vec!["mix.wav".into()], "out");
//! let summary = engine.run_blocking(request, &mut NullReporter, &CancelToken::new())?;
//! ```

mod wav;

pub use wav::{WavIo, read_wav, read_wav_info, write_wav};

/// Error types for WAV file operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested subtype or container is not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Decoded data could not form a valid buffer.
    #[error("Invalid audio data: {0}")]
    Buffer(#[from] makestereo_core::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for WAV operations.
pub type Result<T> = std::result::Result<T, Error>;
