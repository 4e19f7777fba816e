//! Stereo/dual-mono conversion engine.
//!
//! This crate provides:
//!
//! - **Transforms**: [`split_to_mono`] and [`merge_to_stereo`] on decoded [`AudioBuffer`]s
//! - **Pairing**: [`pairing::resolve`] groups mono files into left/right pairs by name
//! - **Naming**: [`PathAllocator`] hands out output paths that never overwrite
//! - **Orchestration**: [`Engine`] runs a whole job on a worker thread and
//!   reports through a [`Reporter`]
//!
//! Decoding and encoding are delegated to an [`AudioIo`] adapter; see the
//! `makestereo-io` crate for the WAV implementation.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use makestereo_core::{ChannelReporter, Engine, Mode, RunRequest};
//! use makestereo_io::WavIo;
//!
//! let engine = Engine::new(WavIo::new());
//! let request = RunRequest::new(Mode::MergeToStereo, files, "out/");
//! let (reporter, events) = ChannelReporter::channel();
//! let handle = engine.start(request, reporter)?;
//! for event in events {
//!     println!("{event:?}");
//! }
//! let summary = handle.join()?;
//! ```

mod allocator;
mod buffer;
mod engine;
mod error;
mod io;
mod job;
mod reporter;
mod transform;

/// Pre-run inspection of input lists.
pub mod analysis;

/// Channel markers in file names.
pub mod markers;

/// Left/right pairing of mono files.
pub mod pairing;

pub use allocator::PathAllocator;
pub use analysis::{Analysis, Readiness, analyze};
pub use buffer::{AudioBuffer, AudioInfo, Encoding, Subtype};
pub use engine::{CancelToken, Engine, RunHandle};
pub use error::{Error, Result};
pub use io::AudioIo;
pub use job::{
    FailureRecord, ItemSource, ItemState, JobItem, Mode, OutputFormat, RunRequest, RunState,
    RunSummary,
};
pub use markers::{STEREO_SUFFIX, Side};
pub use pairing::{FileAnnotation, FileStatus, PairCandidate, PairResolution};
pub use reporter::{ChannelReporter, JobEvent, NullReporter, Reporter};
pub use transform::{merge_to_stereo, split_to_mono};
