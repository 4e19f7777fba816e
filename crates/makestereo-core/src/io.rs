//! The audio adapter seam.
//!
//! The engine never touches codecs. Everything that decodes or encodes a
//! container goes through an [`AudioIo`] implementation, which is shared
//! with the worker thread and must therefore be `Send + Sync`.

use crate::{AudioBuffer, AudioInfo, Result, Subtype};
use std::path::Path;

/// Container read/write capability.
pub trait AudioIo: Send + Sync {
    /// Read metadata only.
    ///
    /// Errors should be [`Error::Probe`](crate::Error::Probe).
    fn probe(&self, path: &Path) -> Result<AudioInfo>;

    /// Decode a whole file.
    ///
    /// Errors should be [`Error::Read`](crate::Error::Read).
    fn read(&self, path: &Path) -> Result<AudioBuffer>;

    /// Encode `buffer` to `path` using `subtype`.
    ///
    /// Errors should be [`Error::Write`](crate::Error::Write) or
    /// [`Error::UnsupportedFormat`](crate::Error::UnsupportedFormat).
    fn write(&self, path: &Path, buffer: &AudioBuffer, subtype: Subtype) -> Result<()>;

    /// Whether files with this extension (no leading dot, any case) can be
    /// written.
    fn can_write(&self, extension: &str) -> bool;
}

impl<T: AudioIo + ?Sized> AudioIo for std::sync::Arc<T> {
    fn probe(&self, path: &Path) -> Result<AudioInfo> {
        (**self).probe(path)
    }

    fn read(&self, path: &Path) -> Result<AudioBuffer> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, buffer: &AudioBuffer, subtype: Subtype) -> Result<()> {
        (**self).write(path, buffer, subtype)
    }

    fn can_write(&self, extension: &str) -> bool {
        (**self).can_write(extension)
    }
}
