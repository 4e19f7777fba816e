//! Decoded audio held in memory.

use crate::{Error, Result};
use std::fmt;

/// Sample encoding of a container subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// Codec subtype carried from source to output unchanged.
///
/// The engine never interprets this value; only the audio adapter does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subtype {
    /// Sample encoding.
    pub encoding: Encoding,
    /// Bit depth per sample (e.g. 16, 24, 32).
    pub bits_per_sample: u16,
}

impl Subtype {
    /// 16-bit integer PCM.
    pub const PCM_16: Subtype = Subtype {
        encoding: Encoding::Pcm,
        bits_per_sample: 16,
    };

    /// 24-bit integer PCM.
    pub const PCM_24: Subtype = Subtype {
        encoding: Encoding::Pcm,
        bits_per_sample: 24,
    };

    /// 32-bit float.
    pub const FLOAT: Subtype = Subtype {
        encoding: Encoding::IeeeFloat,
        bits_per_sample: 32,
    };
}

impl Default for Subtype {
    fn default() -> Self {
        Subtype::PCM_16
    }
}

impl fmt::Display for Subtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.encoding, self.bits_per_sample) {
            (Encoding::IeeeFloat, 32) => write!(f, "FLOAT"),
            (Encoding::IeeeFloat, 64) => write!(f, "DOUBLE"),
            (Encoding::IeeeFloat, bits) => write!(f, "FLOAT_{bits}"),
            (Encoding::Pcm, 8) => write!(f, "PCM_U8"),
            (Encoding::Pcm, bits) => write!(f, "PCM_{bits}"),
        }
    }
}

/// File metadata obtained without decoding sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: usize,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Total number of frames (samples per channel).
    pub frames: usize,
    /// Container subtype.
    pub subtype: Subtype,
}

impl AudioInfo {
    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.frames as f64 / self.sample_rate as f64
    }
}

/// An immutable block of decoded audio.
///
/// Samples are stored interleaved (frame-major) at `f64` precision, so
/// `samples.len() == frames * channels` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: usize,
    sample_rate: u32,
    subtype: Subtype,
    samples: Vec<f64>,
}

impl AudioBuffer {
    /// Build a buffer from interleaved samples.
    ///
    /// Fails with [`Error::InvalidBuffer`] if `channels` or `sample_rate` is
    /// zero, or if the sample count is not a whole number of frames.
    pub fn from_interleaved(
        channels: usize,
        sample_rate: u32,
        subtype: Subtype,
        samples: Vec<f64>,
    ) -> Result<Self> {
        if channels == 0 {
            return Err(Error::InvalidBuffer("channel count must be at least 1".into()));
        }
        if sample_rate == 0 {
            return Err(Error::InvalidBuffer("sample rate must be positive".into()));
        }
        if samples.len() % channels != 0 {
            return Err(Error::InvalidBuffer(format!(
                "{} samples do not divide into {} channel(s)",
                samples.len(),
                channels
            )));
        }
        Ok(Self {
            channels,
            sample_rate,
            subtype,
            samples,
        })
    }

    /// Build a single-channel buffer.
    pub fn mono(sample_rate: u32, subtype: Subtype, samples: Vec<f64>) -> Result<Self> {
        Self::from_interleaved(1, sample_rate, subtype, samples)
    }

    /// Build a buffer from rows of `[frame][channel]`.
    ///
    /// Every row must have the same, non-zero length.
    pub fn from_frames(sample_rate: u32, subtype: Subtype, frames: &[Vec<f64>]) -> Result<Self> {
        let channels = frames.first().map_or(1, Vec::len);
        if let Some(bad) = frames.iter().position(|row| row.len() != channels) {
            return Err(Error::InvalidBuffer(format!(
                "frame {bad} has {} channel(s), expected {channels}",
                frames[bad].len()
            )));
        }
        let samples = frames.iter().flatten().copied().collect();
        Self::from_interleaved(channels, sample_rate, subtype, samples)
    }

    /// Number of channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of frames (samples per channel).
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Codec subtype inherited from the source file.
    pub fn subtype(&self) -> Subtype {
        self.subtype
    }

    /// Check if the buffer holds no frames.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Interleaved sample data.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Iterate over frames, each a slice of `channels` samples.
    pub fn frame_iter(&self) -> std::slice::ChunksExact<'_, f64> {
        self.samples.chunks_exact(self.channels)
    }

    /// Copy out one channel.
    ///
    /// Returns `None` if `index >= channels`.
    pub fn channel(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.channels).then(|| self.frame_iter().map(|frame| frame[index]).collect())
    }

    /// Metadata view of this buffer.
    pub fn info(&self) -> AudioInfo {
        AudioInfo {
            channels: self.channels,
            sample_rate: self.sample_rate,
            frames: self.frames(),
            subtype: self.subtype,
        }
    }

    /// Samples narrowed to `f32`, interleaved, ready for encoding.
    pub fn to_f32_interleaved(&self) -> Vec<f32> {
        self.samples.iter().map(|&s| s as f32).collect()
    }
}
