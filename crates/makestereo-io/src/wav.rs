//! WAV file reading and writing.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use makestereo_core::{AudioBuffer, AudioInfo, AudioIo, Encoding, Subtype};
use std::path::Path;

/// Map a hound spec onto the engine's subtype.
fn subtype_of(spec: &hound::WavSpec) -> Subtype {
    let encoding = match spec.sample_format {
        SampleFormat::Float => Encoding::IeeeFloat,
        SampleFormat::Int => Encoding::Pcm,
    };
    Subtype {
        encoding,
        bits_per_sample: spec.bits_per_sample,
    }
}

/// Build a hound spec for writing, rejecting subtypes hound cannot encode.
fn hound_spec(channels: usize, sample_rate: u32, subtype: Subtype) -> Result<hound::WavSpec> {
    let sample_format = match (subtype.encoding, subtype.bits_per_sample) {
        (Encoding::IeeeFloat, 32) => SampleFormat::Float,
        (Encoding::Pcm, 8 | 16 | 24 | 32) => SampleFormat::Int,
        _ => return Err(Error::UnsupportedFormat(subtype.to_string())),
    };
    let channels = u16::try_from(channels)
        .map_err(|_| Error::UnsupportedFormat(format!("{channels} channels")))?;
    Ok(hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: subtype.bits_per_sample,
        sample_format,
    })
}

/// Full-scale value for integer PCM at `bits`.
fn full_scale(bits: u16) -> f64 {
    (1i64 << (bits - 1)) as f64
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<AudioInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();

    Ok(AudioInfo {
        channels: spec.channels as usize,
        sample_rate: spec.sample_rate,
        frames: reader.duration() as usize,
        subtype: subtype_of(&spec),
    })
}

/// Read a whole WAV file, keeping every channel.
///
/// Integer PCM is scaled into `[-1.0, 1.0)`. The source subtype is kept on
/// the returned buffer so outputs can be written the same way.
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let subtype = subtype_of(&spec);

    let samples: Vec<f64> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = full_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    Ok(AudioBuffer::from_interleaved(
        spec.channels as usize,
        spec.sample_rate,
        subtype,
        samples,
    )?)
}

/// Write a buffer to a WAV file with the given subtype.
///
/// Samples are narrowed to 32-bit float before encoding. Integer subtypes
/// are scaled and clamped to their range. The parent directory is created
/// if it does not exist.
pub fn write_wav<P: AsRef<Path>>(path: P, buffer: &AudioBuffer, subtype: Subtype) -> Result<()> {
    let path = path.as_ref();
    let spec = hound_spec(buffer.channels(), buffer.sample_rate(), subtype)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = WavWriter::create(path, spec)?;
    let samples = buffer.to_f32_interleaved();

    match spec.sample_format {
        SampleFormat::Float => {
            for sample in samples {
                writer.write_sample(sample)?;
            }
        }
        SampleFormat::Int => {
            let max_val = full_scale(spec.bits_per_sample);
            for sample in samples {
                let int_sample = (f64::from(sample) * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

/// [`AudioIo`] backed by [`hound`]. Reads and writes `.wav` only.
#[derive(Debug, Default, Clone, Copy)]
pub struct WavIo;

impl WavIo {
    /// Create the adapter.
    pub fn new() -> Self {
        Self
    }
}

fn is_wav(extension: &str) -> bool {
    extension.eq_ignore_ascii_case("wav")
}

impl AudioIo for WavIo {
    fn probe(&self, path: &Path) -> makestereo_core::Result<AudioInfo> {
        read_wav_info(path).map_err(|e| makestereo_core::Error::probe(path, e))
    }

    fn read(&self, path: &Path) -> makestereo_core::Result<AudioBuffer> {
        read_wav(path).map_err(|e| makestereo_core::Error::read(path, e))
    }

    fn write(
        &self,
        path: &Path,
        buffer: &AudioBuffer,
        subtype: Subtype,
    ) -> makestereo_core::Result<()> {
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_wav(&extension) {
            return Err(makestereo_core::Error::UnsupportedFormat(extension));
        }
        write_wav(path, buffer, subtype).map_err(|e| {
            tracing::debug!(path = %path.display(), error = %e, "WAV write failed");
            makestereo_core::Error::write(path, e)
        })
    }

    fn can_write(&self, extension: &str) -> bool {
        is_wav(extension)
    }
}
