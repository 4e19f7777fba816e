//! Stereo <-> dual-mono sample transforms.

use crate::{AudioBuffer, Error, Result};

/// Split a stereo buffer into left and right mono buffers.
///
/// Both halves inherit the source sample rate and subtype.
///
/// # Example
/// ```
/// use makestereo_core::{AudioBuffer, Subtype, split_to_mono};
///
/// let stereo = AudioBuffer::from_interleaved(2, 48000, Subtype::FLOAT, vec![0.1, 0.9, 0.2, 0.8])?;
/// let (left, right) = split_to_mono(&stereo)?;
/// assert_eq!(left.samples(), &[0.1, 0.2]);
/// assert_eq!(right.samples(), &[0.9, 0.8]);
/// # Ok::<(), makestereo_core::Error>(())
/// ```
pub fn split_to_mono(buffer: &AudioBuffer) -> Result<(AudioBuffer, AudioBuffer)> {
    if buffer.channels() != 2 {
        return Err(Error::NotStereo {
            channels: buffer.channels(),
        });
    }

    let frames = buffer.frames();
    let mut left = Vec::with_capacity(frames);
    let mut right = Vec::with_capacity(frames);
    for frame in buffer.frame_iter() {
        left.push(frame[0]);
        right.push(frame[1]);
    }

    Ok((
        AudioBuffer::mono(buffer.sample_rate(), buffer.subtype(), left)?,
        AudioBuffer::mono(buffer.sample_rate(), buffer.subtype(), right)?,
    ))
}

/// Interleave two mono buffers into one stereo buffer.
///
/// Frame counts must match exactly; nothing is truncated or padded.
/// The result carries the left input's subtype.
pub fn merge_to_stereo(left: &AudioBuffer, right: &AudioBuffer) -> Result<AudioBuffer> {
    for input in [left, right] {
        if input.channels() != 1 {
            return Err(Error::NotMono {
                channels: input.channels(),
            });
        }
    }
    if left.sample_rate() != right.sample_rate() {
        return Err(Error::SampleRateMismatch {
            left: left.sample_rate(),
            right: right.sample_rate(),
        });
    }
    if left.frames() != right.frames() {
        return Err(Error::LengthMismatch {
            left: left.frames(),
            right: right.frames(),
        });
    }

    let mut interleaved = Vec::with_capacity(left.frames() * 2);
    for (l, r) in left.samples().iter().zip(right.samples()) {
        interleaved.push(*l);
        interleaved.push(*r);
    }

    AudioBuffer::from_interleaved(2, left.sample_rate(), left.subtype(), interleaved)
}
