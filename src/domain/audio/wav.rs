//! WAV container encoder
//!
//! Wraps converted frame batches in an uncompressed WAV container. The only
//! lossy step is the float-to-16-bit quantization; the container itself is a
//! lossless wrap, so decoding the bytes reproduces the quantized samples
//! exactly.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};
use thiserror::Error;

use super::blob::{EncodedAudioBlob, PcmFormat};
use super::frame::AudioFrameBatch;

/// WAV encoding errors
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    #[error("no audio frames to encode")]
    Empty,

    #[error("WAV write failed: {0}")]
    Write(String),
}

/// Quantize one float sample to signed 16-bit.
/// Out-of-range input is clamped, not wrapped.
pub fn quantize(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}

/// Encode converted batches into a single WAV blob.
///
/// Batches are concatenated in order into one PCM stream; callers are
/// expected to have converted them to the declared format already.
pub fn encode(
    batches: &[AudioFrameBatch],
    format: PcmFormat,
) -> Result<EncodedAudioBlob, EncodeError> {
    let total_frames: usize = batches.iter().map(AudioFrameBatch::frames).sum();
    if total_frames == 0 {
        return Err(EncodeError::Empty);
    }

    let spec = WavSpec {
        channels: format.channels,
        sample_rate: format.sample_rate,
        bits_per_sample: format.bits_per_sample,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Cursor::new(Vec::new());
    {
        let mut writer =
            WavWriter::new(&mut buffer, spec).map_err(|e| EncodeError::Write(e.to_string()))?;

        for batch in batches {
            for &sample in batch.samples() {
                writer
                    .write_sample(quantize(sample))
                    .map_err(|e| EncodeError::Write(e.to_string()))?;
            }
        }

        writer
            .finalize()
            .map_err(|e| EncodeError::Write(e.to_string()))?;
    }

    Ok(EncodedAudioBlob::new(buffer.into_inner(), format))
}
