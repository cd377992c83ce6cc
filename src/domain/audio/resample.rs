//! Sample rate conversion and channel downmix
//!
//! Converts captured batches to the transcription format (mono, 16 kHz).
//! Conversion is deterministic: the same input batch always produces the
//! same output samples, and a batch already at the target rate is returned
//! unchanged.

use thiserror::Error;

use super::frame::AudioFrameBatch;

/// Sample rate expected by the transcription service
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// A batch that cannot be converted to the target format.
///
/// Conversion failures are per-batch and recoverable: the capture engine
/// drops the offending batch and keeps the rest of the session.
#[derive(Debug, Clone, Error)]
#[error("cannot convert {channels}ch audio at {sample_rate} Hz")]
pub struct ConversionFailed {
    pub channels: u16,
    pub sample_rate: u32,
}

/// Average interleaved frames down to a single channel.
/// Every channel contributes with equal weight.
fn downmix_to_mono(batch: &AudioFrameBatch) -> Vec<f32> {
    let channels = batch.channels() as usize;
    if channels == 1 {
        return batch.samples().to_vec();
    }

    batch
        .samples()
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect()
}

/// Convert a batch to `target_rate` mono.
///
/// Output frame count is `round(input_frames * target_rate / input_rate)`.
/// Resampling uses linear interpolation between neighbouring input frames;
/// the last frame is held when interpolation reads past the input.
pub fn resample(batch: &AudioFrameBatch, target_rate: u32) -> Result<AudioFrameBatch, ConversionFailed> {
    if batch.channels() == 0 || batch.sample_rate() == 0 || target_rate == 0 {
        return Err(ConversionFailed {
            channels: batch.channels(),
            sample_rate: batch.sample_rate(),
        });
    }

    let mono = downmix_to_mono(batch);
    let source_rate = batch.sample_rate();

    if source_rate == target_rate {
        return Ok(AudioFrameBatch::new(mono, 1, target_rate));
    }

    let input_len = mono.len();
    let output_len =
        (input_len as f64 * target_rate as f64 / source_rate as f64).round() as usize;

    if input_len == 0 || output_len == 0 {
        return Ok(AudioFrameBatch::new(Vec::new(), 1, target_rate));
    }

    let step = source_rate as f64 / target_rate as f64;
    let mut output = Vec::with_capacity(output_len);

    for i in 0..output_len {
        let position = i as f64 * step;
        let index = position as usize;
        let fraction = (position - index as f64) as f32;

        let current = mono[index.min(input_len - 1)];
        let next = mono[(index + 1).min(input_len - 1)];
        output.push(current + (next - current) * fraction);
    }

    Ok(AudioFrameBatch::new(output, 1, target_rate))
}
