//! Captured audio frame batch value object

/// One block of interleaved float samples delivered by the input device.
///
/// A batch is tagged with the channel count and sample rate it was captured
/// at. Batches are immutable once created; a recording session appends them
/// in capture order and never reorders or drops an accepted batch.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFrameBatch {
    samples: Vec<f32>,
    channels: u16,
    sample_rate: u32,
}

impl AudioFrameBatch {
    /// Create a batch from interleaved samples
    pub fn new(samples: Vec<f32>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples,
            channels,
            sample_rate,
        }
    }

    /// Copy a batch out of a hardware-owned slice.
    /// The device callback must never hold onto driver memory, so this is
    /// the only constructor the capture path uses.
    pub fn copy_from(samples: &[f32], channels: u16, sample_rate: u32) -> Self {
        Self {
            samples: samples.to_vec(),
            channels,
            sample_rate,
        }
    }

    /// Interleaved samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consume and return the samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Channel count
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    /// Whether the batch holds no frames
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Peak absolute amplitude, used for input metering
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |max, s| max.max(s.abs()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_counts_per_channel() {
        let batch = AudioFrameBatch::new(vec![0.0; 8], 2, 48_000);
        assert_eq!(batch.frames(), 4);
        assert_eq!(batch.channels(), 2);
        assert_eq!(batch.sample_rate(), 48_000);
    }

    #[test]
    fn copy_from_owns_its_samples() {
        let source = [0.1f32, 0.2, 0.3];
        let batch = AudioFrameBatch::copy_from(&source, 1, 16_000);
        assert_eq!(batch.samples(), &source);
    }

    #[test]
    fn empty_batch() {
        let batch = AudioFrameBatch::new(Vec::new(), 1, 16_000);
        assert!(batch.is_empty());
        assert_eq!(batch.frames(), 0);
    }

    #[test]
    fn zero_channels_has_no_frames() {
        let batch = AudioFrameBatch::new(vec![0.0; 4], 0, 16_000);
        assert_eq!(batch.frames(), 0);
    }

    #[test]
    fn peak_is_max_absolute_sample() {
        let batch = AudioFrameBatch::new(vec![0.1, -0.7, 0.3], 1, 16_000);
        assert!((batch.peak() - 0.7).abs() < f32::EPSILON);
    }
}
