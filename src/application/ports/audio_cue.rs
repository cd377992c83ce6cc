//! Audio cue port for playing sound feedback
//!
//! Provides audible feedback around the capture lifecycle.

use async_trait::async_trait;
use thiserror::Error;

/// Types of audio cues that can be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCueType {
    /// Ascending chime when capture starts
    CaptureStart,
    /// Descending chime when capture stops
    CaptureStop,
    /// Double-tap when a recording is discarded
    CaptureCancel,
    /// Low buzz when the pipeline hits an error
    Failure,
}

/// Errors that can occur during audio cue playback
#[derive(Error, Debug)]
pub enum AudioCueError {
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio device not available: {0}")]
    DeviceNotAvailable(String),
}

/// Port trait for audio cue playback
#[async_trait]
pub trait AudioCue: Send + Sync {
    /// Play an audio cue
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError>;
}

/// Blanket implementation for boxed cue types
#[async_trait]
impl AudioCue for Box<dyn AudioCue> {
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError> {
        self.as_ref().play(cue_type).await
    }
}
