//! Rodio-based audio cue adapter
//!
//! Synthesizes short tones for capture lifecycle feedback.

use std::time::Duration;

use async_trait::async_trait;
use rodio::source::{SineWave, Source};
use rodio::{OutputStream, Sink};

use crate::application::ports::{AudioCue, AudioCueError, AudioCueType};

/// Audio cue implementation using rodio
pub struct RodioAudioCue;

impl RodioAudioCue {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RodioAudioCue {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AudioCue for RodioAudioCue {
    async fn play(&self, cue_type: AudioCueType) -> Result<(), AudioCueError> {
        // Playback blocks until the cue finishes; keep it off the runtime
        tokio::task::spawn_blocking(move || play_cue_sync(cue_type))
            .await
            .map_err(|e| AudioCueError::PlaybackFailed(format!("Task join error: {}", e)))?
    }
}

/// Faded sine burst so cues do not click
fn tone(freq: f32, duration_ms: u64) -> impl Source<Item = f32> + Send {
    const AMPLITUDE: f32 = 0.25;
    let fade = Duration::from_millis((duration_ms / 4).min(25));
    SineWave::new(freq)
        .take_duration(Duration::from_millis(duration_ms))
        .fade_in(fade)
        .amplify(AMPLITUDE)
}

fn play_cue_sync(cue_type: AudioCueType) -> Result<(), AudioCueError> {
    let (_stream, handle) = OutputStream::try_default()
        .map_err(|e| AudioCueError::DeviceNotAvailable(e.to_string()))?;
    let sink = Sink::try_new(&handle).map_err(|e| AudioCueError::PlaybackFailed(e.to_string()))?;

    match cue_type {
        AudioCueType::CaptureStart => {
            // Rising fourth: A4 -> D5
            sink.append(tone(440.0, 90));
            sink.append(tone(587.3, 110));
        }
        AudioCueType::CaptureStop => {
            // Falling fourth: D5 -> A4
            sink.append(tone(587.3, 90));
            sink.append(tone(440.0, 110));
        }
        AudioCueType::CaptureCancel => {
            // Two short taps on E4
            sink.append(tone(329.6, 55));
            sink.append(
                rodio::source::Zero::<f32>::new(1, 44_100)
                    .take_duration(Duration::from_millis(45)),
            );
            sink.append(tone(329.6, 55));
        }
        AudioCueType::Failure => {
            // Low buzz
            sink.append(tone(196.0, 220));
        }
    }

    sink.sleep_until_end();
    Ok(())
}
