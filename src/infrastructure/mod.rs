//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with the audio device, the transcription API, and the
//! desktop environment.

pub mod audio_cue;
pub mod capture;
pub mod clipboard;
pub mod config;
pub mod notification;
pub mod text_sink;
pub mod transcription;

// Re-export adapters
pub use audio_cue::{NoOpAudioCue, RodioAudioCue};
pub use capture::CpalCaptureEngine;
pub use clipboard::ArboardClipboard;
pub use config::XdgConfigStore;
pub use notification::NotifyRustNotifier;
pub use text_sink::{EnigoTextSink, NoOpTextSink};
pub use transcription::WhisperTranscriber;
