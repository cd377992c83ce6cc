//! Transcription service adapters

pub mod sse;
pub mod whisper;

pub use sse::StreamState;
pub use whisper::WhisperTranscriber;
