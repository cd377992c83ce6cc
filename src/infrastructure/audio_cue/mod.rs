//! Audio cue adapters

pub mod noop;
pub mod rodio;

pub use self::rodio::RodioAudioCue;
pub use noop::NoOpAudioCue;
