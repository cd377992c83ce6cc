//! StreamScribe - push-to-talk voice dictation
//!
//! Captures microphone audio while a hotkey is held, converts it to
//! 16 kHz mono WAV, streams it to an OpenAI-compatible transcription
//! endpoint, and types the transcript into the focused window as it
//! arrives.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Frame batches, sessions, format conversion, WAV encoding,
//!   the pipeline state machine, and configuration value objects
//! - **Application**: The recording coordinator and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (cpal, Whisper API, enigo,
//!   clipboard, notifications, audio cues)
//! - **CLI**: Argument parsing, the daemon loop, and control socket/signals

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
