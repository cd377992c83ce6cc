//! Recording domain: pipeline state machine

pub mod state;

pub use state::{InvalidStateTransition, RecordingState, RecordingStateMachine};
