//! Recording pipeline state machine

use std::fmt;
use thiserror::Error;

/// Pipeline states for one dictation cycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RecordingState {
    #[default]
    Idle,
    Recording,
    Processing,
    Transcribing,
    Completed,
    Error(String),
}

impl RecordingState {
    /// Short machine-readable name (socket status replies, logs)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Processing => "processing",
            Self::Transcribing => "transcribing",
            Self::Completed => "completed",
            Self::Error(_) => "error",
        }
    }

    /// Human-readable status line
    pub fn status_text(&self) -> String {
        match self {
            Self::Idle => "Ready".to_string(),
            Self::Recording => "Recording...".to_string(),
            Self::Processing => "Processing...".to_string(),
            Self::Transcribing => "Transcribing...".to_string(),
            Self::Completed => "Transcription completed".to_string(),
            Self::Error(reason) => format!("Error: {}", reason),
        }
    }
}

impl fmt::Display for RecordingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, Error)]
#[error("cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: RecordingState,
    pub action: &'static str,
}

/// State machine for the dictation pipeline.
///
/// Transitions:
///   IDLE -> RECORDING (begin_recording)
///   RECORDING -> PROCESSING (begin_processing)
///   RECORDING -> IDLE (abort_recording, cancel or empty capture)
///   PROCESSING -> TRANSCRIBING (begin_transcribing)
///   PROCESSING -> IDLE (finish_empty, nothing to transcribe)
///   TRANSCRIBING -> COMPLETED (complete)
///   any -> ERROR (fail)
///   COMPLETED | ERROR -> IDLE (reset, after the linger delay)
///
/// The coordinator is the only writer; every mutation goes through one of
/// the transition methods below.
#[derive(Debug, Default)]
pub struct RecordingStateMachine {
    state: RecordingState,
}

impl RecordingStateMachine {
    pub fn new() -> Self {
        Self {
            state: RecordingState::Idle,
        }
    }

    pub fn state(&self) -> &RecordingState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == RecordingState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == RecordingState::Recording
    }

    pub fn is_transcribing(&self) -> bool {
        self.state == RecordingState::Transcribing
    }

    /// Whether the state is terminal and waiting for the linger reset
    pub fn is_settled(&self) -> bool {
        matches!(
            self.state,
            RecordingState::Completed | RecordingState::Error(_)
        )
    }

    pub fn begin_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(RecordingState::Idle, RecordingState::Recording, "start recording")
    }

    pub fn begin_processing(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(
            RecordingState::Recording,
            RecordingState::Processing,
            "finalize recording",
        )
    }

    pub fn abort_recording(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(RecordingState::Recording, RecordingState::Idle, "abort recording")
    }

    pub fn begin_transcribing(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(
            RecordingState::Processing,
            RecordingState::Transcribing,
            "start transcribing",
        )
    }

    /// Nothing was captured; skip transcription entirely
    pub fn finish_empty(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(
            RecordingState::Processing,
            RecordingState::Idle,
            "discard empty recording",
        )
    }

    pub fn complete(&mut self) -> Result<(), InvalidStateTransition> {
        self.transition(
            RecordingState::Transcribing,
            RecordingState::Completed,
            "complete transcription",
        )
    }

    /// Record a failure. Allowed from any state: every engine and client
    /// failure maps here and recovery happens via `reset`.
    pub fn fail(&mut self, reason: impl Into<String>) {
        self.state = RecordingState::Error(reason.into());
    }

    /// Return to idle from a settled state
    pub fn reset(&mut self) -> Result<(), InvalidStateTransition> {
        if !self.is_settled() {
            return Err(InvalidStateTransition {
                current_state: self.state.clone(),
                action: "reset",
            });
        }
        self.state = RecordingState::Idle;
        Ok(())
    }

    fn transition(
        &mut self,
        from: RecordingState,
        to: RecordingState,
        action: &'static str,
    ) -> Result<(), InvalidStateTransition> {
        if self.state != from {
            return Err(InvalidStateTransition {
                current_state: self.state.clone(),
                action,
            });
        }
        self.state = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_machine_is_idle() {
        let machine = RecordingStateMachine::new();
        assert!(machine.is_idle());
        assert!(!machine.is_settled());
    }

    #[test]
    fn full_cycle_through_completed() {
        let mut machine = RecordingStateMachine::new();

        machine.begin_recording().unwrap();
        assert!(machine.is_recording());

        machine.begin_processing().unwrap();
        assert_eq!(machine.state(), &RecordingState::Processing);

        machine.begin_transcribing().unwrap();
        assert!(machine.is_transcribing());

        machine.complete().unwrap();
        assert!(machine.is_settled());

        machine.reset().unwrap();
        assert!(machine.is_idle());
    }

    #[test]
    fn empty_capture_returns_to_idle() {
        let mut machine = RecordingStateMachine::new();
        machine.begin_recording().unwrap();
        machine.begin_processing().unwrap();
        machine.finish_empty().unwrap();
        assert!(machine.is_idle());
    }

    #[test]
    fn abort_from_recording() {
        let mut machine = RecordingStateMachine::new();
        machine.begin_recording().unwrap();
        machine.abort_recording().unwrap();
        assert!(machine.is_idle());
    }

    #[test]
    fn begin_recording_twice_fails() {
        let mut machine = RecordingStateMachine::new();
        machine.begin_recording().unwrap();

        let err = machine.begin_recording().unwrap_err();
        assert_eq!(err.current_state, RecordingState::Recording);
        assert_eq!(err.action, "start recording");
    }

    #[test]
    fn fail_is_allowed_from_any_state() {
        let mut machine = RecordingStateMachine::new();
        machine.fail("device unplugged");
        assert_eq!(
            machine.state(),
            &RecordingState::Error("device unplugged".to_string())
        );

        machine.reset().unwrap();
        machine.begin_recording().unwrap();
        machine.fail("network down");
        assert!(machine.is_settled());
    }

    #[test]
    fn reset_requires_settled_state() {
        let mut machine = RecordingStateMachine::new();
        assert!(machine.reset().is_err());

        machine.begin_recording().unwrap();
        assert!(machine.reset().is_err());
    }

    #[test]
    fn complete_requires_transcribing() {
        let mut machine = RecordingStateMachine::new();
        let err = machine.complete().unwrap_err();
        assert_eq!(err.current_state, RecordingState::Idle);
    }

    #[test]
    fn state_display() {
        assert_eq!(RecordingState::Idle.to_string(), "idle");
        assert_eq!(RecordingState::Transcribing.to_string(), "transcribing");
        assert_eq!(RecordingState::Error("x".into()).to_string(), "error");
    }

    #[test]
    fn status_text_carries_reason() {
        let state = RecordingState::Error("bad key".to_string());
        assert_eq!(state.status_text(), "Error: bad key");
    }
}
