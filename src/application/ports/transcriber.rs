//! Transcription port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use crate::domain::audio::EncodedAudioBlob;
use crate::domain::error::MissingApiKey;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("{0}")]
    ConfigInvalid(#[from] MissingApiKey),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("response did not contain a transcript")]
    ResponseMalformed,
}

/// Events produced while consuming one transcription request.
///
/// Zero or more `Partial` events are followed by exactly one terminal event
/// (`Completed` or `Failed`); nothing is emitted after the terminal event.
/// Each `Partial` carries only the newly extracted fragment, never
/// previously delivered text.
#[derive(Debug, Clone)]
pub enum TranscriptionEvent {
    Partial(String),
    Completed(String),
    Failed(TranscriptionError),
}

impl TranscriptionEvent {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Partial(_))
    }
}

/// Port for remote speech-to-text transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe a blob and wait for the single final transcript.
    async fn transcribe(&self, audio: &EncodedAudioBlob) -> Result<String, TranscriptionError>;

    /// Transcribe a blob, delivering events incrementally as response bytes
    /// arrive. Exactly one terminal event is sent per call; delivery stops
    /// early if the receiver is dropped.
    async fn transcribe_streaming(
        &self,
        audio: &EncodedAudioBlob,
        events: mpsc::Sender<TranscriptionEvent>,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_is_not_terminal() {
        assert!(!TranscriptionEvent::Partial("hi".into()).is_terminal());
        assert!(TranscriptionEvent::Completed("hi".into()).is_terminal());
        assert!(TranscriptionEvent::Failed(TranscriptionError::ResponseMalformed).is_terminal());
    }

    #[test]
    fn config_error_converts_from_missing_key() {
        let err: TranscriptionError = MissingApiKey.into();
        assert!(matches!(err, TranscriptionError::ConfigInvalid(_)));
    }

    #[test]
    fn api_error_display_carries_status_and_body() {
        let err = TranscriptionError::Api {
            status: 401,
            body: "{\"error\":\"bad key\"}".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("401"));
        assert!(msg.contains("bad key"));
    }
}
