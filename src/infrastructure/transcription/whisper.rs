//! OpenAI-compatible transcription API adapter

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::application::ports::{Transcriber, TranscriptionError, TranscriptionEvent};
use crate::domain::audio::EncodedAudioBlob;
use crate::domain::config::ServiceConfig;

use super::sse::StreamState;

/// Generous per-request ceiling; slow responses are not abandoned early.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Non-streaming success body
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: Option<String>,
}

/// Transcription client for `/audio/transcriptions` endpoints
pub struct WhisperTranscriber {
    config: ServiceConfig,
    client: reqwest::Client,
}

impl WhisperTranscriber {
    pub fn new(config: ServiceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Build the multipart request body
    fn build_form(&self, audio: &EncodedAudioBlob) -> Result<Form, TranscriptionError> {
        let file_part = Part::bytes(audio.bytes().to_vec())
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscriptionError::Transport(e.to_string()))?;

        let mut form = Form::new()
            .part("file", file_part)
            .text("model", self.config.model.clone())
            .text("response_format", "json")
            .text("temperature", self.config.temperature.to_string());

        if let Some(language) = &self.config.language {
            form = form.text("language", language.clone());
        }
        if let Some(prompt) = &self.config.prompt {
            form = form.text("prompt", prompt.clone());
        }

        Ok(form)
    }

    async fn send_request(
        &self,
        audio: &EncodedAudioBlob,
    ) -> Result<reqwest::Response, TranscriptionError> {
        self.config.validate()?;

        let form = self.build_form(audio)?;

        self.client
            .post(self.config.endpoint())
            .bearer_auth(&self.config.api_key)
            .multipart(form)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(|e| TranscriptionError::Transport(e.to_string()))
    }

    /// Consume one streaming request to its terminal event.
    ///
    /// Partials are forwarded through `events` as they are parsed; the
    /// returned value is the single terminal event for the request.
    async fn stream_to_completion(
        &self,
        audio: &EncodedAudioBlob,
        events: &mpsc::Sender<TranscriptionEvent>,
    ) -> TranscriptionEvent {
        let response = match self.send_request(audio).await {
            Ok(response) => response,
            Err(e) => return TranscriptionEvent::Failed(e),
        };

        let status = response.status();
        let mut state = StreamState::new();
        let mut body: Vec<u8> = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => return TranscriptionEvent::Failed(TranscriptionError::Transport(e.to_string())),
            };

            body.extend_from_slice(&chunk);

            if status.is_success() {
                for fragment in state.push(&chunk) {
                    if events
                        .send(TranscriptionEvent::Partial(fragment))
                        .await
                        .is_err()
                    {
                        // Listener went away; nobody will see a terminal
                        // event either, so stop consuming the stream.
                        return TranscriptionEvent::Failed(TranscriptionError::Transport(
                            "event listener dropped".to_string(),
                        ));
                    }
                }
                if state.is_done() {
                    break;
                }
            }
        }

        if !status.is_success() {
            return TranscriptionEvent::Failed(TranscriptionError::Api {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        if state.is_done() || state.saw_text() {
            return TranscriptionEvent::Completed(state.into_transcript());
        }

        // No event stream seen at all; treat the body as one non-streaming
        // JSON response.
        match serde_json::from_slice::<TranscriptionResponse>(&body) {
            Ok(TranscriptionResponse { text: Some(text) }) => TranscriptionEvent::Completed(text),
            _ => TranscriptionEvent::Failed(TranscriptionError::ResponseMalformed),
        }
    }
}

#[async_trait]
impl Transcriber for WhisperTranscriber {
    async fn transcribe(&self, audio: &EncodedAudioBlob) -> Result<String, TranscriptionError> {
        let response = self.send_request(audio).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranscriptionError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|_| TranscriptionError::ResponseMalformed)?;

        parsed.text.ok_or(TranscriptionError::ResponseMalformed)
    }

    async fn transcribe_streaming(
        &self,
        audio: &EncodedAudioBlob,
        events: mpsc::Sender<TranscriptionEvent>,
    ) {
        let terminal = self.stream_to_completion(audio, &events).await;
        let _ = events.send(terminal).await;
    }
}
