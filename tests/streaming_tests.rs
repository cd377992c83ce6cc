//! Streaming transcription client integration tests
//!
//! Exercises the HTTP contract against a local mock server: multipart
//! request shape, endpoint derivation, SSE event delivery, error capture,
//! and the non-streaming fallback.

use tokio::sync::mpsc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use streamscribe::application::ports::{Transcriber, TranscriptionError, TranscriptionEvent};
use streamscribe::domain::audio::{EncodedAudioBlob, PcmFormat};
use streamscribe::domain::config::ServiceConfig;
use streamscribe::infrastructure::WhisperTranscriber;

fn test_blob() -> EncodedAudioBlob {
    EncodedAudioBlob::new(vec![0u8; 128], PcmFormat::speech())
}

fn config_for(server: &MockServer) -> ServiceConfig {
    ServiceConfig {
        base_url: server.uri(),
        api_key: "sk-test".to_string(),
        model: "whisper-1".to_string(),
        language: Some("en".to_string()),
        prompt: None,
        temperature: 0.2,
    }
}

/// Run one streaming request and collect every delivered event
async fn collect_events(transcriber: &WhisperTranscriber) -> Vec<TranscriptionEvent> {
    let (tx, mut rx) = mpsc::channel(32);
    transcriber.transcribe_streaming(&test_blob(), tx).await;

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    events
}

#[tokio::test]
async fn sse_stream_yields_partials_then_completion() {
    let server = MockServer::start().await;

    let body = "data: {\"text\":\"He\"}\n\ndata: {\"text\":\"llo\"}\n\ndata: [DONE]\n";
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .expect(1)
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let events = collect_events(&transcriber).await;

    assert_eq!(events.len(), 3);
    assert!(matches!(&events[0], TranscriptionEvent::Partial(t) if t == "He"));
    assert!(matches!(&events[1], TranscriptionEvent::Partial(t) if t == "llo"));
    assert!(matches!(&events[2], TranscriptionEvent::Completed(t) if t == "Hello"));
}

#[tokio::test]
async fn stream_without_sentinel_completes_on_transport_end() {
    let server = MockServer::start().await;

    let body = "data: {\"text\":\"no \"}\n\ndata: {\"text\":\"sentinel\"}\n";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let events = collect_events(&transcriber).await;

    let last = events.last().unwrap();
    assert!(matches!(last, TranscriptionEvent::Completed(t) if t == "no sentinel"));
}

#[tokio::test]
async fn http_error_captures_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(401).set_body_raw("{\"error\":\"bad key\"}", "application/json"),
        )
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let events = collect_events(&transcriber).await;

    // A failed request produces exactly one event and no partials
    assert_eq!(events.len(), 1);
    match &events[0] {
        TranscriptionEvent::Failed(TranscriptionError::Api { status, body }) => {
            assert_eq!(*status, 401);
            assert_eq!(body, "{\"error\":\"bad key\"}");
        }
        other => panic!("expected Api failure, got {:?}", other),
    }
}

#[tokio::test]
async fn non_streaming_json_falls_back_to_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"text\":\"Hola\"}", "application/json"),
        )
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let events = collect_events(&transcriber).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], TranscriptionEvent::Completed(t) if t == "Hola"));
}

#[tokio::test]
async fn unparseable_success_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>hi</html>", "text/html"))
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let events = collect_events(&transcriber).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        TranscriptionEvent::Failed(TranscriptionError::ResponseMalformed)
    ));
}

#[tokio::test]
async fn trailing_data_after_sentinel_is_ignored() {
    let server = MockServer::start().await;

    let body = "data: {\"text\":\"keep\"}\n\ndata: [DONE]\n\ndata: {\"text\":\"drop\"}\n";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let events = collect_events(&transcriber).await;

    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], TranscriptionEvent::Partial(t) if t == "keep"));
    assert!(matches!(&events[1], TranscriptionEvent::Completed(t) if t == "keep"));
}

#[tokio::test]
async fn chat_delta_events_are_accumulated() {
    let server = MockServer::start().await;

    let body = "data: {\"choices\":[{\"delta\":{\"content\":\"one \"}}]}\n\n\
                data: {\"choices\":[{\"delta\":{\"content\":\"two\"}}]}\n\ndata: [DONE]\n";
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let events = collect_events(&transcriber).await;

    assert!(matches!(
        events.last().unwrap(),
        TranscriptionEvent::Completed(t) if t == "one two"
    ));
}

#[tokio::test]
async fn single_shot_transcribe_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"text\":\"hello there\"}", "application/json"),
        )
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let text = transcriber.transcribe(&test_blob()).await.unwrap();
    assert_eq!(text, "hello there");
}

#[tokio::test]
async fn single_shot_surfaces_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_raw("boom", "text/plain"))
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let err = transcriber.transcribe(&test_blob()).await.unwrap_err();
    match err {
        TranscriptionError::Api { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn single_shot_missing_text_field_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"status\":\"ok\"}", "application/json"),
        )
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    let err = transcriber.transcribe(&test_blob()).await.unwrap_err();
    assert!(matches!(err, TranscriptionError::ResponseMalformed));
}

#[tokio::test]
async fn base_url_with_v1_suffix_is_not_doubled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"text\":\"ok\"}", "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ServiceConfig {
        base_url: format!("{}/v1", server.uri()),
        ..config_for(&server)
    };
    let transcriber = WhisperTranscriber::new(config);
    assert_eq!(transcriber.transcribe(&test_blob()).await.unwrap(), "ok");
}

#[tokio::test]
async fn request_body_is_multipart() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(wiremock::matchers::header_exists("content-type"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"text\":\"ok\"}", "application/json"),
        )
        .mount(&server)
        .await;

    let transcriber = WhisperTranscriber::new(config_for(&server));
    transcriber.transcribe(&test_blob()).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let request = &requests[0];
    let content_type = request
        .headers
        .get("content-type")
        .expect("content-type header");
    assert!(content_type
        .to_str()
        .unwrap()
        .starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&request.body);
    assert!(body.contains("name=\"file\""));
    assert!(body.contains("filename=\"audio.wav\""));
    assert!(body.contains("name=\"model\""));
    assert!(body.contains("whisper-1"));
    assert!(body.contains("name=\"response_format\""));
    assert!(body.contains("name=\"temperature\""));
    assert!(body.contains("name=\"language\""));
}
