//! Recording pipeline coordinator
//!
//! Binds the capture engine to the streaming transcription client and owns
//! the pipeline state machine. The coordinator is the single writer of
//! recording state: hotkey edges, transcription events, and recovery timers
//! must all be funneled through one caller (the daemon loop), which keeps
//! transitions serialized without any locking here.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::domain::audio::{EncodedAudioBlob, SessionId};
use crate::domain::recording::{RecordingState, RecordingStateMachine};

use super::ports::{
    AudioCue, AudioCueType, CaptureEngine, Clipboard, NotificationIcon, Notifier, TextSink,
    Transcriber, TranscriptionEvent,
};

/// A transcription event tagged with the session it belongs to.
///
/// Sessions are identified so that late events from an earlier request can
/// never mutate state belonging to a newer session; the coordinator simply
/// discards events whose tag does not match the active session.
#[derive(Debug)]
pub struct SessionEvent {
    pub session: SessionId,
    pub event: TranscriptionEvent,
}

/// What the coordinator did with a delivered event, for status display
#[derive(Debug, PartialEq, Eq)]
pub enum EventDisposition {
    /// Event belonged to an abandoned session and was discarded
    Stale,
    /// Fragment relayed to the text sink
    Fragment(String),
    /// Terminal success with the full transcript
    Completed(String),
    /// Terminal failure
    Failed(String),
}

/// Coordinator tuning
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Token typed while recording, removed on stop
    pub recording_placeholder: String,
    /// Token typed while waiting for the transcript
    pub transcribing_placeholder: String,
    /// Whether placeholder tokens are typed at all
    pub enable_placeholders: bool,
    /// Copy the final transcript to the clipboard
    pub enable_clipboard: bool,
    /// Show desktop notifications on state changes
    pub enable_notify: bool,
    /// Play audio cues around the capture lifecycle
    pub enable_cues: bool,
    /// How long Completed is shown before returning to idle
    pub completed_linger: Duration,
    /// How long Error is shown before returning to idle
    pub error_linger: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            recording_placeholder: "[recording...]".to_string(),
            transcribing_placeholder: "[transcribing...]".to_string(),
            enable_placeholders: true,
            enable_clipboard: false,
            enable_notify: false,
            enable_cues: true,
            completed_linger: Duration::from_secs(2),
            error_linger: Duration::from_secs(3),
        }
    }
}

/// Orchestrates one dictation cycle at a time:
/// hotkey down starts capture, hotkey up finalizes the blob and hands it to
/// the transcriber, streamed fragments are relayed to the text sink, and a
/// terminal event settles the cycle.
pub struct RecordingCoordinator<E, T, S, C, N, A>
where
    E: CaptureEngine,
    T: Transcriber + 'static,
    S: TextSink,
    C: Clipboard,
    N: Notifier,
    A: AudioCue,
{
    engine: E,
    transcriber: Arc<T>,
    text_sink: S,
    clipboard: C,
    notifier: N,
    cue: A,
    config: CoordinatorConfig,
    machine: RecordingStateMachine,
    events_tx: mpsc::Sender<SessionEvent>,
    next_session: u64,
    active: Option<SessionId>,
    /// Token currently typed at the cursor, if any
    current_placeholder: Option<String>,
    /// Whether any partial fragment has been inserted this cycle
    fragments_inserted: bool,
}

impl<E, T, S, C, N, A> RecordingCoordinator<E, T, S, C, N, A>
where
    E: CaptureEngine,
    T: Transcriber + 'static,
    S: TextSink,
    C: Clipboard,
    N: Notifier,
    A: AudioCue,
{
    /// Create a coordinator and the receiver its transcription events
    /// arrive on. The caller owns the receive loop and feeds every event
    /// back through [`handle_event`](Self::handle_event).
    pub fn new(
        engine: E,
        transcriber: Arc<T>,
        text_sink: S,
        clipboard: C,
        notifier: N,
        cue: A,
        config: CoordinatorConfig,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (events_tx, events_rx) = mpsc::channel(64);
        (
            Self {
                engine,
                transcriber,
                text_sink,
                clipboard,
                notifier,
                cue,
                config,
                machine: RecordingStateMachine::new(),
                events_tx,
                next_session: 0,
                active: None,
                current_placeholder: None,
                fragments_inserted: false,
            },
            events_rx,
        )
    }

    /// Current pipeline state
    pub fn state(&self) -> RecordingState {
        self.machine.state().clone()
    }

    /// How long the current settled state should linger before `recover`
    pub fn linger(&self) -> Option<Duration> {
        match self.machine.state() {
            RecordingState::Completed => Some(self.config.completed_linger),
            RecordingState::Error(_) => Some(self.config.error_linger),
            _ => None,
        }
    }

    /// Hotkey pressed: begin a new recording session.
    /// Ignored unless the pipeline is idle (no re-entrant sessions).
    pub async fn hotkey_down(&mut self) {
        if self.machine.begin_recording().is_err() {
            return;
        }

        let id = self.allocate_session();

        match self.engine.start(id).await {
            Ok(()) => {
                self.active = Some(id);
                self.fragments_inserted = false;
                self.play_cue(AudioCueType::CaptureStart).await;
                self.notify("Recording started", NotificationIcon::Recording)
                    .await;
                let token = self.config.recording_placeholder.clone();
                self.set_placeholder(token).await;
            }
            Err(e) => {
                self.machine.fail(e.to_string());
                self.play_cue(AudioCueType::Failure).await;
                self.notify(&format!("Recording failed: {}", e), NotificationIcon::Error)
                    .await;
            }
        }
    }

    /// Hotkey released: finalize the session and start transcription.
    /// Ignored unless currently recording.
    pub async fn hotkey_up(&mut self) {
        if self.machine.begin_processing().is_err() {
            return;
        }

        self.play_cue(AudioCueType::CaptureStop).await;
        self.clear_placeholder().await;

        match self.engine.stop().await {
            None => {
                // Session too short or nothing convertible: not an error
                let _ = self.machine.finish_empty();
                self.active = None;
                self.notify("No speech captured", NotificationIcon::Info).await;
            }
            Some(blob) => {
                let _ = self.machine.begin_transcribing();
                let token = self.config.transcribing_placeholder.clone();
                self.set_placeholder(token).await;
                self.notify(
                    &format!("Transcribing ({})...", blob.human_readable_size()),
                    NotificationIcon::Processing,
                )
                .await;
                if let Some(session) = self.active {
                    self.spawn_transcription(session, blob);
                }
            }
        }
    }

    /// Discard the current recording without transcribing
    pub async fn cancel(&mut self) {
        if self.machine.abort_recording().is_err() {
            return;
        }

        self.engine.cancel().await;
        self.active = None;
        self.clear_placeholder().await;
        self.play_cue(AudioCueType::CaptureCancel).await;
        self.notify("Recording cancelled", NotificationIcon::Info).await;
    }

    /// Apply one transcription event. Events tagged with anything but the
    /// active session are discarded unprocessed.
    pub async fn handle_event(&mut self, ev: SessionEvent) -> EventDisposition {
        if self.active != Some(ev.session) {
            return EventDisposition::Stale;
        }

        match ev.event {
            TranscriptionEvent::Partial(fragment) => {
                self.clear_placeholder().await;
                let _ = self.text_sink.insert_fragment(&fragment).await;
                self.fragments_inserted = true;
                EventDisposition::Fragment(fragment)
            }
            TranscriptionEvent::Completed(text) => {
                self.clear_placeholder().await;
                if !self.fragments_inserted && !text.is_empty() {
                    let _ = self.text_sink.insert_fragment(&text).await;
                }
                let _ = self.machine.complete();
                self.active = None;

                if self.config.enable_clipboard && !text.is_empty() {
                    let _ = self.clipboard.copy(&text).await;
                }
                self.notify("Transcription complete", NotificationIcon::Success)
                    .await;
                EventDisposition::Completed(text)
            }
            TranscriptionEvent::Failed(err) => {
                self.clear_placeholder().await;
                let reason = err.to_string();
                self.machine.fail(reason.clone());
                self.active = None;

                self.play_cue(AudioCueType::Failure).await;
                self.notify(
                    &format!("Transcription failed: {}", reason),
                    NotificationIcon::Error,
                )
                .await;
                EventDisposition::Failed(reason)
            }
        }
    }

    /// Return to idle after a settled state has lingered
    pub fn recover(&mut self) {
        let _ = self.machine.reset();
    }

    fn allocate_session(&mut self) -> SessionId {
        self.next_session += 1;
        SessionId::new(self.next_session)
    }

    fn spawn_transcription(&self, session: SessionId, blob: EncodedAudioBlob) {
        let transcriber = Arc::clone(&self.transcriber);
        let events = self.events_tx.clone();

        tokio::spawn(async move {
            let (tx, mut rx) = mpsc::channel(32);

            let produce = transcriber.transcribe_streaming(&blob, tx);
            let forward = async {
                while let Some(event) = rx.recv().await {
                    if events.send(SessionEvent { session, event }).await.is_err() {
                        break;
                    }
                }
            };

            tokio::join!(produce, forward);
        });
    }

    async fn set_placeholder(&mut self, token: String) {
        if !self.config.enable_placeholders {
            return;
        }
        let _ = self.text_sink.begin_placeholder(&token).await;
        self.current_placeholder = Some(token);
    }

    async fn clear_placeholder(&mut self) {
        if let Some(token) = self.current_placeholder.take() {
            let _ = self.text_sink.remove_placeholder(&token).await;
        }
    }

    async fn play_cue(&self, cue: AudioCueType) {
        if self.config.enable_cues {
            let _ = self.cue.play(cue).await;
        }
    }

    async fn notify(&self, message: &str, icon: NotificationIcon) {
        if self.config.enable_notify {
            let _ = self.notifier.notify("StreamScribe", message, icon).await;
        }
    }
}
