//! Daemon runner: wires adapters to the coordinator and drives the loop

use std::process::ExitCode;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

use crate::application::coordinator::{
    CoordinatorConfig, EventDisposition, RecordingCoordinator, SessionEvent,
};
use crate::application::ports::{
    AudioCue, CaptureEngine, Clipboard, Notifier, TextSink, Transcriber,
};
use crate::domain::config::ServiceConfig;
use crate::domain::recording::RecordingState;
use crate::infrastructure::{
    ArboardClipboard, CpalCaptureEngine, EnigoTextSink, NoOpAudioCue, NoOpTextSink,
    NotifyRustNotifier, RodioAudioCue, WhisperTranscriber,
};

use super::app::{EXIT_ERROR, EXIT_SUCCESS};
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals::{ControlSignal, ControlSignalHandler};
use super::socket::{ControlSocketServer, SocketPath};

/// Resolved daemon options
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    pub service: ServiceConfig,
    pub insert: bool,
    pub clipboard: bool,
    pub notify: bool,
    pub cues: bool,
}

/// Run the dictation daemon until shutdown
pub async fn run_daemon(options: DaemonOptions) -> ExitCode {
    let mut presenter = Presenter::new();

    let pid_file = PidFile::new();
    if let Err(e) = pid_file.acquire() {
        match e {
            PidFileError::AlreadyRunning(pid) => {
                presenter.error(&format!("Another daemon is already running (PID: {})", pid));
            }
            _ => presenter.error(&e.to_string()),
        }
        return ExitCode::from(EXIT_ERROR);
    }

    // Fail fast on an unusable service config instead of at first hotkey
    if let Err(e) = options.service.validate() {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }

    let engine = CpalCaptureEngine::new();
    let meter = engine.meter();
    let transcriber = Arc::new(WhisperTranscriber::new(options.service.clone()));

    let text_sink: Box<dyn TextSink> = if options.insert {
        Box::new(EnigoTextSink::new())
    } else {
        Box::new(NoOpTextSink::new())
    };
    let cue: Box<dyn AudioCue> = if options.cues {
        Box::new(RodioAudioCue::new())
    } else {
        Box::new(NoOpAudioCue::new())
    };

    let config = CoordinatorConfig {
        enable_placeholders: options.insert,
        enable_clipboard: options.clipboard,
        enable_notify: options.notify,
        enable_cues: options.cues,
        ..Default::default()
    };

    let (mut coordinator, mut events) = RecordingCoordinator::new(
        engine,
        transcriber,
        text_sink,
        ArboardClipboard::new(),
        NotifyRustNotifier::new(),
        cue,
        config,
    );

    let (mut signals, signal_tx) = match ControlSignalHandler::new().await {
        Ok(pair) => pair,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let socket_path = SocketPath::new();
    let mut socket_server = ControlSocketServer::new(socket_path.clone());
    if let Err(e) = socket_server.bind() {
        presenter.error(&format!("Failed to bind socket: {}", e));
        return ExitCode::from(EXIT_ERROR);
    }

    // Shared with the socket server so status queries see live state
    let state = Arc::new(StdMutex::new(RecordingState::Idle));
    let state_for_socket = Arc::clone(&state);

    tokio::spawn(async move {
        let _ = socket_server
            .run(signal_tx, move || {
                state_for_socket
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone()
            })
            .await;
    });

    presenter.daemon_status("Started, waiting for hotkey events...");
    presenter.info(&format!(
        "PID: {} | Socket: {} | SIGUSR1: down, SIGUSR2: up, SIGINT: exit",
        std::process::id(),
        socket_path.path().display()
    ));

    let clean = daemon_loop(
        &mut coordinator,
        &mut signals,
        &mut events,
        meter,
        &mut presenter,
        &state,
    )
    .await;

    let _ = pid_file.release();

    if clean {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_ERROR)
    }
}

/// Serialize every state mutation through one select loop.
/// Returns true on a clean shutdown.
async fn daemon_loop<E, T, S, C, N, A>(
    coordinator: &mut RecordingCoordinator<E, T, S, C, N, A>,
    signals: &mut ControlSignalHandler,
    events: &mut mpsc::Receiver<SessionEvent>,
    mut meter: watch::Receiver<f32>,
    presenter: &mut Presenter,
    shared_state: &Arc<StdMutex<RecordingState>>,
) -> bool
where
    E: CaptureEngine,
    T: Transcriber + 'static,
    S: TextSink,
    C: Clipboard,
    N: Notifier,
    A: AudioCue,
{
    let mut recover_at: Option<Instant> = None;
    // Whether streamed fragments have left an unterminated stdout line
    let mut line_open = false;

    loop {
        let state = coordinator.state();
        if let Ok(mut guard) = shared_state.lock() {
            *guard = state.clone();
        }

        match coordinator.linger() {
            Some(delay) if recover_at.is_none() => recover_at = Some(Instant::now() + delay),
            None => recover_at = None,
            _ => {}
        }

        let recording = state == RecordingState::Recording;
        let linger_armed = recover_at.is_some();
        let recover_deadline =
            recover_at.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

        tokio::select! {
            signal = signals.recv() => match signal {
                Some(ControlSignal::PushDown) => on_push_down(coordinator, presenter).await,
                Some(ControlSignal::PushUp) => on_push_up(coordinator, presenter).await,
                Some(ControlSignal::Cancel) => {
                    coordinator.cancel().await;
                    presenter.stop_spinner();
                }
                Some(ControlSignal::Shutdown) => {
                    presenter.stop_spinner();
                    presenter.daemon_status("Shutting down...");
                    return true;
                }
                None => return false,
            },

            event = events.recv() => match event {
                Some(event) => on_event(coordinator, presenter, event, &mut line_open).await,
                None => return false,
            },

            changed = meter.changed(), if recording => {
                if changed.is_ok() {
                    let peak = *meter.borrow_and_update();
                    let bar = presenter.format_level(peak);
                    presenter.update_spinner(&format!("Recording... {}", bar));
                }
            }

            _ = tokio::time::sleep_until(recover_deadline), if linger_armed => {
                coordinator.recover();
                recover_at = None;
                presenter.daemon_status("Ready");
            }
        }
    }
}

async fn on_push_down<E, T, S, C, N, A>(
    coordinator: &mut RecordingCoordinator<E, T, S, C, N, A>,
    presenter: &mut Presenter,
) where
    E: CaptureEngine,
    T: Transcriber + 'static,
    S: TextSink,
    C: Clipboard,
    N: Notifier,
    A: AudioCue,
{
    coordinator.hotkey_down().await;
    match coordinator.state() {
        RecordingState::Recording => presenter.start_spinner("Recording..."),
        RecordingState::Error(reason) => {
            presenter.error(&format!("Failed to start recording: {}", reason));
        }
        _ => {}
    }
}

async fn on_push_up<E, T, S, C, N, A>(
    coordinator: &mut RecordingCoordinator<E, T, S, C, N, A>,
    presenter: &mut Presenter,
) where
    E: CaptureEngine,
    T: Transcriber + 'static,
    S: TextSink,
    C: Clipboard,
    N: Notifier,
    A: AudioCue,
{
    coordinator.hotkey_up().await;
    match coordinator.state() {
        RecordingState::Transcribing => presenter.update_spinner("Transcribing..."),
        RecordingState::Idle => {
            presenter.stop_spinner();
            presenter.warn("No speech captured");
        }
        _ => presenter.stop_spinner(),
    }
}

async fn on_event<E, T, S, C, N, A>(
    coordinator: &mut RecordingCoordinator<E, T, S, C, N, A>,
    presenter: &mut Presenter,
    event: SessionEvent,
    line_open: &mut bool,
) where
    E: CaptureEngine,
    T: Transcriber + 'static,
    S: TextSink,
    C: Clipboard,
    N: Notifier,
    A: AudioCue,
{
    match coordinator.handle_event(event).await {
        EventDisposition::Stale => {}
        EventDisposition::Fragment(fragment) => {
            presenter.stop_spinner();
            presenter.output_inline(&fragment);
            *line_open = true;
        }
        EventDisposition::Completed(text) => {
            presenter.stop_spinner();
            if *line_open {
                // Fragments already printed the transcript; close the line
                presenter.output("");
                *line_open = false;
            } else if !text.is_empty() {
                presenter.output(&text);
            }
            presenter.success("Transcription complete");
        }
        EventDisposition::Failed(reason) => {
            presenter.spinner_fail("Transcription failed");
            if *line_open {
                presenter.output("");
                *line_open = false;
            }
            presenter.error(&reason);
        }
    }
}
