//! Control signal handling for the daemon
//!
//! Hotkey edges arrive from the external hotkey listener either through the
//! control socket or as SIGUSR1/SIGUSR2; both paths feed the same channel
//! so the daemon loop sees one serialized signal stream.

use colored::Colorize;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::mpsc;

/// Daemon control signals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlSignal {
    /// Hotkey pressed: start recording
    PushDown,
    /// Hotkey released: stop recording and transcribe
    PushUp,
    /// Discard the current recording
    Cancel,
    /// Shut the daemon down (SIGINT/SIGTERM)
    Shutdown,
}

/// Receives control signals from OS signals and the control socket.
pub struct ControlSignalHandler {
    receiver: mpsc::Receiver<ControlSignal>,
}

impl ControlSignalHandler {
    /// Install the OS signal handlers and return the handler plus a sender
    /// for other sources (the control socket server).
    ///
    /// SIGUSR1 is the hotkey-down edge, SIGUSR2 the hotkey-up edge;
    /// SIGINT and SIGTERM request shutdown.
    pub async fn new() -> Result<(Self, mpsc::Sender<ControlSignal>), std::io::Error> {
        let (tx, rx) = mpsc::channel(16);

        let tx_down = tx.clone();
        let mut sigusr1 = signal(SignalKind::user_defined1())?;
        tokio::spawn(async move {
            while sigusr1.recv().await.is_some() {
                if tx_down.send(ControlSignal::PushDown).await.is_err() {
                    break;
                }
            }
        });

        let tx_up = tx.clone();
        let mut sigusr2 = signal(SignalKind::user_defined2())?;
        tokio::spawn(async move {
            while sigusr2.recv().await.is_some() {
                if tx_up.send(ControlSignal::PushUp).await.is_err() {
                    break;
                }
            }
        });

        let tx_int = tx.clone();
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::spawn(async move {
            sigint.recv().await;
            eprintln!("{} Received SIGINT (shutdown)", "↓".cyan());
            let _ = tx_int.send(ControlSignal::Shutdown).await;
        });

        let tx_term = tx.clone();
        let mut sigterm = signal(SignalKind::terminate())?;
        tokio::spawn(async move {
            sigterm.recv().await;
            eprintln!("{} Received SIGTERM (shutdown)", "↓".cyan());
            let _ = tx_term.send(ControlSignal::Shutdown).await;
        });

        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<ControlSignal> {
        self.receiver.recv().await
    }
}
