//! Audio capture port interface

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::watch;

use crate::domain::audio::{EncodedAudioBlob, SessionId};

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("audio input device unavailable")]
    DeviceUnavailable,

    #[error("a recording session is already active")]
    AlreadyRecording,
}

/// Port for signal-controlled microphone capture.
///
/// One session may be live at a time. `start` registers the device callback
/// and begins accumulating frame batches for the given session id; `stop`
/// unregisters it and finalizes the session into an encoded blob.
#[async_trait]
pub trait CaptureEngine: Send + Sync {
    /// Open the input device and begin capturing into a new session.
    async fn start(&self, session: SessionId) -> Result<(), CaptureError>;

    /// Stop capturing and finalize the session.
    ///
    /// Returns `None` when nothing was captured (a session shorter than one
    /// callback interval) or when every batch failed conversion. Callers
    /// treat `None` as "no speech", not as an error.
    async fn stop(&self) -> Option<EncodedAudioBlob>;

    /// Stop capturing and discard the session without encoding.
    async fn cancel(&self);

    /// Whether a session is currently live
    fn is_recording(&self) -> bool;

    /// Peak input level updates for UI metering.
    /// The sender side never blocks the device callback.
    fn meter(&self) -> watch::Receiver<f32>;
}
