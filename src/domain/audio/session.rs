//! Recording session entity

use super::frame::AudioFrameBatch;

/// Identifier for one start/stop recording cycle.
///
/// Ids are allocated sequentially by the coordinator and tag every
/// transcription event, so late events from an abandoned session can be
/// recognized and discarded instead of mutating newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Owns the ordered frame batches captured during one recording cycle.
///
/// Batches are append-only and kept in strict arrival order. The session is
/// consumed when the capture engine finalizes it into an encoded blob, or
/// dropped wholesale on cancel.
#[derive(Debug)]
pub struct RecordingSession {
    id: SessionId,
    batches: Vec<AudioFrameBatch>,
}

impl RecordingSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            batches: Vec::new(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Append a captured batch. Empty batches are not recorded.
    pub fn push(&mut self, batch: AudioFrameBatch) {
        if !batch.is_empty() {
            self.batches.push(batch);
        }
    }

    pub fn batches(&self) -> &[AudioFrameBatch] {
        &self.batches
    }

    /// Consume the session, yielding its batches in capture order
    pub fn into_batches(self) -> Vec<AudioFrameBatch> {
        self.batches
    }

    /// Whether any non-empty batch was captured
    pub fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    /// Total captured frames across all batches
    pub fn total_frames(&self) -> usize {
        self.batches.iter().map(AudioFrameBatch::frames).sum()
    }
}
