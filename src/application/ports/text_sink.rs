//! Text insertion port interface

use async_trait::async_trait;
use thiserror::Error;

/// Text insertion errors
#[derive(Debug, Clone, Error)]
pub enum TextSinkError {
    #[error("failed to insert text: {0}")]
    InsertFailed(String),
}

/// Port for inserting transcribed text at the cursor of the focused window.
///
/// The sink owns all insertion-side state (what placeholder is currently on
/// screen, how to erase it); the coordinator only passes tokens and
/// fragments.
#[async_trait]
pub trait TextSink: Send + Sync {
    /// Type a transcript fragment at the cursor.
    async fn insert_fragment(&self, text: &str) -> Result<(), TextSinkError>;

    /// Type a placeholder token that will later be removed.
    async fn begin_placeholder(&self, token: &str) -> Result<(), TextSinkError>;

    /// Erase a previously inserted placeholder token.
    async fn remove_placeholder(&self, token: &str) -> Result<(), TextSinkError>;
}

/// Blanket implementation for boxed sink types
#[async_trait]
impl TextSink for Box<dyn TextSink> {
    async fn insert_fragment(&self, text: &str) -> Result<(), TextSinkError> {
        self.as_ref().insert_fragment(text).await
    }

    async fn begin_placeholder(&self, token: &str) -> Result<(), TextSinkError> {
        self.as_ref().begin_placeholder(token).await
    }

    async fn remove_placeholder(&self, token: &str) -> Result<(), TextSinkError> {
        self.as_ref().remove_placeholder(token).await
    }
}
