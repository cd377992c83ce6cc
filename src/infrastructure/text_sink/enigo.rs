//! Text insertion adapter using enigo
//!
//! Types fragments and placeholder tokens into the focused window and
//! erases placeholders with backspace taps. Works on Windows, macOS, and
//! Linux (X11/Wayland).

use async_trait::async_trait;

use crate::application::ports::{TextSink, TextSinkError};

/// Cursor text sink backed by synthetic keyboard input
pub struct EnigoTextSink;

impl EnigoTextSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnigoTextSink {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one enigo operation on a blocking thread.
/// Enigo handles are not Send, so each call creates its own.
async fn with_enigo<F>(op: F) -> Result<(), TextSinkError>
where
    F: FnOnce(&mut enigo::Enigo) -> Result<(), enigo::InputError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        use enigo::{Enigo, Settings};

        let mut enigo = Enigo::new(&Settings::default())
            .map_err(|e| TextSinkError::InsertFailed(format!("failed to create enigo: {}", e)))?;

        op(&mut enigo).map_err(|e| TextSinkError::InsertFailed(e.to_string()))
    })
    .await
    .map_err(|e| TextSinkError::InsertFailed(format!("task join error: {}", e)))?
}

#[async_trait]
impl TextSink for EnigoTextSink {
    async fn insert_fragment(&self, text: &str) -> Result<(), TextSinkError> {
        let text = text.to_owned();
        with_enigo(move |enigo| {
            use enigo::Keyboard;
            enigo.text(&text)
        })
        .await
    }

    async fn begin_placeholder(&self, token: &str) -> Result<(), TextSinkError> {
        self.insert_fragment(token).await
    }

    async fn remove_placeholder(&self, token: &str) -> Result<(), TextSinkError> {
        // Erase exactly as many characters as the token typed
        let taps = token.chars().count();
        with_enigo(move |enigo| {
            use enigo::{Direction, Key, Keyboard};
            for _ in 0..taps {
                enigo.key(Key::Backspace, Direction::Click)?;
            }
            Ok(())
        })
        .await
    }
}
