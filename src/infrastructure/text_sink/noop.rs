//! No-op text sink
//!
//! Used when typing into the focused window is disabled; transcripts still
//! reach stdout and the clipboard.

use async_trait::async_trait;

use crate::application::ports::{TextSink, TextSinkError};

/// Text sink that discards everything
pub struct NoOpTextSink;

impl NoOpTextSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpTextSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextSink for NoOpTextSink {
    async fn insert_fragment(&self, _text: &str) -> Result<(), TextSinkError> {
        Ok(())
    }

    async fn begin_placeholder(&self, _token: &str) -> Result<(), TextSinkError> {
        Ok(())
    }

    async fn remove_placeholder(&self, _token: &str) -> Result<(), TextSinkError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_accepts_everything() {
        let sink = NoOpTextSink::new();
        assert!(sink.insert_fragment("hello").await.is_ok());
        assert!(sink.begin_placeholder("[x]").await.is_ok());
        assert!(sink.remove_placeholder("[x]").await.is_ok());
    }
}
