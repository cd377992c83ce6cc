//! Domain error types

use thiserror::Error;

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}

/// Error when the transcription service configuration is unusable
#[derive(Debug, Clone, Error)]
#[error("API key is missing. Set WHISPER_API_KEY or run 'streamscribe config set api_key <key>'")]
pub struct MissingApiKey;
