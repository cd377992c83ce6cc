//! Shared CLI helpers: exit codes and config resolution

use std::env;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::infrastructure::XdgConfigStore;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Build a config overlay from the WHISPER_* environment variables
fn env_config() -> AppConfig {
    let var = |name: &str| env::var(name).ok().filter(|s| !s.is_empty());

    AppConfig {
        api_key: var("WHISPER_API_KEY"),
        base_url: var("WHISPER_BASE_URL"),
        model: var("WHISPER_MODEL_ID"),
        language: var("WHISPER_LANGUAGE"),
        prompt: var("WHISPER_PROMPT"),
        temperature: var("WHISPER_TEMPERATURE").and_then(|t| t.parse().ok()),
        ..Default::default()
    }
}

/// Load and merge configuration.
/// Precedence: defaults < config file < environment < CLI flags.
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config())
        .merge(cli_config)
}
