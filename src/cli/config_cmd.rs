//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::error::ConfigError;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(unknown_key(key));
    }

    validate_config_value(key, value)?;

    let mut config = store.load().await?;

    match key {
        "api_key" => config.api_key = Some(value.to_string()),
        "base_url" => config.base_url = Some(value.to_string()),
        "model" => config.model = Some(value.to_string()),
        "language" => config.language = Some(value.to_string()),
        "prompt" => config.prompt = Some(value.to_string()),
        "temperature" => config.temperature = Some(parse_temperature(value)?),
        "insert" => config.insert = Some(parse_bool_value(key, value)?),
        "clipboard" => config.clipboard = Some(parse_bool_value(key, value)?),
        "notify" => config.notify = Some(parse_bool_value(key, value)?),
        "cues" => config.cues = Some(parse_bool_value(key, value)?),
        _ => unreachable!(), // Already validated
    }

    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    if !is_valid_config_key(key) {
        return Err(unknown_key(key));
    }

    let config = store.load().await?;

    let value = match key {
        "api_key" => config.api_key.map(|s| mask_api_key(&s)),
        "base_url" => config.base_url,
        "model" => config.model,
        "language" => config.language,
        "prompt" => config.prompt,
        "temperature" => config.temperature.map(|t| t.to_string()),
        "insert" => config.insert.map(|b| b.to_string()),
        "clipboard" => config.clipboard.map(|b| b.to_string()),
        "notify" => config.notify.map(|b| b.to_string()),
        "cues" => config.cues.map(|b| b.to_string()),
        _ => unreachable!(),
    };

    match value {
        Some(v) => presenter.output(&v),
        None => presenter.output("(not set)"),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    let unset = || "(not set)".to_string();

    presenter.key_value(
        "api_key",
        &config.api_key.map(|s| mask_api_key(&s)).unwrap_or_else(unset),
    );
    presenter.key_value("base_url", config.base_url.as_deref().unwrap_or("(not set)"));
    presenter.key_value("model", config.model.as_deref().unwrap_or("(not set)"));
    presenter.key_value("language", config.language.as_deref().unwrap_or("(not set)"));
    presenter.key_value("prompt", config.prompt.as_deref().unwrap_or("(not set)"));
    presenter.key_value(
        "temperature",
        &config
            .temperature
            .map(|t| t.to_string())
            .unwrap_or_else(unset),
    );
    presenter.key_value(
        "insert",
        &config.insert.map(|b| b.to_string()).unwrap_or_else(unset),
    );
    presenter.key_value(
        "clipboard",
        &config.clipboard.map(|b| b.to_string()).unwrap_or_else(unset),
    );
    presenter.key_value(
        "notify",
        &config.notify.map(|b| b.to_string()).unwrap_or_else(unset),
    );
    presenter.key_value(
        "cues",
        &config.cues.map(|b| b.to_string()).unwrap_or_else(unset),
    );

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn unknown_key(key: &str) -> ConfigError {
    ConfigError::ValidationError {
        key: key.to_string(),
        message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
    }
}

/// Validate a config value based on key type
fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    match key {
        "temperature" => {
            parse_temperature(value)?;
        }
        "insert" | "clipboard" | "notify" | "cues" => {
            parse_bool_value(key, value)?;
        }
        _ => {} // free-form string keys
    }
    Ok(())
}

fn parse_temperature(value: &str) -> Result<f64, ConfigError> {
    let invalid = || ConfigError::ValidationError {
        key: "temperature".to_string(),
        message: "Value must be a number between 0.0 and 1.0".to_string(),
    };

    let parsed: f64 = value.parse().map_err(|_| invalid())?;
    if !(0.0..=1.0).contains(&parsed) {
        return Err(invalid());
    }
    Ok(parsed)
}

fn parse_bool_value(key: &str, value: &str) -> Result<bool, ConfigError> {
    parse_bool(value).ok_or_else(|| ConfigError::ValidationError {
        key: key.to_string(),
        message: "Value must be 'true' or 'false'".to_string(),
    })
}

/// Parse a boolean value
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    if key.len() <= 8 {
        "*".repeat(key.len())
    } else {
        format!("{}...{}", &key[..4], &key[key.len() - 4..])
    }
}
