//! Application configuration value object

use serde::{Deserialize, Serialize};

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub temperature: Option<f64>,
    pub insert: Option<bool>,
    pub clipboard: Option<bool>,
    pub notify: Option<bool>,
    pub cues: Option<bool>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            api_key: None,
            base_url: Some("https://api.openai.com".to_string()),
            model: Some("whisper-large-v3".to_string()),
            language: None,
            prompt: None,
            temperature: Some(0.2),
            insert: Some(true),
            clipboard: Some(false),
            notify: Some(false),
            cues: Some(true),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            api_key: other.api_key.or(self.api_key),
            base_url: other.base_url.or(self.base_url),
            model: other.model.or(self.model),
            language: other.language.or(self.language),
            prompt: other.prompt.or(self.prompt),
            temperature: other.temperature.or(self.temperature),
            insert: other.insert.or(self.insert),
            clipboard: other.clipboard.or(self.clipboard),
            notify: other.notify.or(self.notify),
            cues: other.cues.or(self.cues),
        }
    }

    /// Get base URL, or the public OpenAI endpoint if not set
    pub fn base_url_or_default(&self) -> &str {
        self.base_url.as_deref().unwrap_or("https://api.openai.com")
    }

    /// Get model id, or the default Whisper model if not set
    pub fn model_or_default(&self) -> &str {
        self.model.as_deref().unwrap_or("whisper-large-v3")
    }

    /// Get temperature, or 0.2 if not set
    pub fn temperature_or_default(&self) -> f64 {
        self.temperature.unwrap_or(0.2)
    }

    /// Get text insertion setting, or true if not set
    pub fn insert_or_default(&self) -> bool {
        self.insert.unwrap_or(true)
    }

    /// Get clipboard setting, or false if not set
    pub fn clipboard_or_default(&self) -> bool {
        self.clipboard.unwrap_or(false)
    }

    /// Get notify setting, or false if not set
    pub fn notify_or_default(&self) -> bool {
        self.notify.unwrap_or(false)
    }

    /// Get audio cue setting, or true if not set
    pub fn cues_or_default(&self) -> bool {
        self.cues.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.api_key.is_none());
        assert_eq!(config.base_url, Some("https://api.openai.com".to_string()));
        assert_eq!(config.model, Some("whisper-large-v3".to_string()));
        assert!(config.language.is_none());
        assert_eq!(config.temperature, Some(0.2));
        assert_eq!(config.insert, Some(true));
        assert_eq!(config.clipboard, Some(false));
        assert_eq!(config.notify, Some(false));
        assert_eq!(config.cues, Some(true));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.api_key.is_none());
        assert!(config.base_url.is_none());
        assert!(config.model.is_none());
        assert!(config.temperature.is_none());
        assert!(config.insert.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            api_key: Some("base-key".to_string()),
            model: Some("base-model".to_string()),
            notify: Some(false),
            ..Default::default()
        };
        let other = AppConfig {
            api_key: Some("other-key".to_string()),
            language: Some("en".to_string()),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.api_key, Some("other-key".to_string()));
        assert_eq!(merged.model, Some("base-model".to_string()));
        assert_eq!(merged.language, Some("en".to_string()));
        assert_eq!(merged.notify, Some(false));
    }

    #[test]
    fn merge_none_preserves_base() {
        let base = AppConfig::defaults();
        let merged = base.clone().merge(AppConfig::empty());
        assert_eq!(merged.base_url, base.base_url);
        assert_eq!(merged.temperature, base.temperature);
    }

    #[test]
    fn accessor_defaults() {
        let config = AppConfig::empty();
        assert_eq!(config.base_url_or_default(), "https://api.openai.com");
        assert_eq!(config.model_or_default(), "whisper-large-v3");
        assert!((config.temperature_or_default() - 0.2).abs() < f64::EPSILON);
        assert!(config.insert_or_default());
        assert!(!config.clipboard_or_default());
        assert!(!config.notify_or_default());
        assert!(config.cues_or_default());
    }
}
