//! Resolved transcription service configuration

use crate::domain::error::MissingApiKey;

use super::app_config::AppConfig;

/// Everything the transcription client needs for one request.
///
/// Built once from the merged [`AppConfig`] when the daemon starts; the
/// client treats it as immutable.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub language: Option<String>,
    pub prompt: Option<String>,
    pub temperature: f64,
}

impl ServiceConfig {
    /// Resolve from merged application config
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.base_url_or_default().to_string(),
            api_key: config.api_key.clone().unwrap_or_default(),
            model: config.model_or_default().to_string(),
            language: config.language.clone().filter(|l| !l.is_empty()),
            prompt: config.prompt.clone().filter(|p| !p.is_empty()),
            temperature: config.temperature_or_default(),
        }
    }

    /// Derive the transcription endpoint from the configured base URL.
    /// A base already ending in `/v1` gets `/audio/transcriptions` appended;
    /// anything else gets the full `/v1/audio/transcriptions` path.
    pub fn endpoint(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1") {
            format!("{}/audio/transcriptions", base)
        } else {
            format!("{}/v1/audio/transcriptions", base)
        }
    }

    /// Check the config is usable before issuing a request
    pub fn validate(&self) -> Result<(), MissingApiKey> {
        if self.api_key.is_empty() {
            return Err(MissingApiKey);
        }
        Ok(())
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::defaults())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_appends_v1_path() {
        let config = ServiceConfig {
            base_url: "https://api.openai.com".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint(),
            "https://api.openai.com/v1/audio/transcriptions"
        );
    }

    #[test]
    fn endpoint_respects_existing_v1_suffix() {
        let config = ServiceConfig {
            base_url: "https://llm.example.com/v1".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint(),
            "https://llm.example.com/v1/audio/transcriptions"
        );
    }

    #[test]
    fn endpoint_strips_trailing_slash() {
        let config = ServiceConfig {
            base_url: "https://llm.example.com/v1/".to_string(),
            ..Default::default()
        };
        assert_eq!(
            config.endpoint(),
            "https://llm.example.com/v1/audio/transcriptions"
        );
    }

    #[test]
    fn validate_requires_api_key() {
        let config = ServiceConfig::default();
        assert!(config.validate().is_err());

        let config = ServiceConfig {
            api_key: "sk-test".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn from_app_config_filters_empty_optionals() {
        let app = AppConfig {
            language: Some(String::new()),
            prompt: Some(String::new()),
            ..AppConfig::defaults()
        };
        let config = ServiceConfig::from_app_config(&app);
        assert!(config.language.is_none());
        assert!(config.prompt.is_none());
    }

    #[test]
    fn from_app_config_carries_values() {
        let app = AppConfig {
            api_key: Some("sk-abc".to_string()),
            base_url: Some("https://local:8080".to_string()),
            model: Some("whisper-1".to_string()),
            language: Some("de".to_string()),
            temperature: Some(0.0),
            ..Default::default()
        };
        let config = ServiceConfig::from_app_config(&app);
        assert_eq!(config.api_key, "sk-abc");
        assert_eq!(config.base_url, "https://local:8080");
        assert_eq!(config.model, "whisper-1");
        assert_eq!(config.language.as_deref(), Some("de"));
        assert_eq!(config.temperature, 0.0);
    }
}
