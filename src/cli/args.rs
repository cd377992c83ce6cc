//! CLI argument definitions using Clap

use clap::{Parser, Subcommand};

/// StreamScribe - push-to-talk voice dictation
#[derive(Parser, Debug)]
#[command(name = "streamscribe")]
#[command(version = "0.1.0")]
#[command(about = "Push-to-talk voice dictation with streaming Whisper transcription")]
#[command(long_about = None)]
pub struct Cli {
    /// Type transcribed text into the focused window (default)
    #[arg(short = 'i', long, conflicts_with = "no_insert")]
    pub insert: bool,

    /// Do not type into the focused window
    #[arg(long)]
    pub no_insert: bool,

    /// Copy the final transcript to the clipboard
    #[arg(short = 'c', long)]
    pub clipboard: bool,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Disable audio cues
    #[arg(long)]
    pub no_cues: bool,

    /// Transcription model id
    #[arg(short = 'm', long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Spoken language hint (ISO 639-1 code)
    #[arg(short = 'l', long, value_name = "LANG")]
    pub language: Option<String>,

    /// API base URL
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Decoding prompt to bias the model
    #[arg(long, value_name = "TEXT")]
    pub prompt: Option<String>,

    /// Sampling temperature (0.0 - 1.0)
    #[arg(short = 't', long, value_name = "TEMP")]
    pub temperature: Option<f64>,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send hotkey edge events to the running daemon
    Hotkey {
        #[command(subcommand)]
        action: HotkeyAction,
    },
}

/// Hotkey edge events, as forwarded by the external hotkey listener
#[derive(Subcommand, Debug, Clone, Copy)]
pub enum HotkeyAction {
    /// Hotkey pressed: start recording
    Down,
    /// Hotkey released: stop recording and transcribe
    Up,
    /// Discard the current recording
    Cancel,
    /// Show daemon status
    Status,
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "api_key",
    "base_url",
    "model",
    "language",
    "prompt",
    "temperature",
    "insert",
    "clipboard",
    "notify",
    "cues",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["streamscribe"]);
        assert!(!cli.insert);
        assert!(!cli.no_insert);
        assert!(!cli.clipboard);
        assert!(!cli.notify);
        assert!(!cli.no_cues);
        assert!(cli.model.is_none());
        assert!(cli.language.is_none());
        assert!(cli.command.is_none());
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["streamscribe", "-c", "-n", "--no-cues"]);
        assert!(cli.clipboard);
        assert!(cli.notify);
        assert!(cli.no_cues);
    }

    #[test]
    fn cli_parses_service_overrides() {
        let cli = Cli::parse_from([
            "streamscribe",
            "-m",
            "whisper-1",
            "-l",
            "en",
            "--base-url",
            "https://llm.example.com/v1",
            "-t",
            "0.4",
        ]);
        assert_eq!(cli.model, Some("whisper-1".to_string()));
        assert_eq!(cli.language, Some("en".to_string()));
        assert_eq!(cli.base_url, Some("https://llm.example.com/v1".to_string()));
        assert_eq!(cli.temperature, Some(0.4));
    }

    #[test]
    fn cli_parses_hotkey_down() {
        let cli = Cli::parse_from(["streamscribe", "hotkey", "down"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Hotkey {
                action: HotkeyAction::Down
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["streamscribe", "config", "set", "model", "whisper-1"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "model");
            assert_eq!(value, "whisper-1");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn insert_conflicts_with_no_insert() {
        assert!(Cli::try_parse_from(["streamscribe", "-i", "--no-insert"]).is_err());
    }

    #[test]
    fn valid_config_keys() {
        assert!(is_valid_config_key("api_key"));
        assert!(is_valid_config_key("temperature"));
        assert!(is_valid_config_key("cues"));
        assert!(!is_valid_config_key("invalid_key"));
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
