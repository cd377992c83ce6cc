//! StreamScribe CLI entry point

use std::process::ExitCode;

use clap::Parser;

use streamscribe::cli::{
    app::{load_merged_config, EXIT_ERROR, EXIT_USAGE_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    daemon_app::{run_daemon, DaemonOptions},
    hotkey_cmd::handle_hotkey_command,
    presenter::Presenter,
};
use streamscribe::domain::config::{AppConfig, ServiceConfig};
use streamscribe::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Hotkey { action }) => {
            if let Err(e) = handle_hotkey_command(action, &presenter).await {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    if let Some(temperature) = cli.temperature {
        if !(0.0..=1.0).contains(&temperature) {
            presenter.error("Temperature must be between 0.0 and 1.0");
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    }

    // Build CLI config overlay from args
    let cli_config = AppConfig {
        api_key: None, // API key comes from env/file only
        base_url: cli.base_url.clone(),
        model: cli.model.clone(),
        language: cli.language.clone(),
        prompt: cli.prompt.clone(),
        temperature: cli.temperature,
        insert: if cli.insert {
            Some(true)
        } else if cli.no_insert {
            Some(false)
        } else {
            None
        },
        clipboard: if cli.clipboard { Some(true) } else { None },
        notify: if cli.notify { Some(true) } else { None },
        cues: if cli.no_cues { Some(false) } else { None },
    };

    let config = load_merged_config(cli_config).await;

    let options = DaemonOptions {
        service: ServiceConfig::from_app_config(&config),
        insert: config.insert_or_default(),
        clipboard: config.clipboard_or_default(),
        notify: config.notify_or_default(),
        cues: config.cues_or_default(),
    };

    run_daemon(options).await
}
