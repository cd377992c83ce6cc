//! Hotkey command handler - forwards edge events to the running daemon

use super::args::HotkeyAction;
use super::presenter::Presenter;
use super::socket::{ControlSocketClient, SocketPath};

/// Handle the hotkey subcommand
pub async fn handle_hotkey_command(
    action: HotkeyAction,
    presenter: &Presenter,
) -> Result<(), String> {
    let client = ControlSocketClient::new(SocketPath::new());

    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: streamscribe".to_string());
    }

    let cmd = match action {
        HotkeyAction::Down => "down",
        HotkeyAction::Up => "up",
        HotkeyAction::Cancel => "cancel",
        HotkeyAction::Status => "status",
    };

    let response = client
        .send_command(cmd)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;

    let response = response.trim();

    match action {
        HotkeyAction::Status => {
            presenter.info(&format!("Daemon status: {}", response));
        }
        _ => {
            if let Some(stripped) = response.strip_prefix("error:") {
                return Err(stripped.trim().to_string());
            }
        }
    }

    Ok(())
}
