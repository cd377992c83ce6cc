//! Unix domain socket for daemon control
//!
//! The external hotkey listener talks to the running daemon through this
//! socket: one line per command (`down`, `up`, `cancel`, `status`), one
//! line per reply.

use std::io;
use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::mpsc;

use crate::domain::recording::RecordingState;

use super::signals::ControlSignal;

/// Socket path resolver
#[derive(Debug, Clone)]
pub struct SocketPath {
    path: PathBuf,
}

impl SocketPath {
    /// Create socket path, preferring XDG_RUNTIME_DIR
    pub fn new() -> Self {
        let path = std::env::var("XDG_RUNTIME_DIR")
            .map(|dir| PathBuf::from(dir).join("streamscribe.sock"))
            .unwrap_or_else(|_| std::env::temp_dir().join("streamscribe.sock"));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Remove socket file if it exists
    pub fn cleanup(&self) -> io::Result<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}

impl Default for SocketPath {
    fn default() -> Self {
        Self::new()
    }
}

/// Control socket server - forwards commands into the signal channel
pub struct ControlSocketServer {
    socket_path: SocketPath,
    listener: Option<UnixListener>,
}

impl ControlSocketServer {
    pub fn new(socket_path: SocketPath) -> Self {
        Self {
            socket_path,
            listener: None,
        }
    }

    /// Bind to the socket, replacing any stale socket file
    pub fn bind(&mut self) -> io::Result<()> {
        self.socket_path.cleanup()?;
        let listener = UnixListener::bind(self.socket_path.path())?;
        self.listener = Some(listener);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        self.socket_path.path()
    }

    /// Accept and handle connections.
    ///
    /// Each command is forwarded into the daemon's signal channel; the
    /// state_fn answers status queries with the current pipeline state.
    pub async fn run<F>(&self, tx: mpsc::Sender<ControlSignal>, state_fn: F) -> io::Result<()>
    where
        F: Fn() -> RecordingState + Send + Sync + 'static,
    {
        let listener = self
            .listener
            .as_ref()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "Socket not bound"))?;

        loop {
            match listener.accept().await {
                Ok((stream, _addr)) => {
                    let tx = tx.clone();
                    let state = state_fn();
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, tx, state).await {
                            eprintln!("socket connection error: {}", e);
                        }
                    });
                }
                Err(e) => {
                    eprintln!("socket accept error: {}", e);
                }
            }
        }
    }

    pub fn cleanup(&self) {
        let _ = self.socket_path.cleanup();
    }
}

impl Drop for ControlSocketServer {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Handle a single client connection
async fn handle_connection(
    stream: UnixStream,
    tx: mpsc::Sender<ControlSignal>,
    current_state: RecordingState,
) -> io::Result<()> {
    let (reader, mut writer) = stream.into_split();
    let mut reader = BufReader::new(reader);
    let mut line = String::new();

    reader.read_line(&mut line).await?;
    let cmd = line.trim();

    let response: String = match cmd {
        "down" => {
            let _ = tx.send(ControlSignal::PushDown).await;
            "ok\n".to_string()
        }
        "up" => {
            let _ = tx.send(ControlSignal::PushUp).await;
            "ok\n".to_string()
        }
        "cancel" => {
            let _ = tx.send(ControlSignal::Cancel).await;
            "ok\n".to_string()
        }
        "status" => format!("{}\n", current_state),
        _ => "error: unknown command\n".to_string(),
    };

    writer.write_all(response.as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}

/// Control socket client - connects and sends commands
pub struct ControlSocketClient {
    socket_path: SocketPath,
}

impl ControlSocketClient {
    pub fn new(socket_path: SocketPath) -> Self {
        Self { socket_path }
    }

    /// Check if daemon appears to be running (socket exists)
    pub fn is_daemon_running(&self) -> bool {
        self.socket_path.exists()
    }

    /// Send a command and receive the one-line response
    pub async fn send_command(&self, cmd: &str) -> io::Result<String> {
        let stream = UnixStream::connect(self.socket_path.path()).await?;
        let (reader, mut writer) = stream.into_split();

        writer.write_all(format!("{}\n", cmd).as_bytes()).await?;
        writer.flush().await?;

        let mut reader = BufReader::new(reader);
        let mut response = String::new();
        reader.read_line(&mut response).await?;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn socket_path_resolution() {
        let expected = std::env::var("XDG_RUNTIME_DIR")
            .map(|dir| PathBuf::from(dir).join("streamscribe.sock"))
            .unwrap_or_else(|_| std::env::temp_dir().join("streamscribe.sock"));

        let socket_path = SocketPath::new();
        assert_eq!(socket_path.path(), expected.as_path());
    }

    #[tokio::test]
    async fn round_trip_commands_over_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = SocketPath {
            path: dir.path().join("test.sock"),
        };

        let mut server = ControlSocketServer::new(path.clone());
        server.bind().unwrap();

        let (tx, mut rx) = mpsc::channel(4);
        tokio::spawn(async move {
            let _ = server.run(tx, || RecordingState::Idle).await;
        });

        let client = ControlSocketClient::new(path);
        assert!(client.is_daemon_running());

        assert_eq!(client.send_command("down").await.unwrap(), "ok\n");
        assert_eq!(rx.recv().await, Some(ControlSignal::PushDown));

        assert_eq!(client.send_command("up").await.unwrap(), "ok\n");
        assert_eq!(rx.recv().await, Some(ControlSignal::PushUp));

        assert_eq!(client.send_command("status").await.unwrap(), "idle\n");
        assert!(client
            .send_command("bogus")
            .await
            .unwrap()
            .starts_with("error:"));
    }
}
