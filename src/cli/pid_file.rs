//! PID file management for the daemon

use std::fs;
use std::path::PathBuf;
use std::process;

use nix::sys::signal::kill;
use nix::unistd::Pid;

/// Default PID file location
const DEFAULT_PID_PATH: &str = "/tmp/streamscribe.pid";

/// PID file guarding against concurrent daemons
pub struct PidFile {
    path: PathBuf,
}

impl PidFile {
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_PID_PATH),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Check if another daemon is already running
    pub fn is_running(&self) -> Option<u32> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let pid: u32 = contents.trim().parse().ok()?;

        // Probe with the null signal: delivers nothing, only checks liveness
        let probe = kill(Pid::from_raw(pid as i32), None);
        match probe {
            Ok(()) => Some(pid),
            Err(nix::errno::Errno::ESRCH) => {
                // Stale PID file from a dead process
                let _ = fs::remove_file(&self.path);
                None
            }
            Err(_) => None,
        }
    }

    /// Acquire the PID file (fails if another daemon is running)
    pub fn acquire(&self) -> Result<(), PidFileError> {
        if let Some(pid) = self.is_running() {
            return Err(PidFileError::AlreadyRunning(pid));
        }

        fs::write(&self.path, process::id().to_string())
            .map_err(|e| PidFileError::WriteFailed(e.to_string()))
    }

    /// Release the PID file
    pub fn release(&self) -> Result<(), PidFileError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| PidFileError::RemoveFailed(e.to_string()))?;
        }
        Ok(())
    }
}

impl Default for PidFile {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PidFile {
    fn drop(&mut self) {
        // Best-effort cleanup
        let _ = self.release();
    }
}

/// PID file errors
#[derive(Debug, thiserror::Error)]
pub enum PidFileError {
    #[error("Another daemon is already running (PID: {0})")]
    AlreadyRunning(u32),

    #[error("Failed to write PID file: {0}")]
    WriteFailed(String),

    #[error("Failed to remove PID file: {0}")]
    RemoveFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_uses_default_path() {
        let pid_file = PidFile::new();
        assert_eq!(pid_file.path(), &PathBuf::from(DEFAULT_PID_PATH));
    }

    #[test]
    fn is_running_returns_none_for_nonexistent_file() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = PidFile::with_path(dir.path().join("absent.pid"));
        assert!(pid_file.is_running().is_none());
    }

    #[test]
    fn acquire_then_detects_own_pid() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = PidFile::with_path(dir.path().join("live.pid"));

        pid_file.acquire().unwrap();
        // Our own process is alive, so a second acquire must refuse
        let other = PidFile::with_path(pid_file.path());
        assert!(matches!(
            other.acquire(),
            Err(PidFileError::AlreadyRunning(_))
        ));

        pid_file.release().unwrap();
    }

    #[test]
    fn stale_pid_file_is_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stale.pid");
        // Unparseable content reads as "no daemon running"
        fs::write(&path, "garbage").unwrap();

        let pid_file = PidFile::with_path(&path);
        assert!(pid_file.is_running().is_none());
    }
}
