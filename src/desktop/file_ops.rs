use crate::core::FrameToolError;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::JoinHandle;

/// Opening and deleting exported images.
pub trait FileOps {
    /// Hand `path` to the OS default application.
    fn open(&self, path: &Path) -> Result<(), FrameToolError>;
    fn delete(&self, path: &Path) -> Result<(), FrameToolError>;
}

pub struct SystemFileOps;

impl SystemFileOps {
    #[cfg(target_os = "windows")]
    fn opener_command(path: &Path) -> Command {
        let mut cmd = Command::new("cmd");
        // empty string is the window title `start` expects before the path
        cmd.arg("/C").arg("start").arg("").arg(path);
        cmd
    }

    #[cfg(target_os = "macos")]
    fn opener_command(path: &Path) -> Command {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    fn opener_command(path: &Path) -> Command {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

/// Start `cmd` without blocking and wait on it from a background thread so the
/// finished opener does not linger as a zombie.
fn spawn_detached(mut cmd: Command) -> std::io::Result<JoinHandle<()>> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;

    Ok(std::thread::spawn(move || match child.wait() {
        Ok(status) if !status.success() => log::warn!("Opener exited with {}", status),
        Ok(_) => {}
        Err(e) => log::warn!("Failed to wait for opener: {}", e),
    }))
}

impl FileOps for SystemFileOps {
    fn open(&self, path: &Path) -> Result<(), FrameToolError> {
        std::fs::metadata(path).map_err(|e| FrameToolError::from_io(path.to_path_buf(), e))?;

        log::info!("Opening {} with the default application", path.display());
        spawn_detached(Self::opener_command(path))
            .map(|_reaper| ())
            .map_err(|e| FrameToolError::Filesystem {
                path: path.to_path_buf(),
                source: e,
            })
    }

    fn delete(&self, path: &Path) -> Result<(), FrameToolError> {
        std::fs::remove_file(path).map_err(|e| FrameToolError::from_io(path.to_path_buf(), e))?;
        log::info!("Deleted {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame-1.jpg");
        std::fs::write(&path, b"jpeg").unwrap();

        SystemFileOps.delete(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_delete_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemFileOps.delete(&dir.path().join("gone.jpg"));
        assert!(matches!(result, Err(FrameToolError::NotFound(_))));
    }

    #[test]
    fn test_open_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = SystemFileOps.open(&dir.path().join("gone.jpg"));
        assert!(matches!(result, Err(FrameToolError::NotFound(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_detached_command_is_reaped() {
        let reaper = spawn_detached(Command::new("true")).unwrap();
        // the thread only finishes once wait() has collected the exit status
        reaper.join().unwrap();
    }

    #[test]
    fn test_detached_spawn_failure_is_reported() {
        let result = spawn_detached(Command::new("no-such-opener-binary"));
        assert!(result.is_err());
    }
}
