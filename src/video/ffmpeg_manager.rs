use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use anyhow::Result;

/// Runs FFmpeg/FFprobe child processes and keeps count of how many are live.
///
/// Captures are never throttled here: concurrent requests each get their own
/// process. The count only feeds the log and the status bar.
pub struct FFmpegManager {
    active_count: AtomicUsize,
}

/// Decrements the active count when the process finishes, even on error.
struct ActiveGuard<'a>(&'a AtomicUsize);

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl FFmpegManager {
    pub fn new() -> Self {
        Self {
            active_count: AtomicUsize::new(0),
        }
    }

    /// Run `command` to completion and collect its output.
    pub fn execute(&self, mut command: Command) -> Result<Output> {
        let active = self.active_count.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = ActiveGuard(&self.active_count);

        log::debug!("Spawning {:?}, active processes: {}", command.get_program(), active);

        let result = command.output();

        log::debug!("{:?} finished, active processes: {}",
            command.get_program(),
            self.active_count.load(Ordering::SeqCst).saturating_sub(1));

        result.map_err(|e| anyhow::anyhow!("Failed to run {}: {}",
            command.get_program().to_string_lossy(), e))
    }

    pub fn active_count(&self) -> usize {
        self.active_count.load(Ordering::SeqCst)
    }
}

impl Default for FFmpegManager {
    fn default() -> Self {
        Self::new()
    }
}

static FFMPEG_MANAGER: std::sync::OnceLock<FFmpegManager> = std::sync::OnceLock::new();

pub fn get_ffmpeg_manager() -> &'static FFmpegManager {
    FFMPEG_MANAGER.get_or_init(FFmpegManager::new)
}

/// Run a command through the shared manager.
pub fn execute_ffmpeg(command: Command) -> Result<Output> {
    get_ffmpeg_manager().execute(command)
}
