use crate::core::{CaptureHistory, FrameToolError};
use std::path::{Path, PathBuf};

/// Selection and capture history for one running instance of the app.
#[derive(Debug, Default)]
pub struct SessionState {
    pub selected_video: Option<PathBuf>,
    pub save_directory: Option<PathBuf>,
    pub records: CaptureHistory,
}

impl SessionState {
    pub fn new(save_directory: Option<PathBuf>) -> Self {
        Self {
            save_directory,
            ..Default::default()
        }
    }

    pub fn select_video(&mut self, path: PathBuf) {
        self.selected_video = Some(path);
    }

    pub fn set_save_directory(&mut self, path: PathBuf) {
        self.save_directory = Some(path);
    }

    /// The video a capture would be taken from.
    pub fn capture_source(&self) -> Result<&Path, FrameToolError> {
        self.selected_video
            .as_deref()
            .ok_or(FrameToolError::Precondition)
    }
}
