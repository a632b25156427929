use crate::core::{FrameToolError, VIDEO_EXTENSIONS};
use std::path::{Path, PathBuf};

/// Native pickers. Dismissing one yields [`FrameToolError::SelectionCancelled`].
pub trait Dialogs {
    fn pick_video(&self, start_dir: Option<&Path>) -> Result<PathBuf, FrameToolError>;
    fn pick_directory(&self, start_dir: Option<&Path>) -> Result<PathBuf, FrameToolError>;
}

pub struct SystemDialogs;

impl Dialogs for SystemDialogs {
    fn pick_video(&self, start_dir: Option<&Path>) -> Result<PathBuf, FrameToolError> {
        let mut dialog = rfd::FileDialog::new()
            .set_title("Select a video")
            .add_filter("Videos", &VIDEO_EXTENSIONS);
        if let Some(dir) = start_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_file().ok_or(FrameToolError::SelectionCancelled)
    }

    fn pick_directory(&self, start_dir: Option<&Path>) -> Result<PathBuf, FrameToolError> {
        let mut dialog = rfd::FileDialog::new().set_title("Select a save directory");
        if let Some(dir) = start_dir {
            dialog = dialog.set_directory(dir);
        }
        dialog.pick_folder().ok_or(FrameToolError::SelectionCancelled)
    }
}
