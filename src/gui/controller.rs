use crate::core::{CapturedFrame, FrameToolError, SessionState};
use crate::desktop::{Dialogs, FileOps};
use crate::gui::status::{StatusKind, StatusLine};
use crate::video::{generated_name, CaptureOutcome, CaptureRequest};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Turns user actions into extraction requests and OS calls, and keeps the
/// session state and status line in step with their results.
///
/// Nothing here touches egui, so every action can be driven directly.
pub struct Controller {
    pub session: SessionState,
    pub status: StatusLine,
    next_request_id: u64,
}

impl Controller {
    pub fn new(session: SessionState) -> Self {
        Self {
            session,
            status: StatusLine::new(),
            next_request_id: 0,
        }
    }

    fn start_dir(&self) -> Option<PathBuf> {
        self.session
            .selected_video
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
    }

    /// Returns the newly selected video so the player can load it.
    pub fn select_video(&mut self, dialogs: &dyn Dialogs, now: Instant) -> Option<PathBuf> {
        match dialogs.pick_video(self.start_dir().as_deref()) {
            Ok(path) => {
                self.session.select_video(path.clone());
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                self.status.show(format!("Video loaded: {}", name), StatusKind::Success, now);
                Some(path)
            }
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                self.status.show(format!("Error loading video: {}", e), StatusKind::Error, now);
                None
            }
        }
    }

    pub fn select_directory(&mut self, dialogs: &dyn Dialogs, now: Instant) -> Option<PathBuf> {
        let start = self.session.save_directory.clone();
        match dialogs.pick_directory(start.as_deref()) {
            Ok(dir) => {
                self.session.set_save_directory(dir.clone());
                self.status.show(format!("Save directory set: {}", dir.display()), StatusKind::Success, now);
                Some(dir)
            }
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                self.status.show(format!("Error selecting directory: {}", e), StatusKind::Error, now);
                None
            }
        }
    }

    /// Build a capture of the frame at `position`, or report why not.
    pub fn request_capture(&mut self, position: f64, now: Instant) -> Option<CaptureRequest> {
        let video_path = match self.session.capture_source() {
            Ok(path) => path.to_path_buf(),
            Err(e) => {
                self.status.show(e.to_string(), StatusKind::Error, now);
                return None;
            }
        };

        self.next_request_id += 1;
        self.status.show("Capturing frame...", StatusKind::Info, now);

        Some(CaptureRequest {
            id: self.next_request_id,
            video_path,
            timestamp: position,
            output_dir: self.session.save_directory.clone(),
            filename: Some(generated_name()),
        })
    }

    pub fn complete_capture(&mut self, outcome: CaptureOutcome, now: Instant) {
        match outcome.result {
            Ok(image_path) => {
                self.status.show(format!("Frame saved to: {}", image_path.display()), StatusKind::Success, now);
                self.session
                    .records
                    .push_front(CapturedFrame::new(image_path, outcome.request.timestamp));
            }
            Err(e) => {
                let e = FrameToolError::from(e);
                self.status.show(format!("Error capturing frame: {}", e), StatusKind::Error, now);
            }
        }
    }

    pub fn view(&mut self, image_path: &Path, files: &dyn FileOps, now: Instant) {
        if let Err(e) = files.open(image_path) {
            self.status.show(format!("Error opening image: {}", e), StatusKind::Error, now);
        }
    }

    /// Delete the image and, only if that worked, its record.
    pub fn delete(&mut self, image_path: &Path, files: &dyn FileOps, now: Instant) -> bool {
        match files.delete(image_path) {
            Ok(()) => {
                let removed = self.session.records.remove(image_path);
                let name = removed
                    .map(|frame| frame.file_name())
                    .unwrap_or_else(|| image_path.display().to_string());
                self.status.show(format!("Image deleted: {}", name), StatusKind::Success, now);
                if self.session.records.is_empty() {
                    log::debug!("Capture history is empty, hiding it");
                }
                true
            }
            Err(e) => {
                self.status.show(format!("Error deleting image: {}", e), StatusKind::Error, now);
                false
            }
        }
    }
}
