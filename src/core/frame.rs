use std::path::{Path, PathBuf};

/// An exported still image and the video offset it was taken at.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedFrame {
    pub image_path: PathBuf,
    pub timestamp: f64, // seconds from start of the video
}

impl CapturedFrame {
    pub fn new(image_path: PathBuf, timestamp: f64) -> Self {
        Self { image_path, timestamp }
    }

    pub fn file_name(&self) -> String {
        self.image_path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.image_path.display().to_string())
    }
}

/// Captured frames for the current session, newest first.
#[derive(Debug, Default, Clone)]
pub struct CaptureHistory {
    frames: Vec<CapturedFrame>,
}

impl CaptureHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert at the front. An older record with the same path is dropped so
    /// each path appears at most once.
    pub fn push_front(&mut self, frame: CapturedFrame) {
        self.frames.retain(|existing| existing.image_path != frame.image_path);
        self.frames.insert(0, frame);
    }

    pub fn remove(&mut self, image_path: &Path) -> Option<CapturedFrame> {
        let index = self.frames.iter().position(|f| f.image_path == image_path)?;
        Some(self.frames.remove(index))
    }

    pub fn get(&self, image_path: &Path) -> Option<&CapturedFrame> {
        self.frames.iter().find(|f| f.image_path == image_path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CapturedFrame> {
        self.frames.iter()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// The history section is only shown while it has something in it.
    pub fn is_visible(&self) -> bool {
        !self.is_empty()
    }
}

/// Format seconds as `M:SS`.
pub fn format_timestamp(seconds: f64) -> String {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    let minutes = (seconds / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    format!("{}:{:02}", minutes, secs)
}
