use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by the media backend while producing a frame.
///
/// Carries the backend's diagnostic verbatim so it can be shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ExtractionError {
    pub message: String,
}

impl ExtractionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum FrameToolError {
    /// The user dismissed a dialog without choosing anything.
    #[error("Selection cancelled")]
    SelectionCancelled,
    #[error("Please select a video first")]
    Precondition,
    #[error("{0}")]
    Extraction(#[from] ExtractionError),
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("{}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FrameToolError {
    /// Classify an I/O failure on `path`, keeping "not found" distinct.
    pub fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            FrameToolError::NotFound(path)
        } else {
            FrameToolError::Filesystem { path, source }
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, FrameToolError::SelectionCancelled)
    }
}
