//! Single-frame extraction: resolve where the image goes, ask the media
//! backend to write it, and report the path or the backend's complaint.

use crate::core::{AppConfig, ExtractionError};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Something that can write one still frame of a video to disk.
pub trait FrameBackend: Send + Sync {
    fn capture(&self, video_path: &Path, timestamp: f64, output_path: &Path) -> Result<(), ExtractionError>;
}

/// Captures frames by shelling out to the `ffmpeg` executable.
#[derive(Debug, Clone)]
pub struct FfmpegBackend {
    ffmpeg: PathBuf,
    jpeg_quality: u8,
}

impl FfmpegBackend {
    pub fn new(ffmpeg: PathBuf, jpeg_quality: u8) -> Self {
        Self {
            ffmpeg,
            jpeg_quality: jpeg_quality.clamp(2, 31),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.ffmpeg_binary(), config.jpeg_quality)
    }

    /// One frame at `timestamp`, no scaling, overwriting `output_path`.
    pub fn build_command(&self, video_path: &Path, timestamp: f64, output_path: &Path) -> Command {
        let mut cmd = Command::new(&self.ffmpeg);
        cmd.arg("-hide_banner")
            .arg("-loglevel").arg("error")
            .arg("-ss").arg(format!("{:.3}", timestamp))
            .arg("-i").arg(video_path)
            .arg("-frames:v").arg("1")
            .arg("-q:v").arg(self.jpeg_quality.to_string())
            .arg("-y")
            .arg(output_path);
        cmd
    }
}

impl FrameBackend for FfmpegBackend {
    fn capture(&self, video_path: &Path, timestamp: f64, output_path: &Path) -> Result<(), ExtractionError> {
        let command = self.build_command(video_path, timestamp, output_path);
        let output = crate::video::execute_ffmpeg(command)
            .map_err(|e| ExtractionError::new(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let message = stderr.trim();
            return Err(ExtractionError::new(if message.is_empty() {
                format!("ffmpeg exited with {}", output.status)
            } else {
                message.to_string()
            }));
        }

        // ffmpeg exits cleanly when seeking past the end, it just encodes nothing
        if !output_path.exists() {
            return Err(ExtractionError::new(format!(
                "No frame was written at {:.3}s (is the timestamp past the end of the video?)",
                timestamp
            )));
        }

        Ok(())
    }
}

static LAST_NAME_TOKEN: AtomicI64 = AtomicI64::new(0);

/// Millisecond wall-clock token, bumped so that no two calls in this process
/// ever return the same value.
fn next_name_token() -> i64 {
    let now = chrono::Utc::now().timestamp_millis();
    let mut last = LAST_NAME_TOKEN.load(Ordering::SeqCst);
    loop {
        let next = now.max(last + 1);
        match LAST_NAME_TOKEN.compare_exchange(last, next, Ordering::SeqCst, Ordering::SeqCst) {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// `frame-<token>.jpg`
pub fn generated_name() -> String {
    format!("frame-{}.jpg", next_name_token())
}

/// Where exports go when no save directory was chosen.
pub fn pictures_dir() -> PathBuf {
    dirs::picture_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

pub fn resolve_output_path(output_directory: Option<&Path>, filename: Option<&str>) -> PathBuf {
    let directory = output_directory
        .map(Path::to_path_buf)
        .unwrap_or_else(pictures_dir);
    let filename = filename
        .map(str::to_string)
        .unwrap_or_else(generated_name);
    directory.join(filename)
}

#[derive(Clone)]
pub struct FrameExtractor {
    backend: Arc<dyn FrameBackend>,
}

impl FrameExtractor {
    pub fn new(backend: Arc<dyn FrameBackend>) -> Self {
        Self { backend }
    }

    pub fn with_ffmpeg(config: &AppConfig) -> Self {
        Self::new(Arc::new(FfmpegBackend::from_config(config)))
    }

    /// Export the frame at `timestamp` seconds and return where it was written.
    ///
    /// Neither the video nor the timestamp is checked up front; whatever the
    /// backend rejects comes back as an [`ExtractionError`]. The backend writes
    /// to a sibling partial file that is renamed into place only on success,
    /// so a failure never creates or alters anything at the output path.
    pub fn extract_frame(
        &self,
        video_path: &Path,
        timestamp: f64,
        output_directory: Option<&Path>,
        filename: Option<&str>,
    ) -> Result<PathBuf, ExtractionError> {
        let output_path = resolve_output_path(output_directory, filename);
        let partial_path = partial_path_for(&output_path);

        log::info!("Extracting frame at {:.3}s from {} to {}",
            timestamp, video_path.display(), output_path.display());

        let result = self.backend
            .capture(video_path, timestamp, &partial_path)
            .and_then(|()| {
                std::fs::rename(&partial_path, &output_path).map_err(|e| ExtractionError::new(format!(
                    "Failed to move frame into {}: {}", output_path.display(), e)))
            });

        match result {
            Ok(()) => {
                log::info!("Frame saved to {}", output_path.display());
                Ok(output_path)
            }
            Err(e) => {
                log::error!("Frame extraction failed for {} at {:.3}s: {}",
                    video_path.display(), timestamp, e);
                if partial_path.exists() {
                    if let Err(remove_err) = std::fs::remove_file(&partial_path) {
                        log::warn!("Failed to remove partial output {}: {}",
                            partial_path.display(), remove_err);
                    }
                }
                Err(e)
            }
        }
    }
}

/// `dir/.name.partial.ext`, keeping the extension so FFmpeg picks the same encoder.
fn partial_path_for(output_path: &Path) -> PathBuf {
    let stem = output_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    let extension = output_path
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "jpg".to_string());
    output_path.with_file_name(format!(".{}.partial.{}", stem, extension))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Writes a small JPEG for any timestamp inside `duration`.
    struct FakeBackend {
        duration: f64,
    }

    impl FrameBackend for FakeBackend {
        fn capture(&self, _video_path: &Path, timestamp: f64, output_path: &Path) -> Result<(), ExtractionError> {
            if timestamp < 0.0 || timestamp > self.duration {
                // leave a truncated file behind the way a dying encoder might
                std::fs::write(output_path, b"partial").map_err(|e| ExtractionError::new(e.to_string()))?;
                return Err(ExtractionError::new("Invalid timestamp"));
            }
            image::RgbImage::new(8, 6)
                .save(output_path)
                .map_err(|e| ExtractionError::new(e.to_string()))
        }
    }

    fn extractor(duration: f64) -> FrameExtractor {
        FrameExtractor::new(Arc::new(FakeBackend { duration }))
    }

    #[test]
    fn test_accepted_timestamp_produces_readable_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = extractor(30.0)
            .extract_frame(Path::new("sample.mp4"), 12.5, Some(dir.path()), None)
            .unwrap();

        assert!(path.starts_with(dir.path()));
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 6));
    }

    #[test]
    fn test_rejected_timestamp_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = extractor(30.0)
            .extract_frame(Path::new("sample.mp4"), 45.0, Some(dir.path()), Some("late.jpg"));

        assert_eq!(result, Err(ExtractionError::new("Invalid timestamp")));
        assert!(!dir.path().join("late.jpg").exists());
    }

    #[test]
    fn test_failed_capture_keeps_existing_file_intact() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join("cover.jpg");
        std::fs::write(&existing, b"earlier export").unwrap();

        let result = extractor(30.0)
            .extract_frame(Path::new("sample.mp4"), 99.0, Some(dir.path()), Some("cover.jpg"));

        assert!(result.is_err());
        assert_eq!(std::fs::read(&existing).unwrap(), b"earlier export");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_partial_path_keeps_extension_beside_output() {
        let partial = partial_path_for(Path::new("/out/frame-7.jpg"));
        assert_eq!(partial, PathBuf::from("/out/.frame-7.partial.jpg"));
    }

    #[test]
    fn test_explicit_filename_is_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = extractor(10.0)
            .extract_frame(Path::new("sample.mp4"), 1.0, Some(dir.path()), Some("cover.jpg"))
            .unwrap();

        assert_eq!(path, dir.path().join("cover.jpg"));
    }

    #[test]
    fn test_default_output_under_pictures_dir_with_jpg_extension() {
        let path = resolve_output_path(None, None);

        assert!(path.starts_with(pictures_dir()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("jpg"));
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("frame-"));
    }

    #[test]
    fn test_generated_names_never_repeat() {
        let names: HashSet<String> = (0..500).map(|_| generated_name()).collect();
        assert_eq!(names.len(), 500);
    }

    #[test]
    fn test_ffmpeg_command_requests_single_full_size_frame() {
        let backend = FfmpegBackend::new(PathBuf::from("ffmpeg"), 2);
        let cmd = backend.build_command(Path::new("/videos/sample.mp4"), 12.5, Path::new("/out/frame.jpg"));

        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(cmd.get_program(), "ffmpeg");
        assert!(args.windows(2).any(|w| w == ["-ss", "12.500"]));
        assert!(args.windows(2).any(|w| w == ["-i", "/videos/sample.mp4"]));
        assert!(args.windows(2).any(|w| w == ["-frames:v", "1"]));
        assert!(!args.iter().any(|a| a == "-vf"));
        assert_eq!(args.last().map(String::as_str), Some("/out/frame.jpg"));
    }

    #[test]
    fn test_quality_is_clamped_to_ffmpeg_range() {
        let backend = FfmpegBackend::new(PathBuf::from("ffmpeg"), 0);
        let cmd = backend.build_command(Path::new("in.mp4"), 0.0, Path::new("out.jpg"));
        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().into_owned()).collect();
        assert!(args.windows(2).any(|w| w == ["-q:v", "2"]));
    }

    #[test]
    fn test_missing_ffmpeg_is_an_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FfmpegBackend::new(PathBuf::from("no-such-ffmpeg-binary-here"), 2);
        let result = FrameExtractor::new(Arc::new(backend))
            .extract_frame(Path::new("sample.mp4"), 1.0, Some(dir.path()), Some("x.jpg"));

        assert!(result.is_err());
        assert!(!dir.path().join("x.jpg").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_clean_exit_without_output_is_an_error() {
        // `true` exits 0 and writes nothing, like ffmpeg seeking past the end
        let dir = tempfile::tempdir().unwrap();
        let backend = FfmpegBackend::new(PathBuf::from("true"), 2);
        let result = FrameExtractor::new(Arc::new(backend))
            .extract_frame(Path::new("sample.mp4"), 120.0, Some(dir.path()), Some("end.jpg"));

        let err = result.unwrap_err();
        assert!(err.message.starts_with("No frame was written at 120.000s"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_reports_status_when_stderr_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FfmpegBackend::new(PathBuf::from("false"), 2);
        let err = backend
            .capture(Path::new("sample.mp4"), 1.0, &dir.path().join("x.jpg"))
            .unwrap_err();

        assert!(err.message.starts_with("ffmpeg exited with"));
        assert!(!dir.path().join("x.jpg").exists());
    }
}
