use std::path::PathBuf;
use std::time::Instant;

/// Playback position of the loaded video.
///
/// There is no decoder behind this: while playing, the position follows the
/// wall clock and the player shows the preview frame nearest to it.
pub struct VideoPreview {
    pub current_time: f64,
    pub is_playing: bool,
    pub total_duration: Option<f64>,
    pub video_path: Option<PathBuf>,
    last_tick: Option<Instant>,
}

impl VideoPreview {
    /// Step sizes of the nudge buttons, in seconds.
    pub const FINE_STEP: f64 = 0.1;
    pub const COARSE_STEP: f64 = 1.0;

    pub fn new() -> Self {
        Self {
            current_time: 0.0,
            is_playing: false,
            total_duration: None,
            video_path: None,
            last_tick: None,
        }
    }

    pub fn set_video(&mut self, video_path: PathBuf, duration: Option<f64>) {
        self.pause();
        self.video_path = Some(video_path);
        self.total_duration = duration;
        self.current_time = 0.0;
    }

    fn clamp(&self, time: f64) -> f64 {
        let time = time.max(0.0);
        match self.total_duration {
            Some(duration) => time.min(duration),
            None => time,
        }
    }

    pub fn seek_to(&mut self, time: f64) {
        self.current_time = self.clamp(time);
    }

    /// Step by `delta` seconds; playback stops first so the shown frame holds.
    pub fn nudge(&mut self, delta: f64) {
        if self.is_playing {
            self.pause();
        }
        self.seek_to(self.current_time + delta);
    }

    pub fn play(&mut self) {
        if self.video_path.is_none() || self.is_playing {
            return;
        }
        if let Some(duration) = self.total_duration {
            if self.current_time >= duration {
                self.current_time = 0.0;
            }
        }
        self.is_playing = true;
        self.last_tick = None;
        log::debug!("Playback started at {:.3}s", self.current_time);
    }

    pub fn pause(&mut self) {
        if self.is_playing {
            log::debug!("Playback paused at {:.3}s", self.current_time);
        }
        self.is_playing = false;
        self.last_tick = None;
    }

    pub fn toggle_playback(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Advance the position by the time elapsed since the last call.
    pub fn update(&mut self, now: Instant) {
        if !self.is_playing {
            return;
        }
        if let Some(last) = self.last_tick {
            let elapsed = now.saturating_duration_since(last).as_secs_f64();
            self.seek_to(self.current_time + elapsed);
            if let Some(duration) = self.total_duration {
                if self.current_time >= duration {
                    self.pause();
                    return;
                }
            }
        }
        self.last_tick = Some(now);
    }

    /// Time of the frame the player shows. Exact while paused; during
    /// playback it is snapped to the preview grid to bound the renders.
    pub fn preview_time(&self) -> f64 {
        if self.is_playing {
            (self.current_time / Self::FINE_STEP).round() * Self::FINE_STEP
        } else {
            self.current_time
        }
    }

    /// Timestamp a capture should use: the frame being displayed.
    pub fn capture_time(&self) -> f64 {
        self.preview_time()
    }
}

impl Default for VideoPreview {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn loaded(duration: Option<f64>) -> VideoPreview {
        let mut preview = VideoPreview::new();
        preview.set_video(PathBuf::from("sample.mp4"), duration);
        preview
    }

    #[test]
    fn test_nudge_clamps_to_bounds() {
        let mut preview = loaded(Some(10.0));
        preview.nudge(-VideoPreview::COARSE_STEP);
        assert_eq!(preview.current_time, 0.0);

        preview.seek_to(9.95);
        preview.nudge(VideoPreview::FINE_STEP);
        assert_eq!(preview.current_time, 10.0);
    }

    #[test]
    fn test_nudge_pauses_playback() {
        let mut preview = loaded(Some(10.0));
        preview.play();
        assert!(preview.is_playing);

        preview.nudge(VideoPreview::COARSE_STEP);
        assert!(!preview.is_playing);
        assert_eq!(preview.current_time, 1.0);
    }

    #[test]
    fn test_unknown_duration_only_clamps_below() {
        let mut preview = loaded(None);
        preview.seek_to(500.0);
        assert_eq!(preview.current_time, 500.0);
        preview.seek_to(-1.0);
        assert_eq!(preview.current_time, 0.0);
    }

    #[test]
    fn test_playback_follows_clock_and_stops_at_end() {
        let mut preview = loaded(Some(2.0));
        let start = Instant::now();
        preview.play();
        preview.update(start);
        preview.update(start + Duration::from_millis(1500));
        assert!((preview.current_time - 1.5).abs() < 1e-9);

        preview.update(start + Duration::from_secs(5));
        assert_eq!(preview.current_time, 2.0);
        assert!(!preview.is_playing);
    }

    #[test]
    fn test_play_without_video_does_nothing() {
        let mut preview = VideoPreview::new();
        preview.play();
        assert!(!preview.is_playing);
    }

    #[test]
    fn test_preview_time_snaps_to_grid_while_playing() {
        let mut preview = loaded(Some(60.0));
        preview.seek_to(12.46);
        preview.play();
        assert!((preview.preview_time() - 12.5).abs() < 1e-9);
        assert_eq!(preview.capture_time(), preview.preview_time());
    }

    #[test]
    fn test_paused_capture_matches_displayed_frame() {
        let mut preview = loaded(Some(60.0));
        preview.seek_to(12.46);

        assert_eq!(preview.preview_time(), 12.46);
        assert_eq!(preview.capture_time(), preview.preview_time());
        assert_eq!(format!("{:.3}", preview.capture_time()), "12.460");
    }
}
