use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// Progress text such as "Capturing frame...", stays until replaced
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    shown_at: Instant,
}

/// What the status line should draw right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusPhase {
    Hidden,
    Visible,
    /// Opacity going from 1.0 to 0.0
    Fading(f32),
}

/// The single notification slot under the player.
///
/// Success messages dismiss themselves; errors and progress text stay until
/// the next message. Showing a message discards the old one together with
/// its dismissal deadline, so an earlier timer can never clear a newer message.
#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<StatusMessage>,
}

impl StatusLine {
    pub const VISIBLE_FOR: Duration = Duration::from_millis(2500);
    pub const FADE_FOR: Duration = Duration::from_millis(500);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, text: impl Into<String>, kind: StatusKind, now: Instant) {
        let text = text.into();
        match kind {
            StatusKind::Error => log::warn!("{}", text),
            _ => log::info!("{}", text),
        }
        self.current = Some(StatusMessage {
            text,
            kind,
            shown_at: now,
        });
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    pub fn phase(&self, now: Instant) -> StatusPhase {
        let Some(message) = &self.current else {
            return StatusPhase::Hidden;
        };
        if message.kind != StatusKind::Success {
            return StatusPhase::Visible;
        }

        let age = now.saturating_duration_since(message.shown_at);
        if age < Self::VISIBLE_FOR {
            StatusPhase::Visible
        } else if age < Self::VISIBLE_FOR + Self::FADE_FOR {
            let into_fade = (age - Self::VISIBLE_FOR).as_secs_f32();
            StatusPhase::Fading(1.0 - into_fade / Self::FADE_FOR.as_secs_f32())
        } else {
            StatusPhase::Hidden
        }
    }

    /// Drop the message once it has fully faded.
    pub fn tick(&mut self, now: Instant) {
        if self.current.is_some() && self.phase(now) == StatusPhase::Hidden {
            self.current = None;
        }
    }

    /// When the UI next needs a repaint to animate the message.
    pub fn next_change(&self, now: Instant) -> Option<Duration> {
        match self.phase(now) {
            StatusPhase::Fading(_) => Some(Duration::from_millis(16)),
            StatusPhase::Visible => self.current.as_ref()
                .filter(|m| m.kind == StatusKind::Success)
                .map(|m| (m.shown_at + Self::VISIBLE_FOR).saturating_duration_since(now)),
            StatusPhase::Hidden => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_fades_then_clears() {
        let start = Instant::now();
        let mut status = StatusLine::new();
        status.show("Frame saved", StatusKind::Success, start);

        assert_eq!(status.phase(start + Duration::from_millis(2400)), StatusPhase::Visible);
        match status.phase(start + Duration::from_millis(2750)) {
            StatusPhase::Fading(alpha) => assert!((alpha - 0.5).abs() < 0.01),
            other => panic!("expected fade, got {:?}", other),
        }

        status.tick(start + Duration::from_millis(3000));
        assert!(status.current().is_none());
    }

    #[test]
    fn test_errors_persist() {
        let start = Instant::now();
        let mut status = StatusLine::new();
        status.show("Error capturing frame: boom", StatusKind::Error, start);

        status.tick(start + Duration::from_secs(60));
        assert_eq!(status.phase(start + Duration::from_secs(60)), StatusPhase::Visible);
        assert_eq!(status.current().map(|m| m.kind), Some(StatusKind::Error));
        assert!(status.next_change(start).is_none());
    }

    #[test]
    fn test_new_message_cancels_previous_dismissal() {
        let start = Instant::now();
        let mut status = StatusLine::new();
        status.show("Video loaded: a.mp4", StatusKind::Success, start);
        status.show("Frame saved", StatusKind::Success, start + Duration::from_secs(2));

        // past the first message's deadline, within the second one's window
        status.tick(start + Duration::from_millis(3200));
        assert_eq!(status.current().map(|m| m.text.as_str()), Some("Frame saved"));
        assert_eq!(status.phase(start + Duration::from_millis(3200)), StatusPhase::Visible);
    }

    #[test]
    fn test_error_replacing_success_is_not_dismissed() {
        let start = Instant::now();
        let mut status = StatusLine::new();
        status.show("Save directory set", StatusKind::Success, start);
        status.show("Error deleting image", StatusKind::Error, start + Duration::from_secs(1));

        status.tick(start + Duration::from_secs(10));
        assert_eq!(status.current().map(|m| m.kind), Some(StatusKind::Error));
    }
}
