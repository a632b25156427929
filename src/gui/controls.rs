use eframe::egui;
use crate::core::format_timestamp;
use crate::video::VideoPreview;

/// Transport row under the player. Returns true when capture was clicked.
pub fn show_playback_controls(ui: &mut egui::Ui, preview: &mut VideoPreview) -> bool {
    let mut capture_clicked = false;
    let has_video = preview.video_path.is_some();

    ui.add_enabled_ui(has_video, |ui| {
        if let Some(duration) = preview.total_duration {
            let mut position = preview.current_time;
            let slider = egui::Slider::new(&mut position, 0.0..=duration)
                .show_value(false)
                .trailing_fill(true);
            let width = ui.available_width();
            ui.spacing_mut().slider_width = width;
            if ui.add(slider).changed() {
                preview.seek_to(position);
            }
        }

        ui.horizontal(|ui| {
            if ui.button("⏪ -1s").clicked() {
                preview.nudge(-VideoPreview::COARSE_STEP);
            }
            if ui.button("◀ -0.1s").clicked() {
                preview.nudge(-VideoPreview::FINE_STEP);
            }
            if ui.button(if preview.is_playing { "⏸" } else { "▶" }).clicked() {
                preview.toggle_playback();
            }
            if ui.button("+0.1s ▶").clicked() {
                preview.nudge(VideoPreview::FINE_STEP);
            }
            if ui.button("+1s ⏩").clicked() {
                preview.nudge(VideoPreview::COARSE_STEP);
            }

            ui.separator();
            let total = preview
                .total_duration
                .map(format_timestamp)
                .unwrap_or_else(|| "--:--".to_string());
            ui.monospace(format!("{} / {}", format_timestamp(preview.current_time), total));
            ui.weak(format!("({:.3}s)", preview.current_time));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("📸 Capture Frame").clicked() {
                    capture_clicked = true;
                }
            });
        });
    });

    // Keyboard: arrows nudge (shift for whole seconds), space plays/pauses
    if has_video && !ui.ctx().wants_keyboard_input() {
        ui.input(|i| {
            let step = if i.modifiers.shift { VideoPreview::COARSE_STEP } else { VideoPreview::FINE_STEP };
            if i.key_pressed(egui::Key::ArrowLeft) {
                preview.nudge(-step);
            }
            if i.key_pressed(egui::Key::ArrowRight) {
                preview.nudge(step);
            }
            if i.key_pressed(egui::Key::Space) {
                preview.toggle_playback();
            }
        });
    }

    capture_clicked
}
