use eframe::egui;
use crate::core::{format_timestamp, CaptureHistory, CapturedFrame};
use crate::gui::textures::ThumbnailTextures;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum FrameListAction {
    View(PathBuf),
    Delete(PathBuf),
}

pub struct FrameListRenderer;

impl FrameListRenderer {
    /// Draw the capture history; returns at most one action per frame.
    pub fn render(
        ui: &mut egui::Ui,
        history: &CaptureHistory,
        thumbnails: &mut ThumbnailTextures,
    ) -> Option<FrameListAction> {
        let mut action = None;

        ui.heading(format!("Captured Frames ({})", history.len()));
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (index, frame) in history.iter().enumerate() {
                    if let Some(clicked) = Self::render_frame_item(ui, frame, index, thumbnails) {
                        action = Some(clicked);
                    }
                    ui.add_space(4.0);
                }
            });

        action
    }

    fn render_frame_item(
        ui: &mut egui::Ui,
        frame: &CapturedFrame,
        index: usize,
        thumbnails: &mut ThumbnailTextures,
    ) -> Option<FrameListAction> {
        let mut action = None;

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.push_id(index, |ui| {
                ui.horizontal(|ui| {
                    match thumbnails.get_or_load(ui.ctx(), &frame.image_path) {
                        Some(texture) => {
                            ui.add(egui::Image::new(&texture).max_width(ThumbnailTextures::MAX_SIZE as f32));
                        }
                        None => {
                            ui.label("🖼 (no preview)");
                        }
                    }

                    ui.vertical(|ui| {
                        ui.label(format!("Time: {}", format_timestamp(frame.timestamp)));
                        ui.label(format!("Path: {}", frame.image_path.display()));
                        ui.horizontal(|ui| {
                            if ui.button("View").clicked() {
                                action = Some(FrameListAction::View(frame.image_path.clone()));
                            }
                            if ui.button("🗑 Delete").clicked() {
                                action = Some(FrameListAction::Delete(frame.image_path.clone()));
                            }
                        });
                    });
                });
            });
        });

        action
    }
}
