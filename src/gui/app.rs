use eframe::egui;
use crate::core::{AppConfig, SessionState};
use crate::desktop::{Dialogs, FileOps, SystemDialogs, SystemFileOps};
use crate::gui::controller::Controller;
use crate::gui::controls::show_playback_controls;
use crate::gui::frame_list_renderer::{FrameListAction, FrameListRenderer};
use crate::gui::status::{StatusKind, StatusPhase};
use crate::gui::textures::{load_texture_from_file, ThumbnailTextures};
use crate::video::{CaptureWorker, FrameExtractor, PreviewCache, VideoInfo, VideoPreview, VideoProcessor};
use std::path::PathBuf;
use std::time::{Duration, Instant};

pub struct FrameGrabberApp {
    pub config: AppConfig,
    pub controller: Controller,
    pub video_preview: VideoPreview,
    pub video_info: Option<VideoInfo>,
    capture_worker: CaptureWorker,
    preview_cache: Option<PreviewCache>,
    /// Cache key and texture of the frame currently on screen
    preview_texture: Option<(String, egui::TextureHandle)>,
    /// A newer preview than the one on screen has been requested
    preview_pending: bool,
    thumbnails: ThumbnailTextures,
    dialogs: Box<dyn Dialogs>,
    files: Box<dyn FileOps>,
}

impl FrameGrabberApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let config = AppConfig::load()?;

        let capture_worker = CaptureWorker::new(FrameExtractor::with_ffmpeg(&config))?;

        // The player still works without previews, it just shows no picture
        let preview_cache = match PreviewCache::new(config.ffmpeg_binary(), config.preview_width) {
            Ok(cache) => Some(cache),
            Err(e) => {
                log::error!("Failed to initialize preview cache: {}", e);
                None
            }
        };

        let session = SessionState::new(config.initial_save_directory());
        if let Some(ref dir) = session.save_directory {
            log::info!("Restoring last save directory: {}", dir.display());
        }

        Ok(Self {
            config,
            controller: Controller::new(session),
            video_preview: VideoPreview::new(),
            video_info: None,
            capture_worker,
            preview_cache,
            preview_texture: None,
            preview_pending: false,
            thumbnails: ThumbnailTextures::default(),
            dialogs: Box::new(SystemDialogs),
            files: Box::new(SystemFileOps),
        })
    }

    fn select_video(&mut self) {
        let Some(path) = self.controller.select_video(self.dialogs.as_ref(), Instant::now()) else {
            return;
        };
        self.load_video(path);
    }

    fn load_video(&mut self, path: PathBuf) {
        self.video_info = match VideoProcessor::get_video_info(&self.config.ffprobe_binary(), &path) {
            Ok(info) => {
                log::info!("Loaded {} ({}x{}, duration {:?})",
                    path.display(), info.width, info.height, info.duration);
                Some(info)
            }
            Err(e) => {
                log::warn!("Failed to probe {}: {}", path.display(), e);
                None
            }
        };

        let duration = self.video_info.as_ref().and_then(|info| info.duration);
        self.video_preview.set_video(path, duration);
        self.preview_texture = None;
        if let Some(cache) = &self.preview_cache {
            if let Err(e) = cache.clear() {
                log::warn!("Failed to clear preview cache: {}", e);
            }
        }
    }

    fn select_directory(&mut self) {
        let Some(dir) = self.controller.select_directory(self.dialogs.as_ref(), Instant::now()) else {
            return;
        };
        self.config.last_save_directory = Some(dir);
        if let Err(e) = self.config.save() {
            log::warn!("Failed to remember save directory: {}", e);
        }
    }

    fn capture_current_frame(&mut self) {
        let position = self.video_preview.capture_time();
        if let Some(request) = self.controller.request_capture(position, Instant::now()) {
            self.capture_worker.submit(request);
        }
    }

    fn process_capture_results(&mut self) {
        for outcome in self.capture_worker.drain_completed() {
            self.controller.complete_capture(outcome, Instant::now());
        }
    }

    fn handle_list_action(&mut self, action: FrameListAction) {
        let now = Instant::now();
        match action {
            FrameListAction::View(path) => self.controller.view(&path, self.files.as_ref(), now),
            FrameListAction::Delete(path) => {
                if self.controller.delete(&path, self.files.as_ref(), now) {
                    self.thumbnails.forget(&path);
                }
            }
        }
    }

    /// Ask for the preview at the current position and swap it in once rendered.
    fn refresh_preview(&mut self, ctx: &egui::Context) {
        self.preview_pending = false;
        let (Some(cache), Some(video_path)) = (&self.preview_cache, &self.video_preview.video_path) else {
            return;
        };

        let key = cache.request_preview(video_path, self.video_preview.preview_time());
        if self.preview_texture.as_ref().map_or(false, |(loaded, _)| *loaded == key) {
            return;
        }

        match cache.get_preview_path(&key) {
            Some(path) => match load_texture_from_file(ctx, "video_preview", &path, None) {
                Ok(texture) => self.preview_texture = Some((key, texture)),
                Err(e) => log::warn!("Failed to load preview: {}", e),
            },
            None => self.preview_pending = cache.is_pending(&key),
        }
    }

    fn show_player(&mut self, ui: &mut egui::Ui) {
        let controls_height = 70.0;
        let available = (ui.available_size() - egui::vec2(0.0, controls_height)).max(egui::Vec2::ZERO);
        let mut open_clicked = false;

        ui.allocate_ui(available, |ui| {
            ui.centered_and_justified(|ui| match &self.preview_texture {
                Some((_, texture)) => {
                    ui.add(egui::Image::new(texture).shrink_to_fit());
                }
                None if self.video_preview.video_path.is_some() => {
                    ui.spinner();
                }
                None => {
                    ui.vertical_centered(|ui| {
                        ui.heading("Video Dataset Tool");
                        ui.label("Open a video, scrub to a moment and capture the frame.");
                        ui.add_space(20.0);
                        open_clicked = ui.button("📂 Select Video").clicked();
                    });
                }
            });
        });

        if open_clicked {
            self.select_video();
        }

        ui.separator();
        if show_playback_controls(ui, &mut self.video_preview) {
            self.capture_current_frame();
        }
    }

    fn show_status(&self, ui: &mut egui::Ui, now: Instant) {
        let Some(message) = self.controller.status.current() else {
            ui.label("Ready");
            return;
        };

        let base = match message.kind {
            StatusKind::Info => ui.visuals().text_color(),
            StatusKind::Success => egui::Color32::from_rgb(90, 200, 120),
            StatusKind::Error => egui::Color32::from_rgb(230, 90, 90),
        };
        let color = match self.controller.status.phase(now) {
            StatusPhase::Hidden => return,
            StatusPhase::Visible => base,
            StatusPhase::Fading(alpha) => base.gamma_multiply(alpha),
        };
        ui.label(egui::RichText::new(&message.text).color(color));
    }
}

impl eframe::App for FrameGrabberApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.process_capture_results();
        self.controller.status.tick(now);
        self.video_preview.update(now);
        self.refresh_preview(ctx);

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                if ui.button("📂 Select Video").clicked() {
                    self.select_video();
                }
                if ui.button("📁 Select Save Directory").clicked() {
                    self.select_directory();
                }
            });

            ui.horizontal(|ui| {
                ui.label("Video:");
                match &self.controller.session.selected_video {
                    Some(path) => ui.label(path.display().to_string()),
                    None => ui.weak("none"),
                };
            });
            ui.horizontal(|ui| {
                ui.label("Save to:");
                match &self.controller.session.save_directory {
                    Some(dir) => ui.label(dir.display().to_string()),
                    None => ui.weak(format!("{} (default)", crate::video::pictures_dir().display())),
                };
            });
        });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                self.show_status(ui, now);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let in_flight = self.capture_worker.in_flight();
                    if in_flight > 0 {
                        ui.spinner();
                        ui.label(format!("{} capture(s) running", in_flight));
                    }
                });
            });
        });

        if self.controller.session.records.is_visible() {
            let mut action = None;
            egui::SidePanel::right("captured_frames")
                .default_width(360.0)
                .min_width(260.0)
                .show(ctx, |ui| {
                    action = FrameListRenderer::render(ui, &self.controller.session.records, &mut self.thumbnails);
                });
            if let Some(action) = action {
                self.handle_list_action(action);
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_player(ui);
        });

        // Keep animating while something is moving or pending
        if self.video_preview.is_playing || self.capture_worker.in_flight() > 0 || self.preview_pending {
            ctx.request_repaint_after(Duration::from_millis(33));
        } else if let Some(wait) = self.controller.status.next_change(now) {
            ctx.request_repaint_after(wait);
        } else {
            ctx.request_repaint_after(Duration::from_millis(250));
        }
    }
}
