mod core;
mod desktop;
mod gui;
mod video;

use eframe::egui;
use gui::FrameGrabberApp;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1000.0, 800.0])
            .with_min_inner_size([640.0, 480.0])
            .with_title("Video Dataset Tool"),
        ..Default::default()
    };

    eframe::run_native(
        "Video Dataset Tool",
        options,
        Box::new(|cc| {
            match FrameGrabberApp::new(cc) {
                Ok(app) => Ok(Box::new(app)),
                Err(e) => {
                    log::error!("Failed to initialize app: {}", e);
                    Err(e.into())
                }
            }
        }),
    ).map_err(|e| anyhow::anyhow!("Failed to run app: {}", e))?;

    Ok(())
}
