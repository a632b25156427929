use eframe::egui;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Decode an image file into an egui texture, shrinking it to fit
/// `max_size` on its longer side when given.
pub fn load_texture_from_file(
    ctx: &egui::Context,
    name: &str,
    path: &Path,
    max_size: Option<u32>,
) -> anyhow::Result<egui::TextureHandle> {
    let mut image = image::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to decode {}: {}", path.display(), e))?;
    if let Some(max) = max_size {
        if image.width() > max || image.height() > max {
            image = image.thumbnail(max, max);
        }
    }

    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    Ok(ctx.load_texture(name, color_image, egui::TextureOptions::LINEAR))
}

/// Small textures for the capture history, one per exported image.
#[derive(Default)]
pub struct ThumbnailTextures {
    textures: HashMap<PathBuf, egui::TextureHandle>,
    failed: HashMap<PathBuf, String>,
}

impl ThumbnailTextures {
    pub const MAX_SIZE: u32 = 160;

    pub fn get_or_load(&mut self, ctx: &egui::Context, path: &Path) -> Option<egui::TextureHandle> {
        if let Some(texture) = self.textures.get(path) {
            return Some(texture.clone());
        }
        if self.failed.contains_key(path) {
            return None;
        }

        match load_texture_from_file(ctx, &path.display().to_string(), path, Some(Self::MAX_SIZE)) {
            Ok(texture) => {
                self.textures.insert(path.to_path_buf(), texture.clone());
                Some(texture)
            }
            Err(e) => {
                log::warn!("{}", e);
                self.failed.insert(path.to_path_buf(), e.to_string());
                None
            }
        }
    }

    pub fn forget(&mut self, path: &Path) {
        self.textures.remove(path);
        self.failed.remove(path);
    }
}
