//! PNG export of the rendered window.

use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::ColorImage;
use image::RgbaImage;

/// Write a viewport screenshot to `path` as PNG.
pub fn save_png(image: &ColorImage, path: &Path) -> Result<()> {
    let [width, height] = image.size;
    let bytes: Vec<u8> = image
        .pixels
        .iter()
        .flat_map(|c| c.to_srgba_unmultiplied())
        .collect();

    let buffer = RgbaImage::from_raw(width as u32, height as u32, bytes)
        .context("screenshot size does not match its pixel data")?;
    buffer
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
