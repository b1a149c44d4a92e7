use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::config::style::SeriesStyle;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.45);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// One colour per series: the style's fixed colour if it names one,
/// otherwise a distinct hue per series in drawing order.
pub fn series_colors(style: &SeriesStyle, n: usize) -> Vec<Color32> {
    match style.color {
        Some(named) => {
            let [r, g, b] = named.rgb();
            vec![Color32::from_rgb(r, g, b); n]
        }
        None => generate_palette(n),
    }
}
