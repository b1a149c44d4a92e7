use eframe::egui::{Color32, RichText, Ui};

use crate::config::rc_params::RcParams;
use crate::figure::Figure;

// ---------------------------------------------------------------------------
// Top panel – figure title
// ---------------------------------------------------------------------------

/// Render the figure title. Nothing is drawn for an empty title.
pub fn title_bar(ui: &mut Ui, figure: &Figure, rc: &RcParams) {
    if figure.title.is_empty() {
        return;
    }
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(RichText::new(&figure.title).size(rc.title_size).strong());
    });
}

// ---------------------------------------------------------------------------
// Bottom panel – status line
// ---------------------------------------------------------------------------

/// Series count plus the last export message, if any.
pub fn status_bar(ui: &mut Ui, figure: &Figure, status: Option<&str>) {
    ui.horizontal(|ui: &mut Ui| {
        let n_points: usize = figure.series.iter().map(|s| s.points.len()).sum();
        let listing: Vec<String> = figure
            .series
            .iter()
            .map(|s| format!("{}: {} vs {}", s.file, s.y_key, s.x_key))
            .collect();
        ui.label(format!(
            "{} series, {} points",
            figure.series.len(),
            n_points
        ))
        .on_hover_text(listing.join("\n"));

        if let Some(msg) = status {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
