use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use eframe::egui;

use crate::config::rc_params::RcParams;
use crate::figure::Figure;
use crate::ui::{export, panels, plot};

/// Frames to render before capturing, so the plot has laid out its bounds.
const FRAMES_BEFORE_CAPTURE: u32 = 3;

/// Outcome of a `--save` run, read back by `main` after the window closes.
pub type SaveOutcome = Arc<Mutex<Option<Result<(), String>>>>;

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct StarplotApp {
    figure: Figure,
    rc: RcParams,
    save: Option<SaveRequest>,
    status_message: Option<String>,
}

struct SaveRequest {
    path: PathBuf,
    frames_rendered: u32,
    requested: bool,
    outcome: SaveOutcome,
}

impl StarplotApp {
    pub fn new(figure: Figure, rc: RcParams) -> Self {
        Self {
            figure,
            rc,
            save: None,
            status_message: None,
        }
    }

    /// Capture the first settled frame to `path`, then close the window.
    pub fn with_save(mut self, path: PathBuf, outcome: SaveOutcome) -> Self {
        self.save = Some(SaveRequest {
            path,
            frames_rendered: 0,
            requested: false,
            outcome,
        });
        self
    }

    fn drive_save(&mut self, ctx: &egui::Context) {
        let Some(save) = &mut self.save else {
            return;
        };

        let screenshot = ctx.input(|i| {
            i.raw.events.iter().find_map(|e| match e {
                egui::Event::Screenshot { image, .. } => Some(image.clone()),
                _ => None,
            })
        });

        if let Some(image) = screenshot {
            let result =
                export::save_png(&image, &save.path).map_err(|e| format!("{e:#}"));
            match &result {
                Ok(()) => log::info!("Saved figure to {}", save.path.display()),
                Err(e) => {
                    log::error!("Failed to save figure: {e}");
                    self.status_message = Some(format!("Error: {e}"));
                }
            }
            if let Ok(mut slot) = save.outcome.lock() {
                *slot = Some(result);
            }
            self.save = None;
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        save.frames_rendered += 1;
        if !save.requested && save.frames_rendered >= FRAMES_BEFORE_CAPTURE {
            ctx.send_viewport_cmd(egui::ViewportCommand::Screenshot(egui::UserData::default()));
            save.requested = true;
        }
        ctx.request_repaint();
    }
}

impl eframe::App for StarplotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title ----
        if !self.figure.title.is_empty() {
            egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
                panels::title_bar(ui, &self.figure, &self.rc);
            });
        }

        // ---- Bottom panel: status ----
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            panels::status_bar(ui, &self.figure, self.status_message.as_deref());
        });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_plot(ui, &self.figure, &self.rc);
        });

        self.drive_save(ctx);
    }
}
