mod app;
mod cli;
mod color;
mod config;
mod data;
mod error;
mod figure;
mod ui;

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use app::StarplotApp;
use clap::Parser;
use cli::Cli;
use config::style::SeriesStyle;
use eframe::egui;
use figure::PlotOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configuration is validated before any file is read.
    let mut rc = config::build_rc_params(cli.style_file.as_deref(), cli.rc_params.as_slice())
        .context("invalid rendering configuration")?;
    if let Some(w) = cli.width {
        rc.figure_width = w;
    }
    if let Some(h) = cli.height {
        rc.figure_height = h;
    }
    let style = SeriesStyle::parse(&cli.style)?;

    let options = PlotOptions {
        x_keys: cli.x.clone(),
        y_keys: cli.y.clone(),
        scale_x: cli.scale_x,
        scale_y: cli.scale_y,
        flip_x: cli.flip_x,
        flip_y: cli.flip_y,
        plotter: cli.plotter,
        style,
        legend: cli.legend_mode(),
        title: cli.title(),
        x_label: cli.x_label(),
        y_label: cli.y_label(),
    };

    let figure = figure::build_figure(&cli.files, options)?;
    log::info!("Drawing {} series", figure.series.len());

    let window_title = if figure.title.is_empty() {
        "starplot".to_string()
    } else {
        format!("starplot – {}", figure.title)
    };

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([rc.figure_width, rc.figure_height])
            .with_min_inner_size([300.0, 200.0]),
        ..Default::default()
    };

    let outcome: app::SaveOutcome = Arc::new(Mutex::new(None));
    let mut app = StarplotApp::new(figure, rc);
    if let Some(path) = cli.save.clone() {
        app = app.with_save(path, Arc::clone(&outcome));
    }

    eframe::run_native(
        &window_title,
        native_options,
        Box::new(move |_cc| Ok(Box::new(app))),
    )
    .map_err(|e| anyhow!("failed to open plot window: {e}"))?;

    if let Some(path) = &cli.save {
        let result = outcome
            .lock()
            .map_err(|_| anyhow!("save state poisoned"))?
            .take();
        match result {
            Some(Ok(())) => {}
            Some(Err(e)) => {
                return Err(anyhow!(e)).with_context(|| format!("saving {}", path.display()));
            }
            None => {
                return Err(anyhow!(
                    "window closed before {} was written",
                    path.display()
                ));
            }
        }
    }

    Ok(())
}

/// `warn` by default; `--verbose` raises to `info` on stdout. `RUST_LOG` wins.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level));
    if verbose {
        builder.target(env_logger::Target::Stdout);
    }
    builder.init();
}
