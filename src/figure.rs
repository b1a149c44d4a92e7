use std::path::PathBuf;

use crate::config::style::SeriesStyle;
use crate::data::loader::load_file;
use crate::data::model::ProfileFile;
use crate::data::resolve::{resolve_column, Resolution};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Plot options
// ---------------------------------------------------------------------------

/// Which axes are logarithmic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Plotter {
    #[default]
    Plot,
    Semilogx,
    Semilogy,
    Loglog,
}

impl Plotter {
    pub fn log_x(self) -> bool {
        matches!(self, Plotter::Semilogx | Plotter::Loglog)
    }

    pub fn log_y(self) -> bool {
        matches!(self, Plotter::Semilogy | Plotter::Loglog)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LegendMode {
    #[default]
    Off,
    /// Label every series with its file name.
    Auto,
    /// Labels assigned to series in drawing order.
    Labels(Vec<String>),
}

/// Everything about the figure that does not come from the files.
#[derive(Debug, Clone)]
pub struct PlotOptions {
    pub x_keys: Vec<String>,
    pub y_keys: Vec<String>,
    pub scale_x: f64,
    pub scale_y: f64,
    pub flip_x: bool,
    pub flip_y: bool,
    pub plotter: Plotter,
    pub style: SeriesStyle,
    pub legend: LegendMode,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

// ---------------------------------------------------------------------------
// Figure model
// ---------------------------------------------------------------------------

/// One (x column, y column) pair drawn for one file.
#[derive(Debug, Clone)]
pub struct Series {
    pub file: String,
    pub x_key: String,
    pub y_key: String,
    /// Scaled `[x, y]` pairs in data coordinates.
    pub points: Vec<[f64; 2]>,
    pub label: Option<String>,
}

/// The `(lo, hi)` pair of an axis; `lo > hi` after a flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub lo: f64,
    pub hi: f64,
}

impl AxisBounds {
    /// Min/max of the finite values, restricted to positive values on a log axis.
    fn from_values(values: impl Iterator<Item = f64>, log: bool) -> Self {
        let (lo, hi) = values
            .filter(|v| v.is_finite() && (!log || *v > 0.0))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if lo <= hi {
            AxisBounds { lo, hi }
        } else if log {
            AxisBounds { lo: 1.0, hi: 10.0 }
        } else {
            AxisBounds { lo: 0.0, hi: 1.0 }
        }
    }

    pub fn flip(&mut self) {
        std::mem::swap(&mut self.lo, &mut self.hi);
    }

    pub fn is_reversed(&self) -> bool {
        self.lo > self.hi
    }
}

/// A complete, renderer-independent description of the plot.
#[derive(Debug, Clone)]
pub struct Figure {
    pub series: Vec<Series>,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub plotter: Plotter,
    pub style: SeriesStyle,
    pub show_legend: bool,
    pub x_bounds: AxisBounds,
    pub y_bounds: AxisBounds,
}

impl Figure {
    pub fn flip_x(&mut self) {
        self.x_bounds.flip();
    }

    pub fn flip_y(&mut self) {
        self.y_bounds.flip();
    }
}

// ---------------------------------------------------------------------------
// Figure assembly
// ---------------------------------------------------------------------------

/// Accumulates series file by file; later series layer over earlier ones.
pub struct FigureBuilder {
    options: PlotOptions,
    series: Vec<Series>,
}

impl FigureBuilder {
    pub fn new(options: PlotOptions) -> Self {
        Self {
            options,
            series: Vec::new(),
        }
    }

    /// Draw every x key (outer) against every y key (inner) for one file.
    /// Returns the number of series added.
    pub fn add_file(&mut self, file: &ProfileFile) -> Result<usize> {
        let label = file.label();
        let mut added = 0;

        for x_key in &self.options.x_keys {
            let xs = resolve_logged(file, x_key)?;
            for y_key in &self.options.y_keys {
                let ys = resolve_logged(file, y_key)?;

                let points: Vec<[f64; 2]> = xs
                    .iter()
                    .zip(&ys)
                    .map(|(&x, &y)| [x * self.options.scale_x, y * self.options.scale_y])
                    .collect();

                log::info!(
                    "{label}: {x_key} vs {y_key} ({} points)",
                    points.len()
                );

                self.series.push(Series {
                    file: label.clone(),
                    x_key: x_key.clone(),
                    y_key: y_key.clone(),
                    points,
                    label: None,
                });
                added += 1;
            }
        }
        Ok(added)
    }

    /// Assign legend labels, compute bounds, then apply axis flips.
    pub fn finish(self) -> Figure {
        let FigureBuilder { options, mut series } = self;

        let show_legend = match &options.legend {
            LegendMode::Off => false,
            // Series of one file share its name and so one legend entry.
            LegendMode::Auto => {
                for s in &mut series {
                    s.label = Some(s.file.clone());
                }
                true
            }
            LegendMode::Labels(labels) => {
                for (s, label) in series.iter_mut().zip(labels) {
                    s.label = Some(label.clone());
                }
                true
            }
        };

        let all_points = || series.iter().flat_map(|s| s.points.iter());
        let x_bounds =
            AxisBounds::from_values(all_points().map(|p| p[0]), options.plotter.log_x());
        let y_bounds =
            AxisBounds::from_values(all_points().map(|p| p[1]), options.plotter.log_y());

        let mut figure = Figure {
            series,
            title: options.title,
            x_label: options.x_label,
            y_label: options.y_label,
            plotter: options.plotter,
            style: options.style,
            show_legend,
            x_bounds,
            y_bounds,
        };
        if options.flip_x {
            figure.flip_x();
        }
        if options.flip_y {
            figure.flip_y();
        }
        figure
    }
}

fn resolve_logged(file: &ProfileFile, key: &str) -> Result<Vec<f64>> {
    let (values, resolution) = resolve_column(&file.data, key, file.path())?;
    match resolution {
        Resolution::Exact => {}
        Resolution::FromLog => log::debug!("{}: '{key}' resolved as 10^log_{key}", file.label()),
        Resolution::ToLog => log::debug!(
            "{}: '{key}' resolved as log10 of stored column",
            file.label()
        ),
    }
    Ok(values)
}

/// Load each file in order and add its series. The first error aborts.
pub fn build_figure(paths: &[PathBuf], options: PlotOptions) -> Result<Figure> {
    let mut builder = FigureBuilder::new(options);
    for path in paths {
        let file = load_file(path)?;
        log::info!(
            "Loaded {}: {} header fields, {} columns, {} rows",
            path.display(),
            file.header.len(),
            file.data.column_names().len(),
            file.data.len()
        );
        log::info!(
            "{} header fields: {}",
            path.display(),
            file.header.names().collect::<Vec<_>>().join(", ")
        );
        if file.data.is_empty() {
            log::warn!("{}: data block has no rows", path.display());
        }
        if log::log_enabled!(log::Level::Debug) {
            if let Ok(json) = serde_json::to_string(&file.header) {
                log::debug!("{} header: {json}", path.display());
            }
        }
        builder.add_file(&file)?;
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_profile;
    use crate::error::PlotError;
    use std::path::Path;

    fn options(x: &[&str], y: &[&str]) -> PlotOptions {
        PlotOptions {
            x_keys: x.iter().map(|s| s.to_string()).collect(),
            y_keys: y.iter().map(|s| s.to_string()).collect(),
            scale_x: 1.0,
            scale_y: 1.0,
            flip_x: false,
            flip_y: false,
            plotter: Plotter::Plot,
            style: SeriesStyle::default(),
            legend: LegendMode::Off,
            title: String::new(),
            x_label: x[0].to_string(),
            y_label: y[0].to_string(),
        }
    }

    fn file(name: &str, text: &str) -> ProfileFile {
        parse_profile(text, Path::new(name)).unwrap()
    }

    const LOG_RHO: &str = "title\nM\n1.0\n\nradius log_rho\n1.0 0.0\n2.0 1.0\n3.0 2.0\n";
    const FOUR_COLS: &str = "title\nM\n1.0\n\na b c d\n1 2 3 4\n5 6 7 8\n";

    #[test]
    fn test_log_fallback_end_to_end() {
        let mut builder = FigureBuilder::new(options(&["radius"], &["rho"]));
        assert_eq!(builder.add_file(&file("profile1.data", LOG_RHO)).unwrap(), 1);
        let fig = builder.finish();

        assert_eq!(fig.series.len(), 1);
        let pts = &fig.series[0].points;
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[0], [1.0, 1.0]);
        assert_eq!(pts[1], [2.0, 10.0]);
        assert!((pts[2][1] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_column_aborts() {
        let text = "title\nM\n1.0\n\nradius rho\n1 2\n";
        let mut builder = FigureBuilder::new(options(&["radius"], &["nonexistent_col"]));
        let err = builder.add_file(&file("profile2.data", text)).unwrap_err();
        match err {
            PlotError::Lookup { path, key, available } => {
                assert_eq!(path, Path::new("profile2.data"));
                assert_eq!(key, "nonexistent_col");
                assert_eq!(available, vec!["radius", "rho"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cross_product_order_and_auto_legend() {
        let mut opts = options(&["a", "b"], &["c", "d"]);
        opts.legend = LegendMode::Auto;
        opts.style = SeriesStyle::parse("r.").unwrap();
        let mut builder = FigureBuilder::new(opts);
        assert_eq!(builder.add_file(&file("run.data", FOUR_COLS)).unwrap(), 4);
        let fig = builder.finish();

        let pairs: Vec<_> = fig
            .series
            .iter()
            .map(|s| (s.x_key.as_str(), s.y_key.as_str()))
            .collect();
        assert_eq!(pairs, vec![("a", "c"), ("a", "d"), ("b", "c"), ("b", "d")]);
        assert!(fig.show_legend);
        assert!(fig.series.iter().all(|s| s.label.as_deref() == Some("run.data")));
        assert_eq!(fig.style, SeriesStyle::parse("r.").unwrap());
    }

    #[test]
    fn test_auto_legend_labels_by_file_only() {
        let mut opts = options(&["a"], &["c", "d"]);
        opts.legend = LegendMode::Auto;
        let mut builder = FigureBuilder::new(opts);
        builder.add_file(&file("early.data", FOUR_COLS)).unwrap();
        builder.add_file(&file("late.data", FOUR_COLS)).unwrap();
        let fig = builder.finish();

        let labels: Vec<_> = fig.series.iter().map(|s| s.label.as_deref()).collect();
        assert_eq!(
            labels,
            vec![
                Some("early.data"),
                Some("early.data"),
                Some("late.data"),
                Some("late.data")
            ]
        );
        assert_eq!(fig.series[1].y_key, "d");
    }

    #[test]
    fn test_explicit_labels_in_drawing_order() {
        let mut opts = options(&["a"], &["b", "c", "d"]);
        opts.legend = LegendMode::Labels(vec!["first".to_string(), "second".to_string()]);
        let mut builder = FigureBuilder::new(opts);
        builder.add_file(&file("run.data", FOUR_COLS)).unwrap();
        let fig = builder.finish();

        let labels: Vec<_> = fig.series.iter().map(|s| s.label.as_deref()).collect();
        assert_eq!(labels, vec![Some("first"), Some("second"), None]);
    }

    #[test]
    fn test_no_legend_by_default() {
        let mut builder = FigureBuilder::new(options(&["a"], &["b"]));
        builder.add_file(&file("run.data", FOUR_COLS)).unwrap();
        let fig = builder.finish();
        assert!(!fig.show_legend);
        assert!(fig.series[0].label.is_none());
    }

    #[test]
    fn test_scaling_is_independent() {
        for (sx, sy) in [(2.0, 1.0), (-1.0, 0.5), (0.0, -3.0)] {
            let mut opts = options(&["a"], &["b"]);
            opts.scale_x = sx;
            opts.scale_y = sy;
            let mut builder = FigureBuilder::new(opts);
            builder.add_file(&file("run.data", FOUR_COLS)).unwrap();
            let fig = builder.finish();
            assert_eq!(
                fig.series[0].points,
                vec![[1.0 * sx, 2.0 * sy], [5.0 * sx, 6.0 * sy]]
            );
        }
    }

    #[test]
    fn test_files_layer_in_order() {
        let mut builder = FigureBuilder::new(options(&["a"], &["b"]));
        builder.add_file(&file("first.data", FOUR_COLS)).unwrap();
        builder.add_file(&file("second.data", FOUR_COLS)).unwrap();
        let fig = builder.finish();
        let files: Vec<_> = fig.series.iter().map(|s| s.file.as_str()).collect();
        assert_eq!(files, vec!["first.data", "second.data"]);
    }

    #[test]
    fn test_flip_swaps_only_requested_axis() {
        let mut opts = options(&["a"], &["b"]);
        opts.flip_x = true;
        let mut builder = FigureBuilder::new(opts);
        builder.add_file(&file("run.data", FOUR_COLS)).unwrap();
        let fig = builder.finish();

        assert_eq!(fig.x_bounds, AxisBounds { lo: 5.0, hi: 1.0 });
        assert!(fig.x_bounds.is_reversed());
        assert_eq!(fig.y_bounds, AxisBounds { lo: 2.0, hi: 6.0 });

        let mut fig = fig;
        fig.flip_y();
        assert_eq!(fig.y_bounds, AxisBounds { lo: 6.0, hi: 2.0 });
        assert_eq!(fig.x_bounds, AxisBounds { lo: 5.0, hi: 1.0 });
    }

    #[test]
    fn test_log_axis_bounds_ignore_non_positive() {
        let b = AxisBounds::from_values([-1.0, 0.0, 0.1, 100.0, f64::NAN].into_iter(), true);
        assert_eq!(b, AxisBounds { lo: 0.1, hi: 100.0 });
        let b = AxisBounds::from_values([-1.0, 0.0].into_iter(), true);
        assert_eq!(b, AxisBounds { lo: 1.0, hi: 10.0 });
        let b = AxisBounds::from_values(std::iter::empty(), false);
        assert_eq!(b, AxisBounds { lo: 0.0, hi: 1.0 });
    }

    #[test]
    fn test_build_figure_from_disk() {
        let dir = std::env::temp_dir().join(format!("starplot-figure-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("profile1.data");
        std::fs::write(&path, LOG_RHO).unwrap();

        let fig = build_figure(&[path.clone()], options(&["radius"], &["rho"])).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(fig.series.len(), 1);
        assert_eq!(fig.series[0].points.len(), 3);
        assert_eq!(fig.series[0].file, path.display().to_string());
    }

    #[test]
    fn test_build_figure_stops_at_first_bad_file() {
        let missing = PathBuf::from("/nonexistent/starplot/profile.data");
        let err = build_figure(&[missing], options(&["a"], &["b"])).unwrap_err();
        assert!(matches!(err, PlotError::Io { .. }));
    }
}
