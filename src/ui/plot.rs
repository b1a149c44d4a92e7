use std::ops::RangeInclusive;

use eframe::egui::{RichText, Ui};
use egui_plot::{
    Corner, GridMark, Legend, Line, LineStyle, MarkerShape, Plot, PlotPoint, PlotPoints, Points,
};

use crate::color::series_colors;
use crate::config::rc_params::{LegendLoc, RcParams};
use crate::config::style::{Dash, Marker};
use crate::figure::{AxisBounds, Figure};

// ---------------------------------------------------------------------------
// Axis transform: data coordinates → plot coordinates
// ---------------------------------------------------------------------------

/// egui_plot only has linear, increasing axes. Log axes plot `log10(v)`,
/// reversed axes plot `-v`; tick labels undo both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTransform {
    log: bool,
    sign: f64,
}

impl AxisTransform {
    pub fn new(log: bool, bounds: &AxisBounds) -> Self {
        Self {
            log,
            sign: if bounds.is_reversed() { -1.0 } else { 1.0 },
        }
    }

    /// `None` for values a log axis cannot show, and for NaN/inf.
    pub fn forward(&self, v: f64) -> Option<f64> {
        let v = if self.log {
            if v <= 0.0 {
                return None;
            }
            v.log10()
        } else {
            v
        };
        v.is_finite().then_some(v * self.sign)
    }

    /// Back from plot coordinates to data coordinates.
    pub fn inverse(&self, v: f64) -> f64 {
        // `+ 0.0` folds -0.0 into 0.0.
        let v = v * self.sign + 0.0;
        if self.log {
            10f64.powf(v)
        } else {
            v
        }
    }

    pub fn tick_label(&self, mark: GridMark) -> String {
        // `+ 0.0` folds -0.0 into 0.0.
        let v = mark.value * self.sign + 0.0;
        if self.log {
            format_power_of_ten(v)
        } else {
            let decimals = (-mark.step_size.log10().floor()).max(0.0) as usize;
            format!("{v:.decimals$}")
        }
    }
}

fn format_power_of_ten(exponent: f64) -> String {
    if (exponent - exponent.round()).abs() < 1e-9 {
        format!("1e{}", exponent.round() as i64)
    } else {
        format!("{:.3e}", 10f64.powf(exponent))
    }
}

/// Hover readout of a data value.
fn format_readout(v: f64) -> String {
    let magnitude = v.abs();
    if v == 0.0 || (1e-3..1e5).contains(&magnitude) {
        format!("{v:.4}")
    } else {
        format!("{v:.4e}")
    }
}

/// Split a series into the runs a line may join: a point either axis
/// cannot show ends the current run instead of being bridged.
fn line_runs(points: &[[f64; 2]], tx: AxisTransform, ty: AxisTransform) -> Vec<Vec<[f64; 2]>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();
    for &[x, y] in points {
        match (tx.forward(x), ty.forward(y)) {
            (Some(px), Some(py)) => current.push([px, py]),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

fn legend_corner(loc: LegendLoc) -> Corner {
    match loc {
        LegendLoc::UpperRight => Corner::RightTop,
        LegendLoc::UpperLeft => Corner::LeftTop,
        LegendLoc::LowerLeft => Corner::LeftBottom,
        LegendLoc::LowerRight => Corner::RightBottom,
    }
}

fn line_style(dash: Dash) -> LineStyle {
    match dash {
        Dash::Solid => LineStyle::Solid,
        Dash::Dashed => LineStyle::dashed_dense(),
        Dash::Dotted => LineStyle::dotted_dense(),
        Dash::DashDot => LineStyle::dashed_loose(),
    }
}

fn marker_shape(marker: Marker) -> MarkerShape {
    match marker {
        Marker::Point | Marker::Circle => MarkerShape::Circle,
        Marker::Cross => MarkerShape::Cross,
        Marker::Plus => MarkerShape::Plus,
        Marker::Star => MarkerShape::Asterisk,
        Marker::Square => MarkerShape::Square,
        Marker::Diamond => MarkerShape::Diamond,
        Marker::TriangleUp => MarkerShape::Up,
        Marker::TriangleDown => MarkerShape::Down,
        Marker::TriangleLeft => MarkerShape::Left,
        Marker::TriangleRight => MarkerShape::Right,
    }
}

// ---------------------------------------------------------------------------
// Figure plot (central panel)
// ---------------------------------------------------------------------------

/// Render every series of `figure` in one plot.
pub fn figure_plot(ui: &mut Ui, figure: &Figure, rc: &RcParams) {
    let tx = AxisTransform::new(figure.plotter.log_x(), &figure.x_bounds);
    let ty = AxisTransform::new(figure.plotter.log_y(), &figure.y_bounds);
    let colors = series_colors(&figure.style, figure.series.len());

    let mut plot = Plot::new("figure_plot")
        .x_axis_label(RichText::new(&figure.x_label).size(rc.label_size))
        .y_axis_label(RichText::new(&figure.y_label).size(rc.label_size))
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            tx.tick_label(mark)
        })
        .y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            ty.tick_label(mark)
        })
        .label_formatter(move |name: &str, value: &PlotPoint| {
            let x = format_readout(tx.inverse(value.x));
            let y = format_readout(ty.inverse(value.y));
            if name.is_empty() {
                format!("x = {x}\ny = {y}")
            } else {
                format!("{name}\nx = {x}\ny = {y}")
            }
        })
        .show_grid(rc.grid)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    for v in [figure.x_bounds.lo, figure.x_bounds.hi] {
        if let Some(x) = tx.forward(v) {
            plot = plot.include_x(x);
        }
    }
    for v in [figure.y_bounds.lo, figure.y_bounds.hi] {
        if let Some(y) = ty.forward(v) {
            plot = plot.include_y(y);
        }
    }

    if figure.show_legend {
        plot = plot.legend(
            Legend::default()
                .position(legend_corner(rc.legend_loc))
                .background_alpha(rc.legend_frame_alpha),
        );
    }

    let style = figure.style;

    plot.show(ui, |plot_ui| {
        for (series, &color) in figure.series.iter().zip(colors.iter()) {
            let name = series.label.clone().unwrap_or_default();
            let runs = line_runs(&series.points, tx, ty);

            // Runs share a name, so the legend shows one entry per series.
            if let Some(dash) = style.dash {
                for run in &runs {
                    let line = Line::new(PlotPoints::from(run.clone()))
                        .name(&name)
                        .color(color)
                        .width(rc.line_width)
                        .style(line_style(dash));
                    plot_ui.line(line);
                }
            }

            if let Some(marker) = style.marker {
                let radius = match marker {
                    Marker::Point => rc.marker_size / 4.0,
                    _ => rc.marker_size / 2.0,
                };
                let points: Vec<[f64; 2]> = runs.concat();
                let markers = Points::new(PlotPoints::from(points))
                    .name(&name)
                    .color(color)
                    .shape(marker_shape(marker))
                    .filled(true)
                    .radius(radius);
                plot_ui.points(markers);
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mark(value: f64, step_size: f64) -> GridMark {
        GridMark { value, step_size }
    }

    #[test]
    fn test_linear_forward() {
        let t = AxisTransform::new(false, &AxisBounds { lo: 0.0, hi: 5.0 });
        assert_eq!(t.forward(-2.0), Some(-2.0));
        assert_eq!(t.forward(f64::NAN), None);
    }

    #[test]
    fn test_reversed_axis_negates() {
        let t = AxisTransform::new(false, &AxisBounds { lo: 5.0, hi: 1.0 });
        assert_eq!(t.forward(3.0), Some(-3.0));
        assert_eq!(t.tick_label(mark(-3.0, 1.0)), "3");
        assert_eq!(t.tick_label(mark(0.0, 1.0)), "0");
    }

    #[test]
    fn test_log_axis() {
        let t = AxisTransform::new(true, &AxisBounds { lo: 1.0, hi: 1000.0 });
        assert_eq!(t.forward(100.0), Some(2.0));
        assert_eq!(t.forward(0.0), None);
        assert_eq!(t.forward(-1.0), None);
        assert_eq!(t.tick_label(mark(2.0, 1.0)), "1e2");
        assert_eq!(t.tick_label(mark(-3.0, 1.0)), "1e-3");
    }

    #[test]
    fn test_inverse_undoes_forward() {
        let reversed = AxisTransform::new(false, &AxisBounds { lo: 5.0, hi: 1.0 });
        assert_eq!(reversed.inverse(-3.0), 3.0);
        assert_eq!(reversed.inverse(0.0).to_string(), "0");

        let log = AxisTransform::new(true, &AxisBounds { lo: 1.0, hi: 1000.0 });
        assert!((log.inverse(2.0) - 100.0).abs() < 1e-9);

        let reversed_log = AxisTransform::new(true, &AxisBounds { lo: 1e4, hi: 1.0 });
        let plotted = reversed_log.forward(1e3).unwrap();
        assert!((plotted + 3.0).abs() < 1e-12);
        assert!((reversed_log.inverse(plotted) - 1e3).abs() < 1e-9);
    }

    #[test]
    fn test_readout_switches_to_exponent_form() {
        assert_eq!(format_readout(0.0), "0.0000");
        assert_eq!(format_readout(12.5), "12.5000");
        assert_eq!(format_readout(1.5e7), "1.5000e7");
        assert_eq!(format_readout(-2e-5), "-2.0000e-5");
    }

    #[test]
    fn test_line_runs_break_at_hidden_points() {
        let linear = AxisTransform::new(false, &AxisBounds { lo: 0.0, hi: 5.0 });
        let log = AxisTransform::new(true, &AxisBounds { lo: 1.0, hi: 100.0 });
        let points = [
            [1.0, 10.0],
            [2.0, 100.0],
            [3.0, f64::NAN],
            [4.0, -1.0],
            [5.0, 10.0],
        ];

        let runs = line_runs(&points, linear, log);
        assert_eq!(runs, vec![vec![[1.0, 1.0], [2.0, 2.0]], vec![[5.0, 1.0]]]);

        let all_linear = line_runs(&points, linear, linear);
        assert_eq!(all_linear.len(), 2);
        assert_eq!(all_linear[0].len(), 2);
        assert_eq!(all_linear[1], vec![[4.0, -1.0], [5.0, 10.0]]);

        assert!(line_runs(&[[1.0, f64::NAN]], linear, linear).is_empty());
    }

    #[test]
    fn test_linear_tick_decimals_follow_step() {
        let t = AxisTransform::new(false, &AxisBounds { lo: 0.0, hi: 1.0 });
        assert_eq!(t.tick_label(mark(0.25, 0.05)), "0.25");
        assert_eq!(t.tick_label(mark(40.0, 10.0)), "40");
    }
}
