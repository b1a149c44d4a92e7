use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueHint};

use crate::config::rc_params::parse_positive;
use crate::figure::{LegendMode, Plotter};

/// Plot columns of stellar evolution / pulsation output files against each other.
///
/// Each file has a title line, a header block (names, values), a separator
/// line and a data block (column names, rows). A requested key `k` also
/// matches a stored `log_k` column (plotted as 10^v) and a requested
/// `log_k` matches a stored `k` column (plotted as log10(v)).
#[derive(Parser, Debug, Clone)]
#[command(name = "starplot", version, about, long_about)]
pub struct Cli {
    /// Input files, plotted in the order given (list them before -x/-y)
    #[arg(required = true, value_hint = ValueHint::FilePath)]
    pub files: Vec<PathBuf>,

    /// Column key(s) for the x-axis
    #[arg(short = 'x', required = true, num_args = 1..)]
    pub x: Vec<String>,

    /// Column key(s) for the y-axis
    #[arg(short = 'y', required = true, num_args = 1..)]
    pub y: Vec<String>,

    /// x-axis label (default: first x key)
    #[arg(long, num_args = 1..)]
    pub xlabel: Option<Vec<String>>,

    /// y-axis label (default: first y key)
    #[arg(long, num_args = 1..)]
    pub ylabel: Option<Vec<String>>,

    /// Legend: `auto` labels series by filename, anything else is used as the labels
    #[arg(long, num_args = 1..)]
    pub legend: Option<Vec<String>>,

    /// Format token: colour, marker and line style, e.g. `-`, `r--`, `ko`
    #[arg(long, default_value = "-", allow_hyphen_values = true)]
    pub style: String,

    /// Multiply x values by this factor
    #[arg(long = "scale-x", default_value_t = 1.0, allow_negative_numbers = true)]
    pub scale_x: f64,

    /// Multiply y values by this factor
    #[arg(long = "scale-y", default_value_t = 1.0, allow_negative_numbers = true)]
    pub scale_y: f64,

    /// Reverse the x-axis
    #[arg(long = "flip-x", action = ArgAction::SetTrue)]
    pub flip_x: bool,

    /// Reverse the y-axis
    #[arg(long = "flip-y", action = ArgAction::SetTrue)]
    pub flip_y: bool,

    /// Axis scaling of the plot
    #[arg(long, value_enum, default_value_t = Plotter::Plot)]
    pub plotter: Plotter,

    /// Plot title
    #[arg(long, num_args = 1..)]
    pub title: Option<Vec<String>>,

    /// Style file applied before --rcParams (`key : value` lines, or `.json`)
    #[arg(long = "style-file", value_hint = ValueHint::FilePath)]
    pub style_file: Option<PathBuf>,

    /// Rendering parameter overrides as name/value pairs
    #[arg(long = "rcParams", num_args = 1.., value_name = "NAME VALUE")]
    pub rc_params: Vec<String>,

    /// Write the figure to a PNG file and exit instead of keeping the window open
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub save: Option<PathBuf>,

    /// Figure width in pixels (overrides figure.width)
    #[arg(long, value_parser = pixel_size)]
    pub width: Option<f32>,

    /// Figure height in pixels (overrides figure.height)
    #[arg(long, value_parser = pixel_size)]
    pub height: Option<f32>,

    /// Print progress to standard output
    #[arg(short, long, action = ArgAction::SetTrue)]
    pub verbose: bool,
}

impl Cli {
    pub fn legend_mode(&self) -> LegendMode {
        match self.legend.as_deref() {
            None => LegendMode::Off,
            Some([only]) if only == "auto" => LegendMode::Auto,
            Some(labels) => LegendMode::Labels(labels.to_vec()),
        }
    }

    pub fn x_label(&self) -> String {
        join_words(self.xlabel.as_deref()).unwrap_or_else(|| self.x[0].clone())
    }

    pub fn y_label(&self) -> String {
        join_words(self.ylabel.as_deref()).unwrap_or_else(|| self.y[0].clone())
    }

    pub fn title(&self) -> String {
        join_words(self.title.as_deref()).unwrap_or_default()
    }
}

/// Window dimensions share the positive-size rule of `figure.width`/`figure.height`.
fn pixel_size(raw: &str) -> Result<f32, String> {
    parse_positive("size", raw).map_err(|e| e.to_string())
}

fn join_words(words: Option<&[String]>) -> Option<String> {
    words.map(|w| w.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("starplot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = parse(&["profile1.data", "-x", "radius", "-y", "rho"]);
        assert_eq!(cli.files, vec![PathBuf::from("profile1.data")]);
        assert_eq!(cli.style, "-");
        assert_eq!(cli.scale_x, 1.0);
        assert_eq!(cli.scale_y, 1.0);
        assert_eq!(cli.plotter, Plotter::Plot);
        assert!(!cli.flip_x && !cli.flip_y && !cli.verbose);
        assert_eq!(cli.legend_mode(), LegendMode::Off);
        assert_eq!(cli.x_label(), "radius");
        assert_eq!(cli.y_label(), "rho");
        assert_eq!(cli.title(), "");
    }

    #[test]
    fn test_multiple_keys_and_files() {
        let cli = parse(&["a.data", "b.data", "-x", "mass", "radius", "-y", "logT", "logRho"]);
        assert_eq!(cli.files.len(), 2);
        assert_eq!(cli.x, vec!["mass", "radius"]);
        assert_eq!(cli.y, vec!["logT", "logRho"]);
    }

    #[test]
    fn test_words_and_legend() {
        let cli = parse(&[
            "a.data", "-x", "r", "-y", "p", "--xlabel", "Radius", "(cm)", "--title", "Solar",
            "model", "--legend", "auto",
        ]);
        assert_eq!(cli.x_label(), "Radius (cm)");
        assert_eq!(cli.title(), "Solar model");
        assert_eq!(cli.legend_mode(), LegendMode::Auto);

        let cli = parse(&["a.data", "-x", "r", "-y", "p", "--legend", "first", "second"]);
        assert_eq!(
            cli.legend_mode(),
            LegendMode::Labels(vec!["first".to_string(), "second".to_string()])
        );
    }

    #[test]
    fn test_negative_scale_and_style() {
        let cli = parse(&[
            "a.data", "-x", "r", "-y", "p", "--scale-x", "-2.5", "--style=--", "--plotter",
            "loglog",
        ]);
        assert_eq!(cli.scale_x, -2.5);
        assert_eq!(cli.style, "--");
        assert_eq!(cli.plotter, Plotter::Loglog);
    }

    #[test]
    fn test_rc_params_tokens() {
        let cli = parse(&[
            "a.data", "-x", "r", "-y", "p", "--rcParams", "axes.grid", "F", "lines.linewidth", "2",
        ]);
        assert_eq!(cli.rc_params, vec!["axes.grid", "F", "lines.linewidth", "2"]);
    }

    #[test]
    fn test_window_size_must_be_positive_and_finite() {
        let base = ["starplot", "a.data", "-x", "r", "-y", "p"];
        for bad in ["--width=0", "--width=-5", "--width=nan", "--height=inf", "--height=1e39"] {
            let args = base.iter().copied().chain(std::iter::once(bad));
            assert!(Cli::try_parse_from(args).is_err(), "{bad}");
        }

        let cli = parse(&["a.data", "-x", "r", "-y", "p", "--width", "800", "--height", "600"]);
        assert_eq!(cli.width, Some(800.0));
        assert_eq!(cli.height, Some(600.0));
    }

    #[test]
    fn test_missing_keys_rejected() {
        assert!(Cli::try_parse_from(["starplot", "a.data", "-x", "r"]).is_err());
        assert!(Cli::try_parse_from(["starplot", "-x", "r", "-y", "p"]).is_err());
    }
}
