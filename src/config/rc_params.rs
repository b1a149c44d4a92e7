use crate::error::{PlotError, Result};

// ---------------------------------------------------------------------------
// Parameter schema
// ---------------------------------------------------------------------------

/// The value type a parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamKind {
    Bool,
    /// Float within an inclusive range.
    Float { min: f64, max: f64 },
    /// One of a fixed list of strings.
    Choice(&'static [&'static str]),
}

/// One row of the schema.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub default: &'static str,
}

const POSITIVE_MIN: f64 = f64::MIN_POSITIVE;
const POSITIVE_MAX: f64 = f32::MAX as f64;

const POSITIVE: ParamKind = ParamKind::Float {
    min: POSITIVE_MIN,
    max: POSITIVE_MAX,
};

pub const LEGEND_LOCATIONS: &[&str] = &["upper right", "upper left", "lower left", "lower right"];

/// Every parameter that may be overridden, with its type and default.
pub const SCHEMA: &[ParamSpec] = &[
    ParamSpec {
        name: "lines.linewidth",
        kind: POSITIVE,
        default: "1.5",
    },
    ParamSpec {
        name: "lines.markersize",
        kind: POSITIVE,
        default: "6.0",
    },
    ParamSpec {
        name: "axes.grid",
        kind: ParamKind::Bool,
        default: "true",
    },
    ParamSpec {
        name: "axes.titlesize",
        kind: POSITIVE,
        default: "18.0",
    },
    ParamSpec {
        name: "axes.labelsize",
        kind: POSITIVE,
        default: "14.0",
    },
    ParamSpec {
        name: "legend.loc",
        kind: ParamKind::Choice(LEGEND_LOCATIONS),
        default: "upper right",
    },
    ParamSpec {
        name: "legend.framealpha",
        kind: ParamKind::Float { min: 0.0, max: 1.0 },
        default: "0.8",
    },
    ParamSpec {
        name: "figure.width",
        kind: POSITIVE,
        default: "1000",
    },
    ParamSpec {
        name: "figure.height",
        kind: POSITIVE,
        default: "700",
    },
];

pub fn lookup(name: &str) -> Option<&'static ParamSpec> {
    SCHEMA.iter().find(|spec| spec.name == name)
}

// ---------------------------------------------------------------------------
// Typed values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegendLoc {
    UpperRight,
    UpperLeft,
    LowerLeft,
    LowerRight,
}

/// Rendering parameters after defaults, style file and overrides.
#[derive(Debug, Clone, PartialEq)]
pub struct RcParams {
    pub line_width: f32,
    pub marker_size: f32,
    pub grid: bool,
    pub title_size: f32,
    pub label_size: f32,
    pub legend_loc: LegendLoc,
    pub legend_frame_alpha: f32,
    pub figure_width: f32,
    pub figure_height: f32,
}

impl Default for RcParams {
    fn default() -> Self {
        RcParams {
            line_width: 1.5,
            marker_size: 6.0,
            grid: true,
            title_size: 18.0,
            label_size: 14.0,
            legend_loc: LegendLoc::UpperRight,
            legend_frame_alpha: 0.8,
            figure_width: 1000.0,
            figure_height: 700.0,
        }
    }
}

/// A raw override after checking it against its [`ParamSpec`].
#[derive(Debug, Clone, PartialEq)]
enum ParamValue {
    Bool(bool),
    Float(f32),
    Choice(&'static str),
}

impl ParamValue {
    fn parse(spec: &ParamSpec, raw: &str) -> Result<Self> {
        let name = spec.name;
        let raw = raw.trim();
        match spec.kind {
            ParamKind::Bool => parse_bool(raw).map(ParamValue::Bool).ok_or_else(|| {
                PlotError::config(format!(
                    "{name}: '{raw}' is not a boolean (expected true/t/false/f)"
                ))
            }),
            ParamKind::Float { min, max } => {
                parse_float(name, raw, min, max).map(ParamValue::Float)
            }
            ParamKind::Choice(choices) => choices
                .iter()
                .find(|&&c| c == raw)
                .map(|&c| ParamValue::Choice(c))
                .ok_or_else(|| {
                    PlotError::config(format!(
                        "{name}: '{raw}' is not one of: {}",
                        choices.join(", ")
                    ))
                }),
        }
    }
}

impl RcParams {
    /// Apply one `name value` override, validating against the schema.
    pub fn set(&mut self, name: &str, raw: &str) -> Result<()> {
        let spec = lookup(name).ok_or_else(|| {
            let known: Vec<String> = SCHEMA
                .iter()
                .map(|s| format!("{}={}", s.name, s.default))
                .collect();
            PlotError::config(format!(
                "unknown parameter '{name}' (known, with defaults: {})",
                known.join(", ")
            ))
        })?;

        match (spec.name, ParamValue::parse(spec, raw)?) {
            ("lines.linewidth", ParamValue::Float(v)) => self.line_width = v,
            ("lines.markersize", ParamValue::Float(v)) => self.marker_size = v,
            ("axes.grid", ParamValue::Bool(b)) => self.grid = b,
            ("axes.titlesize", ParamValue::Float(v)) => self.title_size = v,
            ("axes.labelsize", ParamValue::Float(v)) => self.label_size = v,
            ("legend.loc", ParamValue::Choice(c)) => {
                self.legend_loc = match c {
                    "upper left" => LegendLoc::UpperLeft,
                    "lower left" => LegendLoc::LowerLeft,
                    "lower right" => LegendLoc::LowerRight,
                    _ => LegendLoc::UpperRight,
                }
            }
            ("legend.framealpha", ParamValue::Float(v)) => self.legend_frame_alpha = v,
            ("figure.width", ParamValue::Float(v)) => self.figure_width = v,
            ("figure.height", ParamValue::Float(v)) => self.figure_height = v,
            (name, value) => {
                return Err(PlotError::config(format!(
                    "parameter '{name}' cannot take {value:?}"
                )))
            }
        }
        Ok(())
    }

    /// Apply a flat `name value name value ...` sequence as given to `--rcParams`.
    pub fn apply_pairs<S: AsRef<str>>(&mut self, tokens: &[S]) -> Result<()> {
        if tokens.len() % 2 != 0 {
            return Err(PlotError::config(format!(
                "--rcParams expects name/value pairs, got {} tokens",
                tokens.len()
            )));
        }
        for pair in tokens.chunks(2) {
            self.set(pair[0].as_ref(), pair[1].as_ref())?;
        }
        Ok(())
    }
}

/// Parse a finite float in `[min, max]` that still fits in an `f32`.
fn parse_float(name: &str, raw: &str, min: f64, max: f64) -> Result<f32> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| PlotError::config(format!("{name}: '{raw}' is not a number")))?;
    if !value.is_finite() || !(min..=max).contains(&value) {
        return Err(PlotError::config(format!("{name}: {value} is out of range")));
    }
    let narrowed = value as f32;
    if !narrowed.is_finite() || !(min..=max).contains(&f64::from(narrowed)) {
        return Err(PlotError::config(format!("{name}: {value} is out of range")));
    }
    Ok(narrowed)
}

/// Strictly positive, finite size such as a line width or a pixel count.
pub fn parse_positive(name: &str, raw: &str) -> Result<f32> {
    parse_float(name, raw, POSITIVE_MIN, POSITIVE_MAX)
}

/// Case-insensitive `true/t/false/f`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "t" => Some(true),
        "false" | "f" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_defaults_parse() {
        let mut params = RcParams::default();
        for spec in SCHEMA {
            params.set(spec.name, spec.default).unwrap();
        }
        assert_eq!(params, RcParams::default());
        assert_eq!(params.line_width, 1.5);
        assert!(params.grid);
        assert_eq!(params.legend_loc, LegendLoc::UpperRight);
        assert_eq!(params.figure_width, 1000.0);
    }

    #[test]
    fn test_bool_tokens_case_insensitive() {
        for (raw, expected) in [("True", true), ("t", true), ("FALSE", false), ("F", false)] {
            let mut params = RcParams::default();
            params.set("axes.grid", raw).unwrap();
            assert_eq!(params.grid, expected, "{raw}");
        }
        let mut params = RcParams::default();
        assert!(matches!(params.set("axes.grid", "yes"), Err(PlotError::Config(_))));
    }

    #[test]
    fn test_apply_pairs() {
        let mut params = RcParams::default();
        params
            .apply_pairs(&["lines.linewidth", "3", "legend.loc", "lower left"])
            .unwrap();
        assert_eq!(params.line_width, 3.0);
        assert_eq!(params.legend_loc, LegendLoc::LowerLeft);
    }

    #[test]
    fn test_odd_pair_count_rejected() {
        let mut params = RcParams::default();
        let err = params.apply_pairs(&["lines.linewidth"]).unwrap_err();
        assert!(err.to_string().contains("name/value pairs"));
    }

    #[test]
    fn test_unknown_and_invalid_values() {
        let mut params = RcParams::default();
        assert!(params.set("lines.colour", "red").is_err());
        assert!(params.set("lines.linewidth", "thick").is_err());
        assert!(params.set("lines.linewidth", "0").is_err());
        assert!(params.set("legend.framealpha", "1.5").is_err());
        assert!(params.set("legend.loc", "center").is_err());
        assert_eq!(params, RcParams::default());
    }

    #[test]
    fn test_non_finite_and_overflowing_sizes_rejected() {
        let mut params = RcParams::default();
        for name in ["figure.width", "figure.height", "lines.linewidth"] {
            for raw in ["inf", "-inf", "NaN", "0", "-1", "1e39", "1e-300"] {
                assert!(params.set(name, raw).is_err(), "{name} = {raw}");
            }
        }
        assert!(params.set("legend.framealpha", "nan").is_err());
        assert_eq!(params, RcParams::default());

        params.set("figure.width", "1e30").unwrap();
        assert!(params.figure_width.is_finite());
    }

    #[test]
    fn test_parse_positive() {
        assert_eq!(parse_positive("--width", " 800 ").unwrap(), 800.0);
        let err = parse_positive("--width", "inf").unwrap_err();
        assert!(err.to_string().starts_with("--width:"));
        assert!(parse_positive("--height", "-5").is_err());
    }
}
