use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value as JsonValue;

use super::rc_params::RcParams;
use crate::error::{PlotError, Result};

// ---------------------------------------------------------------------------
// Format token: colour + marker + line style, e.g. "r--", "ko", "b.-"
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dash {
    Solid,
    Dashed,
    Dotted,
    DashDot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Point,
    Circle,
    Cross,
    Plus,
    Star,
    Square,
    Diamond,
    TriangleUp,
    TriangleDown,
    TriangleLeft,
    TriangleRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Blue,
    Green,
    Red,
    Cyan,
    Magenta,
    Yellow,
    Black,
    White,
}

impl NamedColor {
    pub fn rgb(self) -> [u8; 3] {
        match self {
            NamedColor::Blue => [0, 0, 255],
            NamedColor::Green => [0, 128, 0],
            NamedColor::Red => [255, 0, 0],
            NamedColor::Cyan => [0, 191, 191],
            NamedColor::Magenta => [191, 0, 191],
            NamedColor::Yellow => [191, 191, 0],
            NamedColor::Black => [0, 0, 0],
            NamedColor::White => [255, 255, 255],
        }
    }
}

/// A parsed `--style` token. Every series is drawn with the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesStyle {
    pub color: Option<NamedColor>,
    pub marker: Option<Marker>,
    /// `None` means markers only.
    pub dash: Option<Dash>,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        SeriesStyle {
            color: None,
            marker: None,
            dash: Some(Dash::Solid),
        }
    }
}

impl SeriesStyle {
    /// Parse a format token. Parts may come in any order, each at most once.
    pub fn parse(token: &str) -> Result<Self> {
        let mut color = None;
        let mut marker = None;
        let mut dash = None;

        let bad = |msg: String| PlotError::config(format!("style '{token}': {msg}"));
        let mut rest = token;

        while let Some(c) = rest.chars().next() {
            // Two-character line styles first so "--" is not read as "-" "-".
            let (found_dash, len) = if rest.starts_with("--") {
                (Some(Dash::Dashed), 2)
            } else if rest.starts_with("-.") {
                (Some(Dash::DashDot), 2)
            } else if c == '-' {
                (Some(Dash::Solid), 1)
            } else if c == ':' {
                (Some(Dash::Dotted), 1)
            } else {
                (None, c.len_utf8())
            };

            if let Some(d) = found_dash {
                if dash.replace(d).is_some() {
                    return Err(bad("more than one line style".to_string()));
                }
            } else if let Some(m) = marker_for(c) {
                if marker.replace(m).is_some() {
                    return Err(bad("more than one marker".to_string()));
                }
            } else if let Some(col) = color_for(c) {
                if color.replace(col).is_some() {
                    return Err(bad("more than one colour".to_string()));
                }
            } else {
                return Err(bad(format!("unrecognised character '{c}'")));
            }

            rest = &rest[len..];
        }

        if marker.is_none() && dash.is_none() {
            dash = Some(Dash::Solid);
        }

        Ok(SeriesStyle { color, marker, dash })
    }
}

fn marker_for(c: char) -> Option<Marker> {
    Some(match c {
        '.' => Marker::Point,
        'o' => Marker::Circle,
        'x' => Marker::Cross,
        '+' => Marker::Plus,
        '*' => Marker::Star,
        's' => Marker::Square,
        'd' => Marker::Diamond,
        '^' => Marker::TriangleUp,
        'v' => Marker::TriangleDown,
        '<' => Marker::TriangleLeft,
        '>' => Marker::TriangleRight,
        _ => return None,
    })
}

fn color_for(c: char) -> Option<NamedColor> {
    Some(match c {
        'b' => NamedColor::Blue,
        'g' => NamedColor::Green,
        'r' => NamedColor::Red,
        'c' => NamedColor::Cyan,
        'm' => NamedColor::Magenta,
        'y' => NamedColor::Yellow,
        'k' => NamedColor::Black,
        'w' => NamedColor::White,
        _ => return None,
    })
}

// ---------------------------------------------------------------------------
// Style files
// ---------------------------------------------------------------------------

/// Apply a style file to `params`. Dispatch by extension:
///
/// * `.json` – flat object `{ "lines.linewidth": 2, "axes.grid": false }`
/// * anything else – `key : value` lines, `#` comments
///
/// Keys outside the parameter schema are skipped with a warning; known
/// keys with invalid values are errors.
pub fn apply_style_file(params: &mut RcParams, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path).map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    let entries = if is_json {
        parse_json_style(&text, path)?
    } else {
        parse_key_value_style(&text, path)?
    };

    for (key, value) in entries {
        if super::rc_params::lookup(&key).is_none() {
            log::warn!(
                "{}: ignoring unknown style parameter '{key}'",
                path.display()
            );
            continue;
        }
        params
            .set(&key, &value)
            .map_err(|e| PlotError::config(format!("{}: {e}", path.display())))?;
    }
    Ok(())
}

fn parse_json_style(text: &str, path: &Path) -> Result<Vec<(String, String)>> {
    let map: BTreeMap<String, JsonValue> = serde_json::from_str(text).map_err(|e| {
        PlotError::config(format!("{}: invalid JSON style file: {e}", path.display()))
    })?;

    map.into_iter()
        .map(|(key, value)| {
            let raw = match value {
                JsonValue::String(s) => s,
                JsonValue::Number(n) => n.to_string(),
                JsonValue::Bool(b) => b.to_string(),
                other => {
                    return Err(PlotError::config(format!(
                        "{}: '{key}' must be a string, number or boolean, got {other}",
                        path.display()
                    )))
                }
            };
            Ok((key, raw))
        })
        .collect()
}

fn parse_key_value_style(text: &str, path: &Path) -> Result<Vec<(String, String)>> {
    let mut entries = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let (key, value) = line.split_once(':').ok_or_else(|| {
            PlotError::parse(path, i + 1, format!("expected 'key : value', found '{line}'"))
        })?;
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        entries.push((key.trim().to_string(), value.to_string()));
    }
    Ok(entries)
}
