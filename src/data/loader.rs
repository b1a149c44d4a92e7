use std::collections::HashSet;
use std::path::Path;

use super::model::{DataTable, HeaderRecord, HeaderValue, ProfileFile};
use crate::error::{PlotError, Result};

// Fixed layout, 1-based line numbers.
const HEADER_NAMES_LINE: usize = 2;
const HEADER_VALUES_LINE: usize = 3;
const DATA_NAMES_LINE: usize = 5;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a profile/history file from disk.
///
/// The whole file is read into memory and the handle dropped before
/// parsing starts.
pub fn load_file(path: &Path) -> Result<ProfileFile> {
    let text = std::fs::read_to_string(path).map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_profile(&text, path)
}

/// Parse the fixed two-block layout:
///
/// ```text
/// line 1   ignored
/// line 2   header names
/// line 3   header values
/// line 4   ignored
/// line 5   data column names
/// line 6+  data rows
/// ```
pub fn parse_profile(text: &str, path: &Path) -> Result<ProfileFile> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }

    if lines.len() < DATA_NAMES_LINE {
        return Err(PlotError::parse(
            path,
            lines.len(),
            format!(
                "expected at least {DATA_NAMES_LINE} lines (title, header names, header values, \
                 separator, column names), found {}",
                lines.len()
            ),
        ));
    }

    let header = parse_header(
        lines[HEADER_NAMES_LINE - 1],
        lines[HEADER_VALUES_LINE - 1],
        path,
    )?;
    let data = parse_data(&lines[DATA_NAMES_LINE - 1..], path)?;

    Ok(ProfileFile {
        path: path.to_path_buf(),
        header,
        data,
    })
}

// ---------------------------------------------------------------------------
// Header block
// ---------------------------------------------------------------------------

fn parse_header(names_line: &str, values_line: &str, path: &Path) -> Result<HeaderRecord> {
    let names = tokenize(names_line, path, HEADER_NAMES_LINE)?;
    let values = tokenize(values_line, path, HEADER_VALUES_LINE)?;

    if names.len() != values.len() {
        return Err(PlotError::parse(
            path,
            HEADER_VALUES_LINE,
            format!(
                "header has {} names but {} values",
                names.len(),
                values.len()
            ),
        ));
    }

    let fields = names
        .into_iter()
        .zip(values)
        .map(|(name, value)| {
            let value = if value.quoted {
                HeaderValue::Text(value.text)
            } else {
                let v = parse_number(&value.text).ok_or_else(|| {
                    PlotError::parse(
                        path,
                        HEADER_VALUES_LINE,
                        format!(
                            "header field '{}': '{}' is not a number",
                            name.text, value.text
                        ),
                    )
                })?;
                HeaderValue::Number(v)
            };
            Ok((name.text, value))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(HeaderRecord::new(fields))
}

// ---------------------------------------------------------------------------
// Data block
// ---------------------------------------------------------------------------

/// `lines[0]` is the column-name row; the rest are data rows.
fn parse_data(lines: &[&str], path: &Path) -> Result<DataTable> {
    let names: Vec<String> = tokenize(lines[0], path, DATA_NAMES_LINE)?
        .into_iter()
        .map(|t| t.text)
        .collect();

    if names.is_empty() {
        return Err(PlotError::parse(path, DATA_NAMES_LINE, "no data column names"));
    }

    let mut seen = HashSet::new();
    for name in &names {
        if !seen.insert(name.as_str()) {
            return Err(PlotError::parse(
                path,
                DATA_NAMES_LINE,
                format!("duplicate column name '{name}'"),
            ));
        }
    }

    let n_rows = lines.len() - 1;
    let mut columns: Vec<Vec<f64>> = vec![Vec::with_capacity(n_rows); names.len()];

    for (offset, line) in lines[1..].iter().enumerate() {
        let line_no = DATA_NAMES_LINE + 1 + offset;

        if line.trim().is_empty() {
            return Err(PlotError::parse(path, line_no, "blank line inside data block"));
        }

        let tokens = tokenize(line, path, line_no)?;
        if tokens.len() != names.len() {
            return Err(PlotError::parse(
                path,
                line_no,
                format!("expected {} values, found {}", names.len(), tokens.len()),
            ));
        }

        for ((token, column), name) in tokens.iter().zip(columns.iter_mut()).zip(&names) {
            let value = (!token.quoted)
                .then(|| parse_number(&token.text))
                .flatten()
                .ok_or_else(|| {
                    PlotError::parse(
                        path,
                        line_no,
                        format!("column '{name}': '{}' is not a number", token.text),
                    )
                })?;
            column.push(value);
        }
    }

    Ok(DataTable::from_columns(names.into_iter().zip(columns).collect()))
}

// -- Tokenizer helpers --

#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    quoted: bool,
}

/// Split on whitespace; a double-quoted run is one token and may hold spaces.
fn tokenize(line: &str, path: &Path, line_no: usize) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&first) = chars.peek() else {
            break;
        };

        if first == '"' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '"' {
                    closed = true;
                    break;
                }
                text.push(c);
            }
            if !closed {
                return Err(PlotError::parse(path, line_no, "unterminated quoted string"));
            }
            tokens.push(Token { text, quoted: true });
        } else {
            let mut text = String::new();
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                text.push(c);
            }
            tokens.push(Token {
                text,
                quoted: false,
            });
        }
    }

    Ok(tokens)
}

/// Parse a float, also accepting Fortran `D` exponents (`1.5D+02`).
fn parse_number(s: &str) -> Option<f64> {
    s.parse::<f64>()
        .ok()
        .or_else(|| s.replace(['D', 'd'], "E").parse::<f64>().ok())
}
