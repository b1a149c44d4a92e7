use std::path::Path;

use super::model::DataTable;
use crate::error::{PlotError, Result};

const LOG_PREFIX: &str = "log_";

// ---------------------------------------------------------------------------
// Column resolution with linear/logarithmic fallback
// ---------------------------------------------------------------------------

/// How a requested key was matched against the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The key is a column name.
    Exact,
    /// `log_<key>` exists; values are `10^stored`.
    FromLog,
    /// The key is `log_<name>` and `<name>` exists; values are `log10(stored)`.
    ToLog,
}

/// Look up `key` in `table`:
///
/// 1. exact column name → values unchanged
/// 2. `log_<key>` exists → `10^v` elementwise
/// 3. `key` starts with `log_` and the stripped name exists → `log10(v)` elementwise
/// 4. otherwise a lookup error naming `key`, `path` and every column
///
/// No domain checks: `log10` of non-positive values yields NaN or -inf.
pub fn resolve_column(
    table: &DataTable,
    key: &str,
    path: &Path,
) -> Result<(Vec<f64>, Resolution)> {
    if let Some(values) = table.column(key) {
        return Ok((values.to_vec(), Resolution::Exact));
    }

    if let Some(values) = table.column(&format!("{LOG_PREFIX}{key}")) {
        return Ok((
            values.iter().map(|&v| 10f64.powf(v)).collect(),
            Resolution::FromLog,
        ));
    }

    if let Some(values) = key.strip_prefix(LOG_PREFIX).and_then(|s| table.column(s)) {
        return Ok((
            values.iter().map(|&v| v.log10()).collect(),
            Resolution::ToLog,
        ));
    }

    Err(PlotError::Lookup {
        path: path.to_path_buf(),
        key: key.to_string(),
        available: table.column_names().to_vec(),
    })
}
