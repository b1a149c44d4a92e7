use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

// ---------------------------------------------------------------------------
// HeaderValue – a single scalar in the header block
// ---------------------------------------------------------------------------

/// A header scalar. Quoted tokens stay text, everything else is numeric.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum HeaderValue {
    Number(f64),
    Text(String),
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderValue::Number(v) => write!(f, "{v}"),
            HeaderValue::Text(s) => write!(f, "\"{s}\""),
        }
    }
}

// ---------------------------------------------------------------------------
// HeaderRecord – the single-row header block
// ---------------------------------------------------------------------------

/// One row of named scalars, in file order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HeaderRecord {
    fields: Vec<(String, HeaderValue)>,
}

impl HeaderRecord {
    pub fn new(fields: Vec<(String, HeaderValue)>) -> Self {
        Self { fields }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&HeaderValue> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}

// ---------------------------------------------------------------------------
// DataTable – named numeric columns of equal length
// ---------------------------------------------------------------------------

/// The data block: column names in file order, one `f64` vector each.
#[derive(Debug, Clone, Default)]
pub struct DataTable {
    column_names: Vec<String>,
    columns: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
}

impl DataTable {
    /// Build a table from ordered `(name, values)` pairs.
    ///
    /// Callers guarantee unique names and equal column lengths; the loader
    /// enforces both before getting here.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> Self {
        let mut table = DataTable::default();
        for (name, values) in columns {
            table.index.insert(name.clone(), table.columns.len());
            table.column_names.push(name);
            table.columns.push(values);
        }
        table
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.index.get(name).map(|&i| self.columns[i].as_slice())
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ---------------------------------------------------------------------------
// ProfileFile – one parsed input file
// ---------------------------------------------------------------------------

/// Both blocks of one input file plus the path it came from.
#[derive(Debug, Clone)]
pub struct ProfileFile {
    pub path: PathBuf,
    pub header: HeaderRecord,
    pub data: DataTable,
}

impl ProfileFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Legend text for this file: the path exactly as given.
    pub fn label(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_preserves_column_order() {
        let table = DataTable::from_columns(vec![
            ("zone".to_string(), vec![1.0, 2.0]),
            ("mass".to_string(), vec![0.5, 0.25]),
            ("logT".to_string(), vec![7.1, 6.9]),
        ]);
        assert_eq!(table.column_names(), &["zone", "mass", "logT"]);
        assert_eq!(table.column("mass"), Some(&[0.5, 0.25][..]));
        assert_eq!(table.len(), 2);
        assert!(table.column("radius").is_none());
    }

    #[test]
    fn test_header_lookup() {
        let header = HeaderRecord::new(vec![
            ("M".to_string(), HeaderValue::Number(1.0)),
            ("version".to_string(), HeaderValue::Text("r24.03.1".to_string())),
        ]);
        assert_eq!(header.len(), 2);
        assert_eq!(header.get("M"), Some(&HeaderValue::Number(1.0)));
        assert_eq!(
            header.get("version").map(|v| v.to_string()).as_deref(),
            Some("\"r24.03.1\"")
        );
        assert_eq!(header.names().collect::<Vec<_>>(), vec!["M", "version"]);
    }

    #[test]
    fn test_header_serializes_values_untagged() {
        let header = HeaderRecord::new(vec![("M".to_string(), HeaderValue::Number(1.5))]);
        let json = serde_json::to_string(&header).unwrap();
        assert_eq!(json, r#"{"fields":[["M",1.5]]}"#);
    }
}
