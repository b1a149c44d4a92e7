use std::path::PathBuf;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Every failure the load → resolve → plot pipeline can produce.
/// None of them are recovered from; `main` reports and exits.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        /// 1-based line number in the source file.
        line: usize,
        message: String,
    },

    #[error(
        "column '{key}' not found in {}; available columns: {}",
        path.display(),
        available.join(", ")
    )]
    Lookup {
        path: PathBuf,
        key: String,
        available: Vec<String>,
    },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, PlotError>;

impl PlotError {
    pub fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        PlotError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        PlotError::Config(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_message_lists_columns_in_order() {
        let err = PlotError::Lookup {
            path: PathBuf::from("profile1.data"),
            key: "nonexistent_col".to_string(),
            available: vec!["radius".to_string(), "rho".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "column 'nonexistent_col' not found in profile1.data; available columns: radius, rho"
        );
    }

    #[test]
    fn test_parse_message_has_location() {
        let err = PlotError::parse("history.data", 7, "expected 3 values, found 2");
        assert_eq!(err.to_string(), "history.data:7: expected 3 values, found 2");
    }
}
