/// Data layer: file model, loading, and column resolution.
///
/// Architecture:
/// ```text
///   profile / history file
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  fixed five-line layout → ProfileFile
///   └──────────┘
///        │
///        ▼
///   ┌─────────────────────────┐
///   │ HeaderRecord, DataTable │  named scalars, named f64 columns
///   └─────────────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resolve  │  key → values, with log_ fallbacks
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod resolve;
