/// Rendering configuration: parameter schema, style files, format tokens.
///
/// Precedence, lowest first:
/// ```text
///   schema defaults  →  --style-file  →  --rcParams
/// ```

pub mod rc_params;
pub mod style;

use std::path::Path;

use crate::error::Result;
use rc_params::RcParams;

/// Resolve the final parameters before any file is touched.
pub fn build_rc_params<S: AsRef<str>>(
    style_file: Option<&Path>,
    overrides: &[S],
) -> Result<RcParams> {
    let mut params = RcParams::default();
    if let Some(path) = style_file {
        style::apply_style_file(&mut params, path)?;
        log::info!("Applied style file {}", path.display());
    }
    params.apply_pairs(overrides)?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_beat_style_file() {
        let path =
            std::env::temp_dir().join(format!("starplot-precedence-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"lines.linewidth": 4, "axes.grid": "f"}"#).unwrap();

        let params = build_rc_params(Some(path.as_path()), &["lines.linewidth", "0.5"]).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(params.line_width, 0.5);
        assert!(!params.grid);
    }

    #[test]
    fn test_no_configuration_gives_defaults() {
        let params = build_rc_params::<&str>(None, &[]).unwrap();
        assert_eq!(params, RcParams::default());
    }
}
