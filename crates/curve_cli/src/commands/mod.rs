//! CLI command implementations
//!
//! - `inspect`: read-only queries (value, rate, nodes)
//! - `transform`: shift, translate and roll, writing a new curve

pub mod inspect;
pub mod transform;

use curve_core::config::CurveDefaults;
use curve_core::market_data::curves::CurveEnum;
use std::path::Path;
use tracing::info;

use crate::{CliError, Result};

/// Curve defaults from `path` (if any) and the environment.
pub fn load_defaults(path: Option<&Path>) -> Result<CurveDefaults> {
    if let Some(path) = path {
        if !path.exists() {
            return Err(CliError::FileNotFound(path.display().to_string()));
        }
    }
    Ok(CurveDefaults::load(path)?)
}

/// Load a persisted curve of either kind.
pub fn load_curve(path: &Path, defaults: &CurveDefaults) -> Result<CurveEnum> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    let json = std::fs::read_to_string(path)?;
    let curve = CurveEnum::from_json_with(&json, defaults)?;
    info!("Loaded curve from {}", path.display());
    Ok(curve)
}

/// Write `curve` as JSON to `output`, or to stdout.
pub fn write_curve(curve: &CurveEnum, output: Option<&Path>) -> Result<()> {
    let json = curve.to_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            info!("Curve written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve_core::market_data::curves::DateCurve;

    #[test]
    fn test_missing_curve_file() {
        let err = load_curve(Path::new("/nonexistent/curve.json"), &CurveDefaults::default())
            .unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_write_then_load() {
        let dir = std::env::temp_dir();
        let input = dir.join(format!("curves_cli_in_{}.json", std::process::id()));
        let output = dir.join(format!("curves_cli_out_{}.json", std::process::id()));
        std::fs::write(
            &input,
            r#"{"kind": "value", "id": "lvl_", "nodes": {"2022-01-01": 2.0, "2022-07-01": 3.0}}"#,
        )
        .unwrap();

        let defaults = CurveDefaults::default();
        let curve = load_curve(&input, &defaults).unwrap();
        write_curve(&curve.shifted(100.0).unwrap(), Some(&output)).unwrap();
        let shifted = load_curve(&output, &defaults).unwrap();
        std::fs::remove_file(&input).ok();
        std::fs::remove_file(&output).ok();

        assert_eq!(curve.curve_id(), "lvl_");
        assert_ne!(shifted.curve_id(), "lvl_");
        assert_eq!(shifted.real_value(curve.anchor_date()).unwrap(), 3.0);
    }
}
