//! Curve transformations
//!
//! Each command loads a curve, applies one transformation and writes the
//! new curve. The input file is never modified unless it is also `--output`.

use chrono::NaiveDate;
use curve_core::config::CurveDefaults;
use curve_core::market_data::curves::{DateCurve, Horizon};
use std::path::Path;
use tracing::info;

use super::{load_curve, write_curve};
use crate::Result;

/// Run the shift command
pub fn shift(path: &Path, defaults: &CurveDefaults, spread: f64, output: Option<&Path>) -> Result<()> {
    let curve = load_curve(path, defaults)?;
    info!("Shifting {} by {}bp", curve.curve_id(), spread);
    write_curve(&curve.shifted(spread)?, output)
}

/// Run the translate command
pub fn translate(
    path: &Path,
    defaults: &CurveDefaults,
    start: NaiveDate,
    extend_knots: bool,
    output: Option<&Path>,
) -> Result<()> {
    let curve = load_curve(path, defaults)?;
    info!("Translating {} to {}", curve.curve_id(), start);
    write_curve(&curve.translated(start, extend_knots)?, output)
}

/// Run the roll command
pub fn roll(path: &Path, defaults: &CurveDefaults, target: Horizon, output: Option<&Path>) -> Result<()> {
    let curve = load_curve(path, defaults)?;
    info!("Rolling {} to {:?}", curve.curve_id(), target);
    write_curve(&curve.rolled(target)?, output)
}
