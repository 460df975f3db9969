//! Read-only curve queries

use chrono::NaiveDate;
use curve_core::config::CurveDefaults;
use curve_core::market_data::curves::{DateCurve, Horizon};
use curve_core::types::BusinessDayConvention;
use std::path::Path;
use tracing::info;

use super::load_curve;
use crate::{CliError, Result};

/// Run the value command
pub fn value(path: &Path, defaults: &CurveDefaults, date: NaiveDate, ad: Option<u8>) -> Result<()> {
    let mut curve = load_curve(path, defaults)?;
    if let Some(order) = ad {
        curve.set_order(order)?;
    }
    info!("Evaluating {} at {}", curve.curve_id(), date);
    let value = curve.value_at(date)?;
    println!("{}", value);
    Ok(())
}

/// Run the rate command
pub fn rate(
    path: &Path,
    defaults: &CurveDefaults,
    effective: NaiveDate,
    termination: Horizon,
    modifier: Option<BusinessDayConvention>,
) -> Result<()> {
    let curve = load_curve(path, defaults)?;
    match curve.rate_between(effective, termination, modifier)? {
        Some(rate) => println!("{}", rate),
        None => {
            return Err(CliError::InvalidArgument(format!(
                "rate from {} is undetermined: zero discount factor at termination",
                effective
            )))
        }
    }
    Ok(())
}

/// Run the nodes command
pub fn nodes(path: &Path, defaults: &CurveDefaults) -> Result<()> {
    let curve = load_curve(path, defaults)?;
    println!("\n┌────────────┬────────────────────┐");
    println!("│ Date       │ Value              │");
    println!("├────────────┼────────────────────┤");
    for (date, value) in curve.nodes() {
        println!("│ {} │ {:<18.12} │", date, value);
    }
    println!("└────────────┴────────────────────┘");
    Ok(())
}
