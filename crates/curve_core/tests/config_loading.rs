//! Loading construction defaults from TOML and applying them to persisted
//! curves.

use chrono::NaiveDate;
use curve_core::config::{ConfigError, CurveDefaults, CurveParams};
use curve_core::market_data::curves::{Curve, CurveKind, Interpolation};
use curve_core::math::interpolators::LocalInterpolation;
use curve_core::types::{Calendar, DayCountConvention, NamedCalendar};
use std::path::PathBuf;

fn write_config(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("curve_core_{}_{}.toml", name, std::process::id()));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_from_file() {
    let path = write_config(
        "from_file",
        r#"
        discount_interpolation = "flat_backward"
        convention = "ACT365F"
        calendar = { weekmask = "Mon Tue Wed Thu", holidays = ["2022-12-26"] }
        "#,
    );
    let config = CurveDefaults::from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.discount_interpolation, LocalInterpolation::FlatBackward);
    assert_eq!(config.convention, DayCountConvention::Act365F);
    let calendar = config.calendar().unwrap();
    assert!(!calendar.is_business_day(NaiveDate::from_ymd_opt(2022, 12, 26).unwrap()));
    assert!(!calendar.is_business_day(NaiveDate::from_ymd_opt(2022, 12, 30).unwrap()));
    assert!(calendar.is_business_day(NaiveDate::from_ymd_opt(2022, 12, 29).unwrap()));
}

#[test]
fn test_missing_file() {
    let err = CurveDefaults::from_file(&PathBuf::from("/nonexistent/curves.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileError(_)));
}

#[test]
fn test_defaults_fill_persisted_gaps() {
    let config = CurveDefaults::from_toml_str(
        r#"
        discount_interpolation = "linear_zero_rate"
        calendar = "tgt"
        "#,
    )
    .unwrap();
    let curve = Curve::from_json_with(
        r#"{"nodes": {"2022-01-01": 1.0, "2022-12-30": 0.97}, "convention": "ACT365F"}"#,
        &config,
    )
    .unwrap();
    assert_eq!(
        curve.interpolation(),
        &Interpolation::Local(LocalInterpolation::LinearZeroRate)
    );
    assert_eq!(curve.calendar(), &Calendar::Named(NamedCalendar::Tgt));
    assert_eq!(curve.convention(), DayCountConvention::Act365F);

    let params = CurveParams::from_defaults(&config, CurveKind::Discount).unwrap();
    assert_eq!(params.calendar, Calendar::Named(NamedCalendar::Tgt));
}
