//! Curve construction defaults and parameters.
//!
//! [`CurveDefaults`] holds the process-wide fallbacks (interpolation per
//! curve kind, day count, modifier, spline endpoints, calendar). They are
//! loaded from a TOML file and `CURVE_DEFAULT_*` environment variables, with
//! the environment taking precedence:
//!
//! ```toml
//! discount_interpolation = "log_linear"
//! value_interpolation = "linear"
//! convention = "ACT360"
//! modifier = "MF"
//! endpoints = "natural"
//! calendar = "tgt"
//! ```
//!
//! [`CurveParams`] is the per-curve parameter set passed to constructors.

use crate::market_data::curves::{CurveKind, Endpoints, Interpolation};
use crate::math::interpolators::LocalInterpolation;
use crate::types::{
    BusinessDayConvention, Calendar, CalendarDescriptor, CurveError, DayCountConvention,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Configuration file error: {0}")]
    FileError(String),

    /// The configuration file is not valid TOML for [`CurveDefaults`].
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// A setting holds a value outside its accepted set.
    #[error("Invalid value for {key}: {source}")]
    InvalidValue {
        /// Setting name
        key: &'static str,
        /// Underlying parse or validation failure
        #[source]
        source: CurveError,
    },
}

impl ConfigError {
    fn invalid(key: &'static str) -> impl FnOnce(CurveError) -> ConfigError {
        move |source| ConfigError::InvalidValue { key, source }
    }
}

/// Fallback parameters for curve construction and deserialisation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurveDefaults {
    /// Local interpolation for discount factor curves
    pub discount_interpolation: LocalInterpolation,
    /// Local interpolation for level curves
    pub value_interpolation: LocalInterpolation,
    /// Day count convention for rates
    pub convention: DayCountConvention,
    /// Business day adjustment for tenors
    pub modifier: BusinessDayConvention,
    /// Spline boundary conditions
    pub endpoints: Endpoints,
    /// Holiday calendar; none means every day is a business day
    pub calendar: Option<CalendarDescriptor>,
}

impl Default for CurveDefaults {
    fn default() -> Self {
        Self {
            discount_interpolation: LocalInterpolation::LogLinear,
            value_interpolation: LocalInterpolation::Linear,
            convention: DayCountConvention::Act360,
            modifier: BusinessDayConvention::ModifiedFollowing,
            endpoints: Endpoints::default(),
            calendar: None,
        }
    }
}

impl CurveDefaults {
    /// Load defaults from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse defaults from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CurveDefaults =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `CURVE_DEFAULT_*` environment overrides applied.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Build defaults from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Config file
    /// 3. Default values
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Override settings from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("CURVE_DEFAULT_DISCOUNT_INTERPOLATION") {
            self.discount_interpolation = v
                .parse()
                .map_err(ConfigError::invalid("discount_interpolation"))?;
        }
        if let Some(v) = lookup("CURVE_DEFAULT_VALUE_INTERPOLATION") {
            self.value_interpolation = v
                .parse()
                .map_err(ConfigError::invalid("value_interpolation"))?;
        }
        if let Some(v) = lookup("CURVE_DEFAULT_CONVENTION") {
            self.convention = v.parse().map_err(ConfigError::invalid("convention"))?;
        }
        if let Some(v) = lookup("CURVE_DEFAULT_MODIFIER") {
            self.modifier = v.parse().map_err(ConfigError::invalid("modifier"))?;
        }
        if let Some(v) = lookup("CURVE_DEFAULT_ENDPOINTS") {
            self.endpoints = v.parse().map_err(ConfigError::invalid("endpoints"))?;
        }
        if let Some(v) = lookup("CURVE_DEFAULT_CALENDAR") {
            let calendar: Calendar = v.parse().map_err(ConfigError::invalid("calendar"))?;
            self.calendar = calendar.descriptor();
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calendar()?;
        Ok(())
    }

    /// The configured calendar.
    pub fn calendar(&self) -> Result<Calendar, ConfigError> {
        Calendar::from_descriptor(self.calendar.as_ref()).map_err(ConfigError::invalid("calendar"))
    }

    /// Default local interpolation for `kind`.
    pub fn interpolation_for(&self, kind: CurveKind) -> LocalInterpolation {
        match kind {
            CurveKind::Discount => self.discount_interpolation,
            CurveKind::Value => self.value_interpolation,
        }
    }
}

/// Parameters for constructing a curve.
///
/// `Default` gives the built-in defaults with the interpolation left to the
/// curve kind (`log_linear` for discount factors, `linear` for levels).
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use curve_core::config::CurveParams;
/// use curve_core::math::interpolators::LocalInterpolation;
/// use curve_core::types::DayCountConvention;
///
/// let params = CurveParams::default()
///     .with_interpolation(LocalInterpolation::FlatBackward)
///     .with_convention(DayCountConvention::Act365F)
///     .with_id("sofr_")
///     .with_ad_order(1);
/// assert_eq!(params.ad, 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CurveParams {
    /// Local interpolation; `None` uses the curve kind's default
    pub interpolation: Option<Interpolation>,
    /// Clamped spline knot dates
    pub knots: Option<Vec<NaiveDate>>,
    /// Frozen spline coefficients, `knots.len() - 4` of them
    pub coefficients: Option<Vec<f64>>,
    /// Spline boundary conditions
    pub endpoints: Endpoints,
    /// Curve identity; `None` draws a random one
    pub id: Option<String>,
    /// Day count convention for rates
    pub convention: DayCountConvention,
    /// Business day adjustment for tenors
    pub modifier: BusinessDayConvention,
    /// Holiday calendar for tenor arithmetic
    pub calendar: Calendar,
    /// Differentiation order, 0, 1 or 2
    pub ad: u8,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            interpolation: None,
            knots: None,
            coefficients: None,
            endpoints: Endpoints::default(),
            id: None,
            convention: DayCountConvention::Act360,
            modifier: BusinessDayConvention::ModifiedFollowing,
            calendar: Calendar::Null,
            ad: 0,
        }
    }
}

impl CurveParams {
    /// Parameters for a curve of `kind` taken from `defaults`.
    pub fn from_defaults(defaults: &CurveDefaults, kind: CurveKind) -> Result<Self, ConfigError> {
        Ok(Self {
            interpolation: Some(Interpolation::Local(defaults.interpolation_for(kind))),
            endpoints: defaults.endpoints,
            convention: defaults.convention,
            modifier: defaults.modifier,
            calendar: defaults.calendar()?,
            ..Self::default()
        })
    }

    /// Set the local interpolation or a custom function.
    pub fn with_interpolation(mut self, interpolation: impl Into<Interpolation>) -> Self {
        self.interpolation = Some(interpolation.into());
        self
    }

    /// Add a spline tail over `knots`.
    pub fn with_knots(mut self, knots: Vec<NaiveDate>) -> Self {
        self.knots = Some(knots);
        self
    }

    /// Freeze the spline coefficients.
    pub fn with_coefficients(mut self, coefficients: Vec<f64>) -> Self {
        self.coefficients = Some(coefficients);
        self
    }

    /// Set the spline boundary conditions.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Set the curve identity.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the day count convention.
    pub fn with_convention(mut self, convention: DayCountConvention) -> Self {
        self.convention = convention;
        self
    }

    /// Set the business day modifier.
    pub fn with_modifier(mut self, modifier: BusinessDayConvention) -> Self {
        self.modifier = modifier;
        self
    }

    /// Set the holiday calendar.
    pub fn with_calendar(mut self, calendar: Calendar) -> Self {
        self.calendar = calendar;
        self
    }

    /// Set the differentiation order.
    pub fn with_ad_order(mut self, ad: u8) -> Self {
        self.ad = ad;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::curves::SplineEndpoint;
    use crate::types::NamedCalendar;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = CurveDefaults::default();
        assert_eq!(config.discount_interpolation, LocalInterpolation::LogLinear);
        assert_eq!(config.value_interpolation, LocalInterpolation::Linear);
        assert_eq!(config.convention, DayCountConvention::Act360);
        assert_eq!(config.modifier, BusinessDayConvention::ModifiedFollowing);
        assert_eq!(config.endpoints, Endpoints::both(SplineEndpoint::Natural));
        assert_eq!(config.calendar().unwrap(), Calendar::Null);
    }

    #[test]
    fn test_from_toml_partial() {
        let config = CurveDefaults::from_toml_str(
            r#"
            convention = "ACT365F"
            endpoints = ["natural", "not_a_knot"]
            calendar = "tgt"
            "#,
        )
        .unwrap();
        assert_eq!(config.convention, DayCountConvention::Act365F);
        assert_eq!(
            config.endpoints,
            Endpoints::new(SplineEndpoint::Natural, SplineEndpoint::NotAKnot)
        );
        assert_eq!(config.calendar().unwrap(), Calendar::Named(NamedCalendar::Tgt));
        assert_eq!(config.discount_interpolation, LocalInterpolation::LogLinear);
    }

    #[test]
    fn test_from_toml_rejects_unknown_values() {
        assert!(matches!(
            CurveDefaults::from_toml_str(r#"modifier = "sideways""#),
            Err(ConfigError::ParseError(_))
        ));
        assert!(matches!(
            CurveDefaults::from_toml_str(r#"calendar = "mars""#),
            Err(ConfigError::InvalidValue { key: "calendar", .. })
        ));
        assert!(matches!(
            CurveDefaults::from_toml_str(r#"colour = "blue""#),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("CURVE_DEFAULT_VALUE_INTERPOLATION", "flat_forward"),
            ("CURVE_DEFAULT_MODIFIER", "F"),
            ("CURVE_DEFAULT_CALENDAR", "bus"),
        ]
        .into_iter()
        .collect();
        let mut config = CurveDefaults::default();
        config
            .apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.value_interpolation, LocalInterpolation::FlatForward);
        assert_eq!(config.modifier, BusinessDayConvention::Following);
        assert_eq!(config.calendar().unwrap(), Calendar::Named(NamedCalendar::Bus));
    }

    #[test]
    fn test_override_error_names_key() {
        let mut config = CurveDefaults::default();
        let err = config
            .apply_overrides(|key| {
                (key == "CURVE_DEFAULT_ENDPOINTS").then(|| "clamped".to_string())
            })
            .unwrap_err();
        assert!(err.to_string().starts_with("Invalid value for endpoints"));
    }

    #[test]
    fn test_params_from_defaults() {
        let config = CurveDefaults {
            convention: DayCountConvention::Thirty360,
            ..Default::default()
        };
        let params = CurveParams::from_defaults(&config, CurveKind::Value).unwrap();
        assert_eq!(
            params.interpolation,
            Some(Interpolation::Local(LocalInterpolation::Linear))
        );
        assert_eq!(params.convention, DayCountConvention::Thirty360);
        assert_eq!(params.ad, 0);
        assert!(params.id.is_none());
    }
}
