//! JSON persistence for curves.

use super::engine::{CurveCore, CurveKind};
use super::curve::Curve;
use super::interpolation::Interpolation;
use super::nodes::NodeSet;
use super::spline_adapter::Endpoints;
use super::value_curve::ValueCurve;
use crate::config::{CurveDefaults, CurveParams};
use crate::types::{
    BusinessDayConvention, Calendar, CalendarDescriptor, CurveError, DayCountConvention, Result,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Serialised form of a curve.
///
/// Node values are stored as reals; the differentiation order is stored
/// separately and re-applied on load. Optional fields fall back to
/// [`CurveDefaults`] when absent.
///
/// ```json
/// {
///   "kind": "discount",
///   "nodes": {"2022-01-01": 1.0, "2023-01-01": 0.97},
///   "interpolation": "log_linear",
///   "id": "sofr_",
///   "convention": "ACT360",
///   "ad": 1
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveRecord {
    /// Node value semantics
    #[serde(default = "default_kind")]
    pub kind: CurveKind,
    /// Node dates and real values
    pub nodes: BTreeMap<NaiveDate, f64>,
    /// Local rule name, or `"custom"`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interpolation: Option<String>,
    /// Spline knot dates
    #[serde(default, rename = "t", skip_serializing_if = "Option::is_none")]
    pub knots: Option<Vec<NaiveDate>>,
    /// Frozen spline coefficients
    #[serde(default, rename = "c", skip_serializing_if = "Option::is_none")]
    pub coefficients: Option<Vec<f64>>,
    /// Curve identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Day count convention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub convention: Option<DayCountConvention>,
    /// Business day modifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<BusinessDayConvention>,
    /// Spline endpoint pair
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoints: Option<Endpoints>,
    /// Calendar descriptor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<CalendarDescriptor>,
    /// Differentiation order
    #[serde(default)]
    pub ad: u8,
}

fn default_kind() -> CurveKind {
    CurveKind::Discount
}

impl CurveRecord {
    pub(crate) fn from_core(core: &CurveCore) -> Self {
        Self {
            kind: core.kind(),
            nodes: core.real_nodes().iter().map(|(d, v)| (d, *v)).collect(),
            interpolation: Some(core.interpolation().name().to_string()),
            knots: core.knots().map(<[NaiveDate]>::to_vec),
            coefficients: core.coefficients().map(<[f64]>::to_vec),
            id: Some(core.id().to_string()),
            convention: Some(core.convention()),
            modifier: Some(core.modifier()),
            endpoints: Some(core.endpoints()),
            calendar: Some(
                core.calendar()
                    .descriptor()
                    .unwrap_or_else(|| CalendarDescriptor::Named("null".into())),
            ),
            ad: core.ad_order(),
        }
    }

    /// Parse a record from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the record as JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Node set and construction parameters, filling gaps from `defaults`.
    ///
    /// # Errors
    /// - `UnknownInterpolation` for `"custom"` or an unrecognised rule
    /// - `InvalidCalendar` for a malformed calendar descriptor
    /// - node validation errors from [`NodeSet::new`]
    pub fn into_parts(self, defaults: &CurveDefaults) -> Result<(NodeSet<f64>, CurveParams)> {
        let interpolation = match self.interpolation.as_deref() {
            None => Interpolation::Local(defaults.interpolation_for(self.kind)),
            Some("custom") => {
                return Err(CurveError::UnknownInterpolation(
                    "custom functions cannot be deserialised".into(),
                ))
            }
            Some(name) => name.parse()?,
        };
        let calendar =
            Calendar::from_descriptor(self.calendar.as_ref().or(defaults.calendar.as_ref()))?;
        let nodes = NodeSet::from_pairs(self.nodes)?;
        let params = CurveParams {
            interpolation: Some(interpolation),
            knots: self.knots,
            coefficients: self.coefficients,
            endpoints: self.endpoints.unwrap_or(defaults.endpoints),
            id: self.id,
            convention: self.convention.unwrap_or(defaults.convention),
            modifier: self.modifier.unwrap_or(defaults.modifier),
            calendar,
            ad: self.ad,
        };
        Ok((nodes, params))
    }
}

impl Curve {
    /// Serialise to JSON.
    ///
    /// # Example
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use curve_core::config::CurveParams;
    /// use curve_core::market_data::curves::Curve;
    ///
    /// let d = |m| NaiveDate::from_ymd_opt(2022, m, 1).unwrap();
    /// let curve = Curve::from_pairs(vec![(d(1), 1.0), (d(7), 0.98)], CurveParams::default())
    ///     .unwrap();
    /// let restored = Curve::from_json(&curve.to_json().unwrap()).unwrap();
    /// assert_eq!(restored, curve);
    /// ```
    pub fn to_json(&self) -> Result<String> {
        CurveRecord::from_core(&self.core).to_json()
    }

    /// Deserialise from JSON using built-in defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with(json, &CurveDefaults::default())
    }

    /// Deserialise from JSON using `defaults` for missing fields.
    pub fn from_json_with(json: &str, defaults: &CurveDefaults) -> Result<Self> {
        Self::from_record(CurveRecord::from_json(json)?, defaults)
    }

    /// Build from a record. The record's kind is ignored.
    pub fn from_record(record: CurveRecord, defaults: &CurveDefaults) -> Result<Self> {
        let record = CurveRecord {
            kind: CurveKind::Discount,
            ..record
        };
        let (nodes, params) = record.into_parts(defaults)?;
        Self::new(nodes, params)
    }

    /// Persistable record of this curve.
    pub fn to_record(&self) -> CurveRecord {
        CurveRecord::from_core(&self.core)
    }
}

impl ValueCurve {
    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        CurveRecord::from_core(&self.core).to_json()
    }

    /// Deserialise from JSON using built-in defaults for missing fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_json_with(json, &CurveDefaults::default())
    }

    /// Deserialise from JSON using `defaults` for missing fields.
    pub fn from_json_with(json: &str, defaults: &CurveDefaults) -> Result<Self> {
        Self::from_record(CurveRecord::from_json(json)?, defaults)
    }

    /// Build from a record. The record's kind is ignored.
    pub fn from_record(record: CurveRecord, defaults: &CurveDefaults) -> Result<Self> {
        let record = CurveRecord {
            kind: CurveKind::Value,
            ..record
        };
        let (nodes, params) = record.into_parts(defaults)?;
        Self::new(nodes, params)
    }

    /// Persistable record of this curve.
    pub fn to_record(&self) -> CurveRecord {
        CurveRecord::from_core(&self.core)
    }
}
