//! Shared engine behind [`Curve`](super::Curve) and [`ValueCurve`](super::ValueCurve).
//!
//! Node values live in one monomorphic [`CurveState`] per differentiation
//! order, held in an enum and dispatched once per public call. All
//! evaluation code is written once against [`Number`].

use super::interpolation::{DynInterpolationFn, Interpolation};
use super::nodes::NodeSet;
use super::spline_adapter::{day_ordinal, Endpoints, SplineAdapter};
use crate::config::CurveParams;
use crate::math::bracket::index_left;
use crate::math::interpolators::LocalInterpolation;
use crate::types::{
    add_tenor, BusinessDayConvention, Calendar, CurveError, DayCountConvention, Dual, Dual2,
    Number, Result, Tenor,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, trace};
use uuid::Uuid;

/// Which semantics a curve's node values carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveKind {
    /// Discount factors: spline fitted in log space, rates from ratios.
    Discount,
    /// Levels: spline fitted on raw values, rate is the value itself.
    Value,
}

impl CurveKind {
    /// Interpolation used when none is specified.
    pub fn default_interpolation(&self) -> LocalInterpolation {
        match self {
            CurveKind::Discount => LocalInterpolation::LogLinear,
            CurveKind::Value => LocalInterpolation::Linear,
        }
    }

    fn log_space(&self) -> bool {
        matches!(self, CurveKind::Discount)
    }
}

/// A date, or a tenor measured from some reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    /// An explicit date
    Date(NaiveDate),
    /// A period such as `"6m"`
    Tenor(Tenor),
}

impl From<NaiveDate> for Horizon {
    fn from(date: NaiveDate) -> Self {
        Horizon::Date(date)
    }
}

impl From<Tenor> for Horizon {
    fn from(tenor: Tenor) -> Self {
        Horizon::Tenor(tenor)
    }
}

impl FromStr for Horizon {
    type Err = CurveError;

    /// Parses an ISO date (`2022-06-01`) or a tenor (`6m`).
    fn from_str(s: &str) -> Result<Self> {
        match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
            Ok(date) => Ok(Horizon::Date(date)),
            Err(_) => s.parse::<Tenor>().map(Horizon::Tenor),
        }
    }
}

/// A curve output at the curve's current differentiation order.
#[derive(Debug, Clone, PartialEq)]
pub enum CurveValue {
    /// Order 0
    Float(f64),
    /// Order 1
    Dual(Dual),
    /// Order 2
    Dual2(Dual2),
}

impl CurveValue {
    /// Real part.
    pub fn real(&self) -> f64 {
        match self {
            CurveValue::Float(v) => *v,
            CurveValue::Dual(v) => v.real(),
            CurveValue::Dual2(v) => v.real(),
        }
    }

    /// Differentiation order of this value.
    pub fn order(&self) -> u8 {
        match self {
            CurveValue::Float(_) => 0,
            CurveValue::Dual(_) => 1,
            CurveValue::Dual2(_) => 2,
        }
    }

    /// First derivative with respect to `tag` (zero at order 0).
    pub fn gradient(&self, tag: &str) -> f64 {
        match self {
            CurveValue::Float(_) => 0.0,
            CurveValue::Dual(v) => v.gradient(tag),
            CurveValue::Dual2(v) => v.gradient(tag),
        }
    }

    /// Second derivative with respect to `a` and `b` (zero below order 2).
    pub fn hessian(&self, a: &str, b: &str) -> f64 {
        match self {
            CurveValue::Dual2(v) => v.hessian(a, b),
            _ => 0.0,
        }
    }

    /// Variable tags carried, in gradient order.
    pub fn vars(&self) -> &[String] {
        match self {
            CurveValue::Float(_) => &[],
            CurveValue::Dual(v) => v.vars(),
            CurveValue::Dual2(v) => v.vars(),
        }
    }

    /// The first order value, if this is one.
    pub fn as_dual(&self) -> Option<&Dual> {
        match self {
            CurveValue::Dual(v) => Some(v),
            _ => None,
        }
    }

    /// The second order value, if this is one.
    pub fn as_dual2(&self) -> Option<&Dual2> {
        match self {
            CurveValue::Dual2(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for CurveValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.real())?;
        let vars = self.vars();
        if !vars.is_empty() {
            let grads: Vec<String> = vars
                .iter()
                .map(|v| format!("{}: {}", v, self.gradient(v)))
                .collect();
            write!(f, " [{}]", grads.join(", "))?;
        }
        Ok(())
    }
}

/// Node value types a curve can hold.
pub(crate) trait NodeValue: Number {
    fn custom(f: &dyn DynInterpolationFn, date: NaiveDate, nodes: &NodeSet<Self>) -> Self;
    fn into_curve_value(self) -> CurveValue;
}

impl NodeValue for f64 {
    fn custom(f: &dyn DynInterpolationFn, date: NaiveDate, nodes: &NodeSet<Self>) -> Self {
        f.evaluate_f64(date, nodes)
    }

    fn into_curve_value(self) -> CurveValue {
        CurveValue::Float(self)
    }
}

impl NodeValue for Dual {
    fn custom(f: &dyn DynInterpolationFn, date: NaiveDate, nodes: &NodeSet<Self>) -> Self {
        f.evaluate_dual(date, nodes)
    }

    fn into_curve_value(self) -> CurveValue {
        CurveValue::Dual(self)
    }
}

impl NodeValue for Dual2 {
    fn custom(f: &dyn DynInterpolationFn, date: NaiveDate, nodes: &NodeSet<Self>) -> Self {
        f.evaluate_dual2(date, nodes)
    }

    fn into_curve_value(self) -> CurveValue {
        CurveValue::Dual2(self)
    }
}

/// Nodes and spline at one numeric representation.
#[derive(Debug, Clone)]
pub(crate) struct CurveState<T> {
    nodes: NodeSet<T>,
    spline: Option<SplineAdapter<T>>,
}

impl<T: NodeValue> CurveState<T> {
    fn new(nodes: NodeSet<T>, layout: &SplineLayout<'_>, log_space: bool) -> Result<Self> {
        let spline = match (layout.knots, layout.coefficients) {
            (None, _) => None,
            (Some(knots), Some(c)) => Some(SplineAdapter::frozen(
                knots.to_vec(),
                layout.endpoints,
                c,
                log_space,
            )?),
            (Some(knots), None) => Some(SplineAdapter::solving(
                knots.to_vec(),
                layout.endpoints,
                nodes.dates(),
                log_space,
            )?),
        };
        Ok(Self { nodes, spline })
    }

    fn value(&self, date: NaiveDate, kind: CurveKind, interpolation: &Interpolation) -> Result<T> {
        match &self.spline {
            Some(spline) if date > spline.start() => {
                trace!(%date, "spline evaluation");
                let s = spline.evaluate(date, &self.nodes)?;
                Ok(if kind.log_space() { s.exp() } else { s })
            }
            _ => self.local_value(date, interpolation),
        }
    }

    fn local_value(&self, date: NaiveDate, interpolation: &Interpolation) -> Result<T> {
        let rule = match interpolation {
            Interpolation::Custom(f) => return Ok(T::custom(f.as_ref(), date, &self.nodes)),
            Interpolation::Local(rule) => rule,
        };
        let anchor = self.nodes.anchor();
        if date < anchor {
            return Ok(T::zero());
        }
        let dates = self.nodes.dates();
        let values = self.nodes.values();
        let i = index_left(dates, &date)?;
        trace!(%date, bracket = i, rule = rule.name(), "local evaluation");
        Ok(rule.interpolate(
            day_ordinal(date),
            day_ordinal(dates[i]),
            &values[i],
            day_ordinal(dates[i + 1]),
            &values[i + 1],
            day_ordinal(anchor),
        ))
    }

    fn rate(
        &self,
        effective: NaiveDate,
        termination: NaiveDate,
        dcf: f64,
        kind: CurveKind,
        interpolation: &Interpolation,
    ) -> Result<Option<T>> {
        let start = self.value(effective, kind, interpolation)?;
        let end = self.value(termination, kind, interpolation)?;
        if end.real() == 0.0 {
            return Ok(None);
        }
        Ok(Some((start / end - 1.0) / dcf * 100.0))
    }
}

/// Spline construction inputs shared by every order.
struct SplineLayout<'a> {
    knots: Option<&'a [NaiveDate]>,
    coefficients: Option<&'a [f64]>,
    endpoints: Endpoints,
}

/// Node state at the curve's current differentiation order.
#[derive(Debug, Clone)]
pub(crate) enum AdState {
    Plain(CurveState<f64>),
    First(CurveState<Dual>),
    Second(CurveState<Dual2>),
}

macro_rules! dispatch {
    ($state:expr, |$s:ident| $body:expr) => {
        match $state {
            AdState::Plain($s) => $body,
            AdState::First($s) => $body,
            AdState::Second($s) => $body,
        }
    };
}

impl AdState {
    fn build(
        order: u8,
        nodes: &NodeSet<f64>,
        id: &str,
        layout: &SplineLayout<'_>,
        log_space: bool,
    ) -> Result<Self> {
        match order {
            0 => Ok(AdState::Plain(CurveState::new(nodes.clone(), layout, log_space)?)),
            1 => Ok(AdState::First(CurveState::new(nodes.tagged(id), layout, log_space)?)),
            2 => Ok(AdState::Second(CurveState::new(nodes.tagged(id), layout, log_space)?)),
            other => Err(CurveError::InvalidAdOrder(other)),
        }
    }

    fn order(&self) -> u8 {
        match self {
            AdState::Plain(_) => 0,
            AdState::First(_) => 1,
            AdState::Second(_) => 2,
        }
    }
}

/// Random five hex character identity followed by `_`.
pub(crate) fn default_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}_", &hex[..5])
}

/// Curve engine shared by both curve kinds.
#[derive(Debug, Clone)]
pub(crate) struct CurveCore {
    kind: CurveKind,
    id: String,
    interpolation: Interpolation,
    knots: Option<Vec<NaiveDate>>,
    coefficients: Option<Vec<f64>>,
    endpoints: Endpoints,
    convention: DayCountConvention,
    modifier: BusinessDayConvention,
    calendar: Calendar,
    state: AdState,
}

impl CurveCore {
    pub(crate) fn new(kind: CurveKind, nodes: NodeSet<f64>, params: CurveParams) -> Result<Self> {
        let CurveParams {
            interpolation,
            knots,
            coefficients,
            endpoints,
            id,
            convention,
            modifier,
            calendar,
            ad,
        } = params;
        if coefficients.is_some() && knots.is_none() {
            return Err(CurveError::KnotSequence(
                "coefficients supplied without knots".into(),
            ));
        }
        let id = id.unwrap_or_else(default_id);
        let layout = SplineLayout {
            knots: knots.as_deref(),
            coefficients: coefficients.as_deref(),
            endpoints,
        };
        let state = AdState::build(ad, &nodes, &id, &layout, kind.log_space())?;
        debug!(
            id = %id,
            ?kind,
            nodes = nodes.len(),
            spline = knots.is_some(),
            ad,
            "curve constructed"
        );
        Ok(Self {
            kind,
            interpolation: interpolation
                .unwrap_or_else(|| Interpolation::Local(kind.default_interpolation())),
            id,
            knots,
            coefficients,
            endpoints,
            convention,
            modifier,
            calendar,
            state,
        })
    }

    fn layout(&self) -> SplineLayout<'_> {
        SplineLayout {
            knots: self.knots.as_deref(),
            coefficients: self.coefficients.as_deref(),
            endpoints: self.endpoints,
        }
    }

    pub(crate) fn kind(&self) -> CurveKind {
        self.kind
    }

    pub(crate) fn id(&self) -> &str {
        &self.id
    }

    pub(crate) fn interpolation(&self) -> &Interpolation {
        &self.interpolation
    }

    pub(crate) fn knots(&self) -> Option<&[NaiveDate]> {
        self.knots.as_deref()
    }

    pub(crate) fn coefficients(&self) -> Option<&[f64]> {
        self.coefficients.as_deref()
    }

    pub(crate) fn endpoints(&self) -> Endpoints {
        self.endpoints
    }

    pub(crate) fn convention(&self) -> DayCountConvention {
        self.convention
    }

    pub(crate) fn modifier(&self) -> BusinessDayConvention {
        self.modifier
    }

    pub(crate) fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub(crate) fn ad_order(&self) -> u8 {
        self.state.order()
    }

    pub(crate) fn anchor(&self) -> NaiveDate {
        dispatch!(&self.state, |s| s.nodes.anchor())
    }

    pub(crate) fn node_dates(&self) -> &[NaiveDate] {
        dispatch!(&self.state, |s| s.nodes.dates())
    }

    pub(crate) fn node_values(&self) -> Vec<CurveValue> {
        dispatch!(&self.state, |s| s
            .nodes
            .values()
            .iter()
            .cloned()
            .map(NodeValue::into_curve_value)
            .collect())
    }

    pub(crate) fn real_nodes(&self) -> NodeSet<f64> {
        dispatch!(&self.state, |s| s.nodes.to_real())
    }

    /// Switch differentiation order, re-tagging every node.
    pub(crate) fn set_ad_order(&mut self, order: u8) -> Result<()> {
        if order > 2 {
            return Err(CurveError::InvalidAdOrder(order));
        }
        if order == self.ad_order() {
            return Ok(());
        }
        let nodes = self.real_nodes();
        let state = AdState::build(order, &nodes, &self.id, &self.layout(), self.kind.log_space())?;
        debug!(id = %self.id, from = self.ad_order(), to = order, "ad order changed");
        self.state = state;
        Ok(())
    }

    pub(crate) fn value(&self, date: NaiveDate) -> Result<CurveValue> {
        let (kind, interp) = (self.kind, &self.interpolation);
        dispatch!(&self.state, |s| s
            .value(date, kind, interp)
            .map(NodeValue::into_curve_value))
    }

    pub(crate) fn value_real(&self, date: NaiveDate) -> Result<f64> {
        let (kind, interp) = (self.kind, &self.interpolation);
        dispatch!(&self.state, |s| s.value(date, kind, interp).map(|v| v.real()))
    }

    /// Resolve a horizon against `from`, using `modifier` for tenors.
    pub(crate) fn resolve(
        &self,
        from: NaiveDate,
        horizon: Horizon,
        modifier: Option<BusinessDayConvention>,
    ) -> Result<NaiveDate> {
        match horizon {
            Horizon::Date(date) => Ok(date),
            Horizon::Tenor(tenor) => add_tenor(from, &tenor, modifier, &self.calendar),
        }
    }

    pub(crate) fn discount_rate(
        &self,
        effective: NaiveDate,
        termination: NaiveDate,
    ) -> Result<Option<CurveValue>> {
        let dcf = self.convention.dcf(effective, termination);
        if dcf == 0.0 {
            return Err(CurveError::ZeroDayCount {
                start: effective,
                end: termination,
            });
        }
        let (kind, interp) = (self.kind, &self.interpolation);
        dispatch!(&self.state, |s| s
            .rate(effective, termination, dcf, kind, interp)
            .map(|r| r.map(NodeValue::into_curve_value)))
    }

    /// A new curve over `nodes` and `knots` sharing every other parameter,
    /// with a fresh identity and coefficients solved from the new nodes.
    pub(crate) fn derive(
        &self,
        nodes: NodeSet<f64>,
        knots: Option<Vec<NaiveDate>>,
    ) -> Result<Self> {
        let params = CurveParams {
            interpolation: Some(self.interpolation.clone()),
            knots,
            coefficients: None,
            endpoints: self.endpoints,
            id: None,
            convention: self.convention,
            modifier: self.modifier,
            calendar: self.calendar.clone(),
            ad: self.ad_order(),
        };
        Self::new(self.kind, nodes, params)
    }

    /// Check `start` lies in `(node[0], node[1]]`.
    pub(crate) fn check_translate(&self, start: NaiveDate) -> Result<()> {
        let dates = self.node_dates();
        if dates.len() < 2 {
            return Err(CurveError::InsufficientData {
                got: dates.len(),
                need: 2,
            });
        }
        if start <= dates[0] || start > dates[1] {
            return Err(CurveError::TranslateDomain {
                start,
                lower: dates[0],
                upper: dates[1],
            });
        }
        Ok(())
    }

    /// Knot vector after translating the curve to `start`.
    pub(crate) fn translated_knots(
        &self,
        start: NaiveDate,
        extend: bool,
    ) -> Result<Option<Vec<NaiveDate>>> {
        let Some(knots) = &self.knots else {
            return Ok(None);
        };
        let mut knots = knots.clone();
        if start <= knots[0] {
            return Ok(Some(knots));
        }
        let interior = knots[4];
        if start >= interior {
            return Err(CurveError::KnotTranslation {
                start,
                knot: interior,
            });
        }
        if extend {
            for knot in knots.iter_mut().take(4) {
                *knot = start;
            }
        }
        Ok(Some(knots))
    }

    /// Knot vector shifted by `days`.
    pub(crate) fn rolled_knots(&self, days: i64) -> Option<Vec<NaiveDate>> {
        self.knots
            .as_ref()
            .map(|knots| knots.iter().map(|k| *k + Duration::days(days)).collect())
    }

    /// Day factor used by shift and roll: `1/360` for Act360, else `1/365`.
    pub(crate) fn day_factor(&self) -> f64 {
        match self.convention {
            DayCountConvention::Act360 => 1.0 / 360.0,
            _ => 1.0 / 365.0,
        }
    }
}

impl PartialEq for CurveCore {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.id == other.id
            && self.interpolation == other.interpolation
            && self.knots == other.knots
            && self.coefficients == other.coefficients
            && self.endpoints == other.endpoints
            && self.convention == other.convention
            && self.modifier == other.modifier
            && self.calendar == other.calendar
            && self.ad_order() == other.ad_order()
            && self.real_nodes() == other.real_nodes()
    }
}

/// Inherent accessors shared by the curve wrappers, forwarded to `self.core`.
macro_rules! core_accessors {
    () => {
        /// Curve identity used to tag node variables.
        pub fn id(&self) -> &str {
            self.core.id()
        }

        /// First node date.
        pub fn anchor(&self) -> NaiveDate {
            self.core.anchor()
        }

        /// Node dates in order.
        pub fn node_dates(&self) -> &[NaiveDate] {
            self.core.node_dates()
        }

        /// Node values at the current differentiation order.
        pub fn node_values(&self) -> Vec<CurveValue> {
            self.core.node_values()
        }

        /// Node values with derivative information dropped.
        pub fn nodes(&self) -> NodeSet<f64> {
            self.core.real_nodes()
        }

        /// Interpolation applied outside the spline region.
        pub fn interpolation(&self) -> &Interpolation {
            self.core.interpolation()
        }

        /// Spline knot dates, if the curve has a spline tail.
        pub fn knots(&self) -> Option<&[NaiveDate]> {
            self.core.knots()
        }

        /// Coefficients supplied at construction, if frozen.
        pub fn coefficients(&self) -> Option<&[f64]> {
            self.core.coefficients()
        }

        /// Spline endpoint policy.
        pub fn endpoints(&self) -> Endpoints {
            self.core.endpoints()
        }

        /// Day count convention used by [`rate`](Self::rate).
        pub fn convention(&self) -> DayCountConvention {
            self.core.convention()
        }

        /// Default business day adjustment for tenors.
        pub fn modifier(&self) -> BusinessDayConvention {
            self.core.modifier()
        }

        /// Holiday calendar for tenor arithmetic.
        pub fn calendar(&self) -> &Calendar {
            self.core.calendar()
        }

        /// Current differentiation order (0, 1 or 2).
        pub fn ad_order(&self) -> u8 {
            self.core.ad_order()
        }

        /// Switch the differentiation order in place.
        ///
        /// Every node is re-tagged as `"{id}{index}"` and the spline is
        /// re-solved on next use unless its coefficients are frozen. Setting
        /// the current order is a no-op.
        ///
        /// # Errors
        /// `InvalidAdOrder` for orders above 2; the curve is left unchanged.
        pub fn set_ad_order(&mut self, order: u8) -> Result<()> {
            self.core.set_ad_order(order)
        }

        /// Value at `date` at the current differentiation order.
        pub fn value(&self, date: NaiveDate) -> Result<CurveValue> {
            self.core.value(date)
        }
    };
}

pub(crate) use core_accessors;
