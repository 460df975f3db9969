//! Boundary assembly and lazy solving of a curve's cubic spline tail.
//!
//! The adapter owns the knot dates and endpoint policy. It converts dates to
//! day ordinals, builds the breakpoint/target system from the node set and
//! hands the solve to [`PPSpline`]. The solved spline is cached in a
//! [`OnceLock`] so evaluation through `&self` stays `Send + Sync`.

use super::nodes::NodeSet;
use crate::math::spline::{PPSpline, SplineEvaluator};
use crate::types::{CurveError, Number, Result};
use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

/// Spline order used by every curve (cubic).
pub const SPLINE_ORDER: usize = 4;

const MIN_KNOTS: usize = 2 * SPLINE_ORDER;
const MIN_KNOTS_NOT_A_KNOT: usize = MIN_KNOTS + 2;

/// Day ordinal used as the spline abscissa.
#[inline]
pub fn day_ordinal(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

/// Boundary condition at one end of the spline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SplineEndpoint {
    /// Zero second derivative at the outermost knot.
    #[default]
    Natural,
    /// Third derivative continuous across the first interior knot.
    NotAKnot,
}

impl SplineEndpoint {
    /// Canonical name.
    pub fn name(&self) -> &'static str {
        match self {
            SplineEndpoint::Natural => "natural",
            SplineEndpoint::NotAKnot => "not_a_knot",
        }
    }
}

impl FromStr for SplineEndpoint {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "natural" => Ok(SplineEndpoint::Natural),
            "not_a_knot" => Ok(SplineEndpoint::NotAKnot),
            _ => Err(CurveError::UnknownEndpoint(s.to_string())),
        }
    }
}

impl fmt::Display for SplineEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for SplineEndpoint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for SplineEndpoint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        SplineEndpoint::from_str(&s).map_err(de::Error::custom)
    }
}

/// Left and right boundary conditions.
///
/// Parses from a single name applied to both ends (`"natural"`) or a comma
/// separated pair (`"natural,not_a_knot"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Endpoints {
    /// Condition at the first knot
    pub left: SplineEndpoint,
    /// Condition at the last knot
    pub right: SplineEndpoint,
}

impl Endpoints {
    /// Same condition at both ends.
    pub fn both(endpoint: SplineEndpoint) -> Self {
        Self {
            left: endpoint,
            right: endpoint,
        }
    }

    /// Distinct left and right conditions.
    pub fn new(left: SplineEndpoint, right: SplineEndpoint) -> Self {
        Self { left, right }
    }

    fn uses_not_a_knot(&self) -> bool {
        self.left == SplineEndpoint::NotAKnot || self.right == SplineEndpoint::NotAKnot
    }
}

impl FromStr for Endpoints {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(',') {
            Some((left, right)) => Ok(Self::new(left.parse()?, right.parse()?)),
            None => Ok(Self::both(s.parse()?)),
        }
    }
}

impl fmt::Display for Endpoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.left == self.right {
            write!(f, "{}", self.left)
        } else {
            write!(f, "{},{}", self.left, self.right)
        }
    }
}

impl Serialize for Endpoints {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (self.left, self.right).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Endpoints {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Pair(SplineEndpoint, SplineEndpoint),
            Single(String),
        }
        match Repr::deserialize(deserializer)? {
            Repr::Pair(left, right) => Ok(Endpoints::new(left, right)),
            Repr::Single(s) => s.parse().map_err(de::Error::custom),
        }
    }
}

/// Validate a knot vector against the endpoint policy.
///
/// # Errors
/// `KnotSequence` if the vector is decreasing, shorter than eight knots, or
/// shorter than ten knots while either endpoint is `not_a_knot`.
pub fn validate_knots(knots: &[NaiveDate], endpoints: Endpoints) -> Result<()> {
    if knots.windows(2).any(|w| w[1] < w[0]) {
        return Err(CurveError::KnotSequence("knot dates must be non-decreasing".into()));
    }
    if knots.len() < MIN_KNOTS {
        return Err(CurveError::KnotSequence(format!(
            "{} knots given, a clamped cubic spline needs at least {}",
            knots.len(),
            MIN_KNOTS
        )));
    }
    if endpoints.uses_not_a_knot() && knots.len() < MIN_KNOTS_NOT_A_KNOT {
        return Err(CurveError::KnotSequence(format!(
            "'not_a_knot' endpoints need at least {} knots, got {}",
            MIN_KNOTS_NOT_A_KNOT,
            knots.len()
        )));
    }
    Ok(())
}

/// Working system derived from knots, endpoints and node dates.
#[derive(Debug, Clone, PartialEq)]
struct Layout {
    /// Knot vector after `not_a_knot` removals
    knots: Vec<f64>,
    /// Breakpoints including synthetic natural-boundary rows
    tau: Vec<f64>,
    /// Index of the first node at or after the first knot
    first_node: usize,
    left_n: usize,
    right_n: usize,
}

impl Layout {
    fn new(knots: &[NaiveDate], endpoints: Endpoints, node_dates: &[NaiveDate]) -> Result<Self> {
        let mut t: Vec<f64> = knots.iter().map(|d| day_ordinal(*d)).collect();
        let first_node = node_dates.partition_point(|d| *d < knots[0]);
        let mut tau: Vec<f64> = node_dates[first_node..]
            .iter()
            .map(|d| day_ordinal(*d))
            .collect();

        let left_n = match endpoints.left {
            SplineEndpoint::Natural => {
                tau.insert(0, t[0]);
                2
            }
            SplineEndpoint::NotAKnot => {
                t.remove(SPLINE_ORDER);
                0
            }
        };
        let right_n = match endpoints.right {
            SplineEndpoint::Natural => {
                tau.push(t[t.len() - 1]);
                2
            }
            SplineEndpoint::NotAKnot => {
                t.remove(t.len() - SPLINE_ORDER - 1);
                0
            }
        };

        let columns = t.len() - SPLINE_ORDER;
        if tau.len() != columns {
            return Err(CurveError::DimensionMismatch {
                rows: tau.len(),
                columns,
            });
        }
        Ok(Self {
            knots: t,
            tau,
            first_node,
            left_n,
            right_n,
        })
    }
}

/// Cubic spline tail of a curve.
///
/// Coefficients are solved on first use from the node values, or supplied at
/// construction and then frozen.
#[derive(Debug, Clone)]
pub struct SplineAdapter<T> {
    knots: Vec<NaiveDate>,
    endpoints: Endpoints,
    log_targets: bool,
    layout: Option<Layout>,
    solved: OnceLock<std::result::Result<PPSpline<T>, CurveError>>,
}

impl<T: Number> SplineAdapter<T> {
    /// Adapter whose coefficients are solved lazily from `nodes`.
    ///
    /// With `log_targets` the spline fits `ln(value)` (discount factors);
    /// otherwise it fits the raw values.
    ///
    /// # Errors
    /// - `KnotSequence` for an invalid knot vector
    /// - `DimensionMismatch` if the node count does not match the knots
    pub fn solving(
        knots: Vec<NaiveDate>,
        endpoints: Endpoints,
        node_dates: &[NaiveDate],
        log_targets: bool,
    ) -> Result<Self> {
        validate_knots(&knots, endpoints)?;
        let layout = Layout::new(&knots, endpoints, node_dates)?;
        Ok(Self {
            knots,
            endpoints,
            log_targets,
            layout: Some(layout),
            solved: OnceLock::new(),
        })
    }

    /// Adapter with frozen coefficients over the unmodified knot vector.
    ///
    /// # Errors
    /// - `KnotSequence` for an invalid knot vector
    /// - `CoefficientCount` if `coefficients.len() != knots.len() - 4`
    pub fn frozen(
        knots: Vec<NaiveDate>,
        endpoints: Endpoints,
        coefficients: &[f64],
        log_targets: bool,
    ) -> Result<Self> {
        validate_knots(&knots, endpoints)?;
        let t = knots.iter().map(|d| day_ordinal(*d)).collect();
        let c = coefficients.iter().map(|v| T::constant(*v)).collect();
        let spline = PPSpline::with_coefficients(SPLINE_ORDER, t, c)?;
        Ok(Self {
            knots,
            endpoints,
            log_targets,
            layout: None,
            solved: OnceLock::from(Ok(spline)),
        })
    }

    /// Knot dates as supplied.
    pub fn knots(&self) -> &[NaiveDate] {
        &self.knots
    }

    /// First knot; the spline governs strictly later dates.
    pub fn start(&self) -> NaiveDate {
        self.knots[0]
    }

    /// Endpoint policy.
    pub fn endpoints(&self) -> Endpoints {
        self.endpoints
    }

    /// Whether coefficients were supplied at construction.
    pub fn is_frozen(&self) -> bool {
        self.layout.is_none()
    }

    /// The solved spline, solving on first call.
    pub fn spline(&self, nodes: &NodeSet<T>) -> Result<&PPSpline<T>> {
        self.solved
            .get_or_init(|| self.solve(nodes))
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Spline value at `date` (in log space for discount factors).
    pub fn evaluate(&self, date: NaiveDate, nodes: &NodeSet<T>) -> Result<T> {
        Ok(self.spline(nodes)?.evaluate(day_ordinal(date)))
    }

    fn solve(&self, nodes: &NodeSet<T>) -> Result<PPSpline<T>> {
        let layout = self
            .layout
            .as_ref()
            .ok_or_else(|| CurveError::KnotSequence("frozen spline has no layout".into()))?;

        let mut targets: Vec<T> = Vec::with_capacity(layout.tau.len());
        if layout.left_n > 0 {
            targets.push(T::zero());
        }
        targets.extend(nodes.values()[layout.first_node..].iter().map(|v| {
            if self.log_targets {
                v.ln()
            } else {
                v.clone()
            }
        }));
        if layout.right_n > 0 {
            targets.push(T::zero());
        }

        debug!(
            knots = layout.knots.len(),
            rows = layout.tau.len(),
            left = %self.endpoints.left,
            right = %self.endpoints.right,
            order = T::ORDER,
            "solving spline coefficients"
        );
        PPSpline::solve(
            SPLINE_ORDER,
            layout.knots.clone(),
            &layout.tau,
            &targets,
            layout.left_n,
            layout.right_n,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn clamped(first: NaiveDate, interior: &[NaiveDate], last: NaiveDate) -> Vec<NaiveDate> {
        let mut t = vec![first; 4];
        t.extend_from_slice(interior);
        t.extend(std::iter::repeat(last).take(4));
        t
    }

    #[test]
    fn test_endpoint_parsing() {
        assert_eq!(
            "NOT_A_KNOT".parse::<SplineEndpoint>().unwrap(),
            SplineEndpoint::NotAKnot
        );
        let err = "clamped".parse::<SplineEndpoint>().unwrap_err();
        assert_eq!(err, CurveError::UnknownEndpoint("clamped".into()));
        let pair: Endpoints = "natural,not_a_knot".parse().unwrap();
        assert_eq!(
            pair,
            Endpoints::new(SplineEndpoint::Natural, SplineEndpoint::NotAKnot)
        );
        assert_eq!(pair.to_string(), "natural,not_a_knot");
    }

    #[test]
    fn test_endpoints_serde_forms() {
        let pair: Endpoints = serde_json::from_str(r#"["natural","not_a_knot"]"#).unwrap();
        assert_eq!(pair.right, SplineEndpoint::NotAKnot);
        let single: Endpoints = serde_json::from_str(r#""not_a_knot""#).unwrap();
        assert_eq!(single, Endpoints::both(SplineEndpoint::NotAKnot));
        assert_eq!(
            serde_json::to_string(&Endpoints::default()).unwrap(),
            r#"["natural","natural"]"#
        );
    }

    #[test]
    fn test_knot_validation() {
        let short = clamped(d(2022, 1, 1), &[], d(2023, 1, 1));
        assert!(validate_knots(&short, Endpoints::default()).is_ok());
        let err = validate_knots(&short, Endpoints::both(SplineEndpoint::NotAKnot)).unwrap_err();
        assert!(matches!(err, CurveError::KnotSequence(_)));
        assert!(validate_knots(&short[..7], Endpoints::default()).is_err());
    }

    #[test]
    fn test_natural_layout_dimension_mismatch() {
        let knots = clamped(d(2022, 1, 1), &[d(2023, 1, 1)], d(2024, 1, 1));
        // n = 5 coefficients, natural adds 2 rows: needs 3 nodes from the first knot.
        let too_many = [d(2022, 1, 1), d(2022, 7, 1), d(2023, 1, 1), d(2024, 1, 1)];
        let err = SplineAdapter::<f64>::solving(knots, Endpoints::default(), &too_many, true)
            .unwrap_err();
        assert_eq!(err, CurveError::DimensionMismatch { rows: 6, columns: 5 });
    }

    #[test]
    fn test_log_spline_reproduces_nodes() {
        let dates = [d(2022, 1, 1), d(2023, 1, 1), d(2024, 1, 1)];
        let nodes = NodeSet::new(dates.to_vec(), vec![1.0, 0.98, 0.955]).unwrap();
        let knots = clamped(dates[0], &[dates[1]], dates[2]);
        let adapter = SplineAdapter::solving(knots, Endpoints::default(), &dates, true).unwrap();
        for (date, v) in nodes.iter() {
            let log_v = adapter.evaluate(date, &nodes).unwrap();
            assert_relative_eq!(log_v.exp(), *v, epsilon = 1e-12);
        }
        assert!(!adapter.is_frozen());
    }

    #[test]
    fn test_frozen_coefficients() {
        let knots = clamped(d(2022, 1, 1), &[], d(2023, 1, 1));
        let adapter =
            SplineAdapter::<f64>::frozen(knots.clone(), Endpoints::default(), &[0.0; 4], true)
                .unwrap();
        assert!(adapter.is_frozen());
        let nodes = NodeSet::new(vec![d(2022, 1, 1)], vec![1.0]).unwrap();
        assert_eq!(adapter.evaluate(d(2022, 6, 1), &nodes).unwrap(), 0.0);

        let err = SplineAdapter::<f64>::frozen(knots, Endpoints::default(), &[0.0; 3], true)
            .unwrap_err();
        assert_eq!(err, CurveError::CoefficientCount { got: 3, expected: 4 });
    }
}
