//! Error types for curve construction, evaluation and transformation.
//!
//! Every fallible operation in this crate returns [`CurveError`]. Each variant
//! belongs to exactly one [`ErrorKind`]:
//!
//! - `InvalidInput`: malformed arguments (bad names, unordered nodes, wrong
//!   differentiation order, mismatched dimensions)
//! - `StructuralConstraint`: a request the curve's node or knot structure
//!   cannot honour (short knot vectors, translations outside their domain)
//! - `Numerical`: the spline collocation system could not be solved
//!
//! An undetermined rate is not an error: `rate()` returns `Ok(None)`.

use chrono::NaiveDate;
use thiserror::Error;

/// Classification of a [`CurveError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Arguments are malformed or outside their accepted set.
    InvalidInput,
    /// The curve structure cannot support the requested operation.
    StructuralConstraint,
    /// A numerical routine failed (singular system).
    Numerical,
}

/// Curve operation errors.
///
/// # Examples
///
/// ```
/// use curve_core::types::{CurveError, ErrorKind};
///
/// let err = CurveError::InvalidAdOrder(3);
/// assert_eq!(err.kind(), ErrorKind::InvalidInput);
/// assert_eq!(format!("{}", err), "Invalid AD order: 3, must be one of 0, 1, 2");
/// ```
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CurveError {
    /// Bracket search or curve evaluation needs more keys than supplied.
    #[error("Insufficient data: got {got}, need at least {need}")]
    InsufficientData {
        /// Number of keys supplied
        got: usize,
        /// Minimum number of keys required
        need: usize,
    },

    /// Node dates are not strictly increasing.
    #[error("Node dates must be strictly increasing: {previous} is not before {date}")]
    UnorderedNodes {
        /// The earlier date in input order
        previous: NaiveDate,
        /// The offending date
        date: NaiveDate,
    },

    /// Automatic differentiation order outside {0, 1, 2}.
    #[error("Invalid AD order: {0}, must be one of 0, 1, 2")]
    InvalidAdOrder(u8),

    /// Spline endpoint method not implemented.
    #[error("Endpoint method '{0}' not implemented")]
    UnknownEndpoint(String),

    /// Local interpolation rule not recognised.
    #[error("Unknown interpolation: '{0}'")]
    UnknownInterpolation(String),

    /// Day count convention not recognised.
    #[error("Unknown day count convention: '{0}'")]
    UnknownConvention(String),

    /// Business day modifier not recognised.
    #[error("Unknown business day modifier: '{0}'")]
    UnknownModifier(String),

    /// Named calendar not recognised or custom calendar malformed.
    #[error("Invalid calendar: {0}")]
    InvalidCalendar(String),

    /// Tenor string could not be parsed.
    #[error("Invalid tenor: '{0}'")]
    InvalidTenor(String),

    /// Supplied spline coefficients do not match the knot vector.
    #[error("Coefficient count mismatch: got {got}, knot vector requires {expected}")]
    CoefficientCount {
        /// Coefficients supplied
        got: usize,
        /// Coefficients implied by the knot vector
        expected: usize,
    },

    /// Spline collocation system is not square.
    #[error("Dimension mismatch: {rows} data points for {columns} coefficients")]
    DimensionMismatch {
        /// Number of equations (data points)
        rows: usize,
        /// Number of unknowns (coefficients)
        columns: usize,
    },

    /// Day count fraction between two dates is zero.
    #[error("Zero day count fraction between {start} and {end}")]
    ZeroDayCount {
        /// Period start
        start: NaiveDate,
        /// Period end
        end: NaiveDate,
    },

    /// Knot vector too short or otherwise structurally invalid.
    #[error("Invalid knot sequence: {0}")]
    KnotSequence(String),

    /// Translation start outside `(node[0], node[1]]`.
    #[error("Cannot translate exactly to {start}: must lie in ({lower}, {upper}]")]
    TranslateDomain {
        /// Requested start date
        start: NaiveDate,
        /// Exclusive lower bound (anchor date)
        lower: NaiveDate,
        /// Inclusive upper bound (second node date)
        upper: NaiveDate,
    },

    /// Translation start at or beyond the first interior knot.
    #[error("Cannot translate spline knots to {start}: first interior knot is {knot}")]
    KnotTranslation {
        /// Requested start date
        start: NaiveDate,
        /// The fifth knot of the sequence
        knot: NaiveDate,
    },

    /// Spline collocation matrix is singular.
    #[error("Singular spline system at pivot {pivot}")]
    SingularSystem {
        /// Row at which no usable pivot was found
        pivot: usize,
    },

    /// Persisted representation could not be produced or consumed.
    #[error("Serialisation error: {0}")]
    Serialization(String),
}

impl CurveError {
    /// Return the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CurveError::KnotSequence(_)
            | CurveError::TranslateDomain { .. }
            | CurveError::KnotTranslation { .. } => ErrorKind::StructuralConstraint,
            CurveError::SingularSystem { .. } => ErrorKind::Numerical,
            _ => ErrorKind::InvalidInput,
        }
    }
}

impl From<serde_json::Error> for CurveError {
    fn from(err: serde_json::Error) -> Self {
        CurveError::Serialization(err.to_string())
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, CurveError>;
