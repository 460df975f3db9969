//! Bracket search over an ordered key sequence.

use crate::types::{CurveError, Result};

/// Index of the interpolation bracket containing `value`.
///
/// For strictly increasing `keys` of length `n >= 2`, returns
/// `i ∈ [0, n - 2]` with `keys[i] < value <= keys[i + 1]`. Values at or
/// below `keys[1]` map to `0` and values above `keys[n - 1]` map to `n - 2`,
/// so the result always names a valid segment for extrapolation.
///
/// Runs an iterative bisection in O(log n).
///
/// # Errors
/// `InsufficientData` if fewer than two keys are supplied.
///
/// # Examples
///
/// ```
/// use curve_core::math::bracket::index_left;
///
/// let keys = [1.0, 2.0, 3.0, 4.0];
/// assert_eq!(index_left(&keys, &2.0).unwrap(), 0);
/// assert_eq!(index_left(&keys, &2.5).unwrap(), 1);
/// assert_eq!(index_left(&keys, &9.0).unwrap(), 2);
/// assert!(index_left(&keys[..1], &1.0).is_err());
/// ```
pub fn index_left<K: PartialOrd>(keys: &[K], value: &K) -> Result<usize> {
    let n = keys.len();
    if n < 2 {
        return Err(CurveError::InsufficientData { got: n, need: 2 });
    }
    let mut lo = 0;
    let mut hi = n - 1;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        if *value <= keys[mid] {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    Ok(lo)
}
