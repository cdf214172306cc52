//! Precision policies.
//!
//! Deterministic float ordering for comparisons whose tie-breaks must not
//! depend on NaN payloads or the sign of zero.

use core::cmp::Ordering;

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
///
/// Prefer this any time you sort floats or pick a minimum.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}

/// Index of the smallest finite value, keeping the first one on ties.
pub fn first_min_index<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.into_iter().enumerate() {
        if !v.is_finite() {
            continue;
        }
        best = match best {
            Some((bi, bv)) if !stable_total_cmp_f64(v, bv).is_lt() => Some((bi, bv)),
            _ => Some((i, v)),
        };
    }
    best.map(|(i, _)| i)
}
