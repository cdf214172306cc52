//! Validation boundary helpers.
//!
//! Per-frame components check their inputs and outputs once through
//! [`Finite`] instead of sprinkling `is_finite` calls at each mutation.

use crate::bounds::{Aabb2, Aabb3};
use crate::math::{Vec2, Vec3};

/// Values that can be checked for NaN / infinity in one call.
pub trait Finite {
    fn all_finite(&self) -> bool;
}

impl Finite for f64 {
    fn all_finite(&self) -> bool {
        self.is_finite()
    }
}

impl Finite for Vec2 {
    fn all_finite(&self) -> bool {
        self.is_finite()
    }
}

impl Finite for Vec3 {
    fn all_finite(&self) -> bool {
        self.is_finite()
    }
}

impl Finite for Aabb2 {
    fn all_finite(&self) -> bool {
        self.is_finite()
    }
}

impl Finite for Aabb3 {
    fn all_finite(&self) -> bool {
        self.is_finite()
    }
}

impl<T: Finite> Finite for [T] {
    fn all_finite(&self) -> bool {
        self.iter().all(Finite::all_finite)
    }
}

impl<T: Finite> Finite for Vec<T> {
    fn all_finite(&self) -> bool {
        self.as_slice().all_finite()
    }
}

impl<T: Finite> Finite for Option<T> {
    fn all_finite(&self) -> bool {
        self.as_ref().is_none_or(Finite::all_finite)
    }
}

/// A usable frame delta: finite and strictly positive, capped at `max_dt_s`.
pub fn valid_dt(dt_s: f64, max_dt_s: f64) -> Option<f64> {
    if dt_s.is_finite() && dt_s > 0.0 {
        Some(if max_dt_s > 0.0 { dt_s.min(max_dt_s) } else { dt_s })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{Finite, valid_dt};
    use crate::math::{Vec2, Vec3};

    #[test]
    fn rejects_bad_deltas() {
        assert_eq!(valid_dt(0.0, 0.1), None);
        assert_eq!(valid_dt(-0.01, 0.1), None);
        assert_eq!(valid_dt(f64::NAN, 0.1), None);
        assert_eq!(valid_dt(f64::INFINITY, 0.1), None);
        assert_eq!(valid_dt(0.5, 0.1), Some(0.1));
        assert_eq!(valid_dt(0.02, 0.1), Some(0.02));
    }

    #[test]
    fn collections_check_every_element() {
        let ok = vec![Vec2::new(1.0, 2.0), Vec2::ZERO];
        assert!(ok.all_finite());
        let bad = vec![Vec2::new(1.0, 2.0), Vec2::new(f64::NAN, 0.0)];
        assert!(!bad.all_finite());
        assert!(None::<Vec3>.all_finite());
        assert!(!Some(Vec3::new(0.0, f64::INFINITY, 0.0)).all_finite());
    }
}
