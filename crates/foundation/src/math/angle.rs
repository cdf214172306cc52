//! Heading helpers.
//!
//! Headings are yaw angles around the world up axis, with `0` facing `+z`
//! and `π/2` facing `+x`.

use std::f64::consts::{PI, TAU};

use super::Vec2;

/// Wrap an angle into `[-π, π]`.
pub fn normalize_angle(a: f64) -> f64 {
    if !a.is_finite() {
        return a;
    }
    (a + PI).rem_euclid(TAU) - PI
}

/// Interpolate from `from` toward `to` along the shorter arc.
pub fn lerp_angle(from: f64, to: f64, t: f64) -> f64 {
    from + normalize_angle(to - from) * t
}

/// Heading that faces along a ground-plane direction.
pub fn heading_of(dir: Vec2) -> Option<f64> {
    let dir = dir.normalized()?;
    Some(dir.x.atan2(dir.y))
}

/// Unit ground-plane direction for a heading.
pub fn heading_dir(heading: f64) -> Vec2 {
    Vec2::new(heading.sin(), heading.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-9, "expected {a} ~= {b}");
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert_close(normalize_angle(3.0 * PI).abs(), PI);
        assert_close(normalize_angle(-3.0 * PI / 2.0), PI / 2.0);
        assert_close(normalize_angle(0.25), 0.25);
    }

    #[test]
    fn lerp_takes_shorter_path() {
        // From just below +π to just above -π is a short hop across the seam.
        let from = PI - 0.1;
        let to = -PI + 0.1;
        let mid = lerp_angle(from, to, 0.5);
        assert_close(normalize_angle(mid).abs(), PI);
    }

    #[test]
    fn heading_round_trips_through_direction() {
        let h = heading_of(Vec2::new(1.0, 0.0)).expect("heading");
        assert_close(h, PI / 2.0);
        let d = heading_dir(h);
        assert_close(d.x, 1.0);
        assert_close(d.y, 0.0);
        assert!(heading_of(Vec2::ZERO).is_none());
    }
}
