use serde::{Deserialize, Serialize};

/// Easing curves over normalized progress. Inputs are clamped to `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    In,
    Out,
    InOut,
}

impl Easing {
    pub fn apply(self, t: f64) -> f64 {
        let t = clamp01(t);
        match self {
            Easing::Linear => t,
            Easing::In => t * t,
            Easing::Out => 1.0 - (1.0 - t) * (1.0 - t),
            Easing::InOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }

    /// Curve for segment `index` of a `count`-segment walk.
    pub fn for_segment(index: usize, count: usize) -> Easing {
        let first = index == 0;
        let last = index + 1 >= count;
        match (first, last) {
            (true, true) => Easing::InOut,
            (true, false) => Easing::In,
            (false, true) => Easing::Out,
            (false, false) => Easing::Linear,
        }
    }
}

/// Clamp into `[0, 1]`; NaN maps to `0`.
pub fn clamp01(t: f64) -> f64 {
    if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) }
}

/// Blend factor of an exponential filter with `rate` per second over `dt_s`.
pub fn smoothing_alpha(rate: f64, dt_s: f64) -> f64 {
    clamp01(1.0 - (-rate * dt_s).exp())
}

#[cfg(test)]
mod tests {
    use super::{Easing, clamp01, smoothing_alpha};

    #[test]
    fn curves_hit_endpoints() {
        for e in [Easing::Linear, Easing::In, Easing::Out, Easing::InOut] {
            assert_eq!(e.apply(0.0), 0.0);
            assert_eq!(e.apply(1.0), 1.0);
            assert_eq!(e.apply(2.0), 1.0);
        }
        assert_eq!(Easing::InOut.apply(0.5), 0.5);
    }

    #[test]
    fn ease_in_lags_and_ease_out_leads() {
        assert!(Easing::In.apply(0.3) < 0.3);
        assert!(Easing::Out.apply(0.3) > 0.3);
    }

    #[test]
    fn segment_curve_selection() {
        assert_eq!(Easing::for_segment(0, 1), Easing::InOut);
        assert_eq!(Easing::for_segment(0, 3), Easing::In);
        assert_eq!(Easing::for_segment(1, 3), Easing::Linear);
        assert_eq!(Easing::for_segment(2, 3), Easing::Out);
    }

    #[test]
    fn smoothing_alpha_is_bounded() {
        assert_eq!(clamp01(f64::NAN), 0.0);
        let a = smoothing_alpha(12.0, 1.0 / 60.0);
        assert!(a > 0.0 && a < 1.0);
        assert_eq!(smoothing_alpha(12.0, 0.0), 0.0);
    }
}
