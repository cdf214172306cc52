use foundation::math::Vec2;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Thresholds for approach categories, standoff distances and path clearance.
///
/// Heights and distances are meters, angles radians.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Targets below this height are retrieved by bending down.
    pub bend_threshold: f64,
    /// Targets at or above this height need the ladder.
    pub ladder_threshold: f64,
    /// Standoff at floor level.
    pub min_standoff: f64,
    /// Standoff at `bend_threshold`.
    pub mid_standoff: f64,
    /// Standoff at `ladder_threshold`.
    pub high_standoff: f64,
    /// Ladder lean from vertical.
    pub ladder_lean_angle: f64,
    /// Smallest ladder foot distance from the rack face.
    pub ladder_base_clearance: f64,
    /// Above this height the ladder clearance floor starts to grow.
    pub tall_target_height: f64,
    /// Extra clearance per meter above `tall_target_height`.
    pub tall_clearance_slope: f64,
    /// Minimum clearance between the walking path and any rack.
    pub margin: f64,
    /// Half-width of the avatar's footprint.
    pub avatar_radius: f64,
    /// Where every walk begins (ground plane, `y` is world `z`).
    pub start: Vec2,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            bend_threshold: 0.9,
            ladder_threshold: 1.55,
            min_standoff: 0.15,
            mid_standoff: 0.45,
            high_standoff: 0.7,
            ladder_lean_angle: 15f64.to_radians(),
            ladder_base_clearance: 0.7,
            tall_target_height: 2.2,
            tall_clearance_slope: 0.25,
            margin: 0.35,
            avatar_radius: 0.25,
            start: Vec2::new(-1.5, 2.5),
        }
    }
}

impl NavigationConfig {
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            ("bend_threshold", self.bend_threshold),
            ("ladder_threshold", self.ladder_threshold),
            ("min_standoff", self.min_standoff),
            ("mid_standoff", self.mid_standoff),
            ("high_standoff", self.high_standoff),
            ("ladder_lean_angle", self.ladder_lean_angle),
            ("ladder_base_clearance", self.ladder_base_clearance),
            ("tall_target_height", self.tall_target_height),
            ("tall_clearance_slope", self.tall_clearance_slope),
            ("margin", self.margin),
            ("avatar_radius", self.avatar_radius),
        ];
        for (name, v) in values {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("{name} must be finite and >= 0 (got {v})"));
            }
        }
        if !self.start.is_finite() {
            return Err("start must be finite".to_string());
        }
        if self.bend_threshold >= self.ladder_threshold {
            return Err(format!(
                "bend_threshold ({}) must be below ladder_threshold ({})",
                self.bend_threshold, self.ladder_threshold
            ));
        }
        if !(self.min_standoff <= self.mid_standoff && self.mid_standoff <= self.high_standoff) {
            return Err("standoffs must be ordered min <= mid <= high".to_string());
        }
        if self.ladder_lean_angle >= std::f64::consts::FRAC_PI_2 {
            return Err("ladder_lean_angle must be below 90 degrees".to_string());
        }
        Ok(())
    }

    pub fn sanitized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(reason) => {
                warn!(%reason, "invalid navigation config, using defaults");
                Self::default()
            }
        }
    }

    /// Distance every waypoint keeps from rack footprints.
    pub fn waypoint_clearance(&self) -> f64 {
        self.margin + self.avatar_radius
    }
}

#[cfg(test)]
mod tests {
    use super::NavigationConfig;

    #[test]
    fn defaults_are_valid() {
        assert!(NavigationConfig::default().validate().is_ok());
    }

    #[test]
    fn thresholds_must_be_ordered() {
        let cfg = NavigationConfig {
            bend_threshold: 2.0,
            ladder_threshold: 1.0,
            ..NavigationConfig::default()
        };
        assert!(cfg.validate().unwrap_err().contains("bend_threshold"));
        assert_eq!(cfg.sanitized(), NavigationConfig::default());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg: NavigationConfig =
            serde_json::from_str(r#"{"margin":0.5}"#).expect("parse partial config");
        assert_eq!(cfg.margin, 0.5);
        assert_eq!(cfg.ladder_threshold, 1.55);
    }
}
