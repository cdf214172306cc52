use serde::{Deserialize, Serialize};
use tracing::warn;

/// Durations, speeds and limb amplitudes for the retrieval animation.
///
/// Durations are seconds, distances meters, angles radians, rates per second.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub idle_duration: f64,
    /// Meters per second along the path.
    pub walk_speed: f64,
    /// Exponential filter rate pulling the visible position toward the logical one.
    pub position_smoothing: f64,
    pub rotation_smoothing: f64,
    pub turn_duration: f64,
    pub bend_duration: f64,
    pub place_ladder_duration: f64,
    /// Climb duration is `climb_base_duration + climb_duration_per_meter * climb_height`.
    pub climb_base_duration: f64,
    pub climb_duration_per_meter: f64,
    pub reach_duration: f64,
    /// How far below the target the avatar's feet stop on the ladder.
    pub climb_reach_offset: f64,
    pub shoulder_height: f64,
    /// Horizontal distance from shoulder to the shelf face when reaching.
    pub reach_distance: f64,
    /// Smallest arm elevation above horizontal in the reach pose.
    pub min_reach_elevation: f64,

    pub walk_cycle_frequency: f64,
    pub walk_leg_swing: f64,
    pub walk_arm_swing: f64,
    pub walk_hip_bob: f64,

    pub bend_torso_pitch: f64,
    pub bend_arm_pitch: f64,
    pub bend_knee: f64,
    /// Arm pitch at the peak of the ladder push gesture.
    pub ladder_push_arm_pitch: f64,
    pub climb_step_frequency: f64,
    pub climb_leg_swing: f64,

    pub breathing_amplitude: f64,
    pub breathing_frequency: f64,

    /// Longest frame delta applied in one step; larger deltas are capped.
    pub max_dt: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            idle_duration: 0.4,
            walk_speed: 1.4,
            position_smoothing: 12.0,
            rotation_smoothing: 10.0,
            turn_duration: 0.5,
            bend_duration: 0.8,
            place_ladder_duration: 1.0,
            climb_base_duration: 0.4,
            climb_duration_per_meter: 0.9,
            reach_duration: 0.6,
            climb_reach_offset: 1.25,
            shoulder_height: 1.45,
            reach_distance: 0.55,
            min_reach_elevation: 0.25,
            walk_cycle_frequency: 1.8,
            walk_leg_swing: 0.45,
            walk_arm_swing: 0.35,
            walk_hip_bob: 0.03,
            bend_torso_pitch: 0.9,
            bend_arm_pitch: 1.1,
            bend_knee: 0.5,
            ladder_push_arm_pitch: 1.3,
            climb_step_frequency: 1.5,
            climb_leg_swing: 0.6,
            breathing_amplitude: 0.008,
            breathing_frequency: 0.25,
            max_dt: 0.1,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            ("idle_duration", self.idle_duration),
            ("walk_speed", self.walk_speed),
            ("position_smoothing", self.position_smoothing),
            ("rotation_smoothing", self.rotation_smoothing),
            ("turn_duration", self.turn_duration),
            ("bend_duration", self.bend_duration),
            ("place_ladder_duration", self.place_ladder_duration),
            ("climb_base_duration", self.climb_base_duration),
            ("climb_duration_per_meter", self.climb_duration_per_meter),
            ("reach_duration", self.reach_duration),
            ("climb_reach_offset", self.climb_reach_offset),
            ("shoulder_height", self.shoulder_height),
            ("reach_distance", self.reach_distance),
            ("min_reach_elevation", self.min_reach_elevation),
            ("walk_cycle_frequency", self.walk_cycle_frequency),
            ("walk_leg_swing", self.walk_leg_swing),
            ("walk_arm_swing", self.walk_arm_swing),
            ("walk_hip_bob", self.walk_hip_bob),
            ("bend_torso_pitch", self.bend_torso_pitch),
            ("bend_arm_pitch", self.bend_arm_pitch),
            ("bend_knee", self.bend_knee),
            ("ladder_push_arm_pitch", self.ladder_push_arm_pitch),
            ("climb_step_frequency", self.climb_step_frequency),
            ("climb_leg_swing", self.climb_leg_swing),
            ("breathing_amplitude", self.breathing_amplitude),
            ("breathing_frequency", self.breathing_frequency),
            ("max_dt", self.max_dt),
        ];
        for (name, v) in values {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("{name} must be finite and >= 0 (got {v})"));
            }
        }
        if self.walk_speed <= 0.0 {
            return Err("walk_speed must be positive".to_string());
        }
        if self.max_dt <= 0.0 {
            return Err("max_dt must be positive".to_string());
        }
        if self.min_reach_elevation >= std::f64::consts::FRAC_PI_2 {
            return Err("min_reach_elevation must be below 90 degrees".to_string());
        }
        Ok(())
    }

    pub fn sanitized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(reason) => {
                warn!(%reason, "invalid animation config, using defaults");
                Self::default()
            }
        }
    }

    /// Seconds on the ladder for a climb of `height` meters.
    pub fn climb_duration(&self, height: f64) -> f64 {
        self.climb_base_duration + self.climb_duration_per_meter * height.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::AnimationConfig;

    #[test]
    fn defaults_are_valid() {
        assert!(AnimationConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_walk_speed_is_rejected() {
        let cfg = AnimationConfig {
            walk_speed: 0.0,
            ..AnimationConfig::default()
        };
        assert!(cfg.validate().is_err());
        assert_eq!(cfg.sanitized().walk_speed, 1.4);
    }

    #[test]
    fn climb_duration_scales_with_height() {
        let cfg = AnimationConfig::default();
        assert_eq!(cfg.climb_duration(0.0), cfg.climb_base_duration);
        assert!((cfg.climb_duration(2.0) - (0.4 + 1.8)).abs() < 1e-12);
    }
}
