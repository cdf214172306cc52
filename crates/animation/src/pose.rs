//! Avatar pose output.
//!
//! Limb angles are pitches around the avatar's shoulder/hip axis: `0` hangs
//! straight down, `π/2` points forward along the heading, `π` points up.

use foundation::finite::Finite;
use foundation::math::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Limbs {
    /// Forward lean of the upper body.
    pub torso_pitch: f64,
    /// `[left, right]`
    pub arm_pitch: [f64; 2],
    /// `[left, right]`
    pub leg_pitch: [f64; 2],
    pub knee_bend: f64,
}

impl Limbs {
    pub const REST: Limbs = Limbs {
        torso_pitch: 0.0,
        arm_pitch: [0.0, 0.0],
        leg_pitch: [0.0, 0.0],
        knee_bend: 0.0,
    };

    pub fn lerp(&self, other: &Limbs, t: f64) -> Limbs {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Limbs {
            torso_pitch: mix(self.torso_pitch, other.torso_pitch),
            arm_pitch: [
                mix(self.arm_pitch[0], other.arm_pitch[0]),
                mix(self.arm_pitch[1], other.arm_pitch[1]),
            ],
            leg_pitch: [
                mix(self.leg_pitch[0], other.leg_pitch[0]),
                mix(self.leg_pitch[1], other.leg_pitch[1]),
            ],
            knee_bend: mix(self.knee_bend, other.knee_bend),
        }
    }
}

impl Finite for Limbs {
    fn all_finite(&self) -> bool {
        self.torso_pitch.is_finite()
            && self.arm_pitch.iter().all(|a| a.is_finite())
            && self.leg_pitch.iter().all(|a| a.is_finite())
            && self.knee_bend.is_finite()
    }
}

/// Ladder prop leaning against the rack.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ladder {
    pub base: Vec3,
    pub top: Vec3,
    /// Current tilt from vertical; reaches the configured lean once placed.
    pub tilt: f64,
    /// Placement progress in `[0, 1]`.
    pub placed: f64,
}

impl Finite for Ladder {
    fn all_finite(&self) -> bool {
        self.base.is_finite() && self.top.is_finite() && self.tilt.is_finite() && self.placed.is_finite()
    }
}

/// What the renderer draws for one frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Feet position in world space.
    pub position: Vec3,
    /// Yaw, `0` facing `+z`.
    pub heading: f64,
    pub limbs: Limbs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ladder: Option<Ladder>,
}

impl Finite for Pose {
    fn all_finite(&self) -> bool {
        self.position.is_finite()
            && self.heading.is_finite()
            && self.limbs.all_finite()
            && self.ladder.all_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limbs_lerp_hits_both_ends() {
        let bent = Limbs {
            torso_pitch: 1.0,
            arm_pitch: [1.0, 0.5],
            leg_pitch: [0.0, 0.0],
            knee_bend: 0.4,
        };
        assert_eq!(Limbs::REST.lerp(&bent, 0.0), Limbs::REST);
        assert_eq!(Limbs::REST.lerp(&bent, 1.0), bent);
        assert_eq!(Limbs::REST.lerp(&bent, 0.5).arm_pitch, [0.5, 0.25]);
    }

    #[test]
    fn pose_finiteness_includes_ladder() {
        let mut pose = Pose {
            position: Vec3::ZERO,
            heading: 0.0,
            limbs: Limbs::REST,
            ladder: None,
        };
        assert!(pose.all_finite());
        pose.ladder = Some(Ladder {
            base: Vec3::ZERO,
            top: Vec3::new(0.0, f64::NAN, 0.0),
            tilt: 0.2,
            placed: 1.0,
        });
        assert!(!pose.all_finite());
    }
}
