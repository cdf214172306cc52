//! Camera transition controller.
//!
//! Every command computes a goal pose and restarts the transition from the
//! camera's *current* interpolated pose, so a command issued mid-flight never
//! snaps back to where the previous transition started.

use foundation::bounds::Aabb3;
use foundation::finite::{Finite, valid_dt};
use foundation::math::{Easing, Vec3, clamp01};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::command::{CameraCommand, CameraCommandKind};
use crate::config::CameraConfig;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl CameraPose {
    pub fn lerp(&self, other: &CameraPose, t: f64) -> CameraPose {
        CameraPose {
            position: self.position.lerp(other.position, t),
            look_at: self.look_at.lerp(other.look_at, t),
        }
    }
}

impl Finite for CameraPose {
    fn all_finite(&self) -> bool {
        self.position.is_finite() && self.look_at.is_finite()
    }
}

/// Goal pose for `kind`.
///
/// Presets frame the layout `bounds`; `Focus` needs the target cell position
/// and yields `None` without one.
pub fn goal_pose(
    kind: CameraCommandKind,
    bounds: &Aabb3,
    target: Option<Vec3>,
    config: &CameraConfig,
) -> Option<CameraPose> {
    if kind == CameraCommandKind::Focus {
        let p = target.filter(|p| p.is_finite())?;
        let side = if p.z >= 0.0 { 1.0 } else { -1.0 };
        return Some(CameraPose {
            position: Vec3::new(p.x, p.y + config.focus_lift, p.z + side * config.focus_distance),
            look_at: p,
        });
    }

    if !bounds.is_finite() {
        return None;
    }
    let c = bounds.center();
    let s = bounds.size();
    let d = config.preset_distance * s.x.max(s.y).max(s.z).max(1.0);
    let position = match kind {
        CameraCommandKind::Front => Vec3::new(c.x, c.y + 0.25 * d, c.z + d),
        // Slight forward offset keeps the view direction off the up axis.
        CameraCommandKind::Top => Vec3::new(c.x, c.y + d, c.z + 0.05 * d),
        CameraCommandKind::Side => Vec3::new(c.x + 0.5 * s.x + d, c.y + 0.25 * d, c.z),
        CameraCommandKind::Reset | CameraCommandKind::Focus => {
            Vec3::new(c.x - 0.5 * d, c.y + 0.6 * d, c.z + 0.9 * d)
        }
    };
    Some(CameraPose {
        position,
        look_at: c,
    })
}

/// Current and goal camera pose plus interpolation progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraState {
    pub current: CameraPose,
    /// Pose the running transition started from.
    pub from: CameraPose,
    pub goal: CameraPose,
    /// Transition progress in `[0, 1]`; `1` means settled.
    pub progress: f64,
    pub command: Option<CameraCommand>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CameraStep {
    pub state: CameraState,
    pub skipped: bool,
}

impl CameraState {
    /// Settled at `pose`.
    pub fn at(pose: CameraPose) -> Self {
        Self {
            current: pose,
            from: pose,
            goal: pose,
            progress: 1.0,
            command: None,
        }
    }

    pub fn is_transitioning(&self) -> bool {
        self.progress < 1.0
    }

    /// Start a transition toward `goal` from the live pose.
    pub fn retargeted(&self, command: CameraCommand, goal: CameraPose) -> CameraState {
        CameraState {
            current: self.current,
            from: self.current,
            goal,
            progress: 0.0,
            command: Some(command),
        }
    }

    pub fn step(&self, dt_s: f64, config: &CameraConfig) -> CameraStep {
        let Some(dt) = valid_dt(dt_s, config.max_dt) else {
            trace!(dt_s, "camera frame skipped: bad dt");
            return CameraStep {
                state: self.clone(),
                skipped: true,
            };
        };
        if !self.is_transitioning() {
            return CameraStep {
                state: self.clone(),
                skipped: false,
            };
        }

        let progress = if config.transition_duration <= 0.0 {
            1.0
        } else {
            clamp01(self.progress + dt / config.transition_duration)
        };
        let current = if progress >= 1.0 {
            self.goal
        } else {
            self.from.lerp(&self.goal, Easing::InOut.apply(progress))
        };
        if !current.all_finite() {
            trace!("camera frame skipped: non-finite pose");
            return CameraStep {
                state: self.clone(),
                skipped: true,
            };
        }
        CameraStep {
            state: CameraState {
                current,
                progress,
                ..self.clone()
            },
            skipped: false,
        }
    }
}

/// Owns the camera state for one mounted view.
#[derive(Debug, Clone)]
pub struct CameraController {
    config: CameraConfig,
    state: CameraState,
}

impl CameraController {
    /// Settled at the default overview of `bounds`.
    pub fn new(config: CameraConfig, bounds: &Aabb3) -> Self {
        let config = config.sanitized();
        let overview = goal_pose(CameraCommandKind::Reset, bounds, None, &config).unwrap_or(
            CameraPose {
                position: Vec3::new(0.0, 3.0, 6.0),
                look_at: Vec3::ZERO,
            },
        );
        Self {
            config,
            state: CameraState::at(overview),
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn pose(&self) -> CameraPose {
        self.state.current
    }

    /// Begin or restart a transition. Returns `false` when the command has no
    /// usable goal (focus without a target, non-finite geometry).
    pub fn send_command(
        &mut self,
        command: CameraCommand,
        bounds: &Aabb3,
        target: Option<Vec3>,
    ) -> bool {
        let Some(goal) = goal_pose(command.kind, bounds, target, &self.config) else {
            debug!(kind = %command.kind, "camera command ignored: no goal");
            return false;
        };
        debug!(
            kind = %command.kind,
            issued_at = command.issued_at.seconds(),
            mid_transition = self.state.is_transitioning(),
            "camera transition started"
        );
        self.state = self.state.retargeted(command, goal);
        true
    }

    /// Advance the running transition. Returns `false` if the frame was skipped.
    pub fn tick(&mut self, dt_s: f64) -> bool {
        let step = self.state.step(dt_s, &self.config);
        self.state = step.state;
        !step.skipped
    }
}
