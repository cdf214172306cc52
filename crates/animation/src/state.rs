//! Retrieval animation state machine.
//!
//! `idle → walk → turn → (bend_reach | place_ladder → climb) → reach → done`
//!
//! [`AnimationState::step`] is pure: it returns the next state and leaves the
//! receiver untouched. The delta time and every value the frame produces are
//! validated in one place; a bad frame yields the unchanged state with
//! `skipped` set.
//!
//! Two positions are tracked. The logical ("raw") position follows the
//! phase script exactly and drives transitions; the visible position chases
//! it through an exponential filter so frame-rate jitter never shows up as
//! jumps. Headings work the same way.

use std::f64::consts::{FRAC_PI_2, PI, TAU};
use std::sync::Arc;

use foundation::finite::{Finite, valid_dt};
use foundation::math::{
    Easing, Vec2, Vec3, clamp01, heading_dir, heading_of, lerp_angle, normalize_angle,
    smoothing_alpha,
};
use navigation::standing::Category;
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::AnimationConfig;
use crate::phase::Phase;
use crate::pose::{Ladder, Limbs, Pose};

/// Path segments shorter than this are dropped from the walk.
const MIN_SEGMENT_LENGTH: f64 = 1e-6;

/// Everything the animator needs to know about one retrieval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievalTask {
    /// Ground-plane start (`y` is world `z`).
    pub start: Vec2,
    pub waypoints: Vec<Vec2>,
    pub standing: Vec2,
    /// World position of the target cell.
    pub target: Vec3,
    pub category: Category,
    pub ladder_lean_angle: f64,
}

impl Finite for RetrievalTask {
    fn all_finite(&self) -> bool {
        self.start.is_finite()
            && self.waypoints.all_finite()
            && self.standing.is_finite()
            && self.target.is_finite()
            && self.ladder_lean_angle.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Segment {
    from: Vec2,
    to: Vec2,
    duration: f64,
    heading: f64,
    easing: Easing,
}

/// Values fixed for the lifetime of one retrieval.
#[derive(Debug, Clone, PartialEq)]
struct Script {
    segments: Vec<Segment>,
    standing: Vec2,
    target: Vec3,
    category: Category,
    /// Heading from the standing position toward the target cell.
    face_heading: f64,
    lean: f64,
    climb_height: f64,
    climb_duration: f64,
}

impl Script {
    fn build(task: &RetrievalTask, config: &AnimationConfig) -> Script {
        let mut points = Vec::with_capacity(task.waypoints.len() + 2);
        points.push(task.start);
        points.extend_from_slice(&task.waypoints);
        points.push(task.standing);

        let legs: Vec<(Vec2, Vec2)> = points
            .windows(2)
            .filter(|w| w[0].distance(w[1]) > MIN_SEGMENT_LENGTH)
            .map(|w| (w[0], w[1]))
            .collect();
        let count = legs.len();
        let segments: Vec<Segment> = legs
            .into_iter()
            .enumerate()
            .map(|(i, (from, to))| Segment {
                from,
                to,
                duration: from.distance(to) / config.walk_speed,
                heading: heading_of(to - from).unwrap_or(0.0),
                easing: Easing::for_segment(i, count),
            })
            .collect();

        let face_heading = heading_of(task.target.ground() - task.standing)
            .or_else(|| segments.last().map(|s| s.heading))
            .unwrap_or(0.0);

        let climb_height = match task.category {
            Category::High => (task.target.y - config.climb_reach_offset).max(0.0),
            Category::Low | Category::Mid => 0.0,
        };

        Script {
            segments,
            standing: task.standing,
            target: task.target,
            category: task.category,
            face_heading,
            lean: task.ladder_lean_angle,
            climb_height,
            climb_duration: config.climb_duration(climb_height),
        }
    }

    fn toward_rack(&self) -> Vec2 {
        heading_dir(self.face_heading)
    }
}

/// Result of one [`AnimationState::step`].
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub state: AnimationState,
    /// Set on the single frame the walk completes.
    pub arrived: bool,
    /// Phase entered during this frame, if any.
    pub entered: Option<Phase>,
    /// The frame was rejected and `state` is the previous state.
    pub skipped: bool,
}

impl Step {
    fn skipped(state: AnimationState) -> Step {
        Step {
            state,
            arrived: false,
            entered: None,
            skipped: true,
        }
    }
}

#[derive(Debug, Default)]
struct Transition {
    arrived: bool,
    entered: Option<Phase>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    config: AnimationConfig,
    script: Arc<Script>,
    phase: Phase,
    phase_time: f64,
    /// Seconds since the retrieval began; drives walk cycle and breathing.
    clock: f64,
    segment: usize,
    raw_position: Vec3,
    raw_heading: f64,
    position: Vec3,
    heading: f64,
    limbs: Limbs,
    /// Limb pose at the moment the current phase was entered.
    entry_limbs: Limbs,
    /// Visible heading at the moment the current phase was entered.
    entry_heading: f64,
    ladder: Option<Ladder>,
    arrived: bool,
}

impl AnimationState {
    /// Fresh `idle` state for `task`, already facing the first walk segment.
    ///
    /// Returns `None` when the task carries non-finite geometry.
    pub fn new(task: &RetrievalTask, config: AnimationConfig) -> Option<Self> {
        if !task.all_finite() {
            trace!("non-finite retrieval task, no animation");
            return None;
        }
        let config = config.sanitized();
        let script = Script::build(task, &config);
        let heading = script
            .segments
            .first()
            .map(|s| s.heading)
            .unwrap_or(script.face_heading);
        let position = task.start.lift(0.0);
        debug!(
            segments = script.segments.len(),
            category = ?script.category,
            climb_height = script.climb_height,
            "animation created"
        );
        Some(Self {
            config,
            script: Arc::new(script),
            phase: Phase::Idle,
            phase_time: 0.0,
            clock: 0.0,
            segment: 0,
            raw_position: position,
            raw_heading: heading,
            position,
            heading,
            limbs: Limbs::REST,
            entry_limbs: Limbs::REST,
            entry_heading: heading,
            ladder: None,
            arrived: false,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Seconds spent in the current phase.
    pub fn phase_time(&self) -> f64 {
        self.phase_time
    }

    pub fn has_arrived(&self) -> bool {
        self.arrived
    }

    pub fn category(&self) -> Category {
        self.script.category
    }

    pub fn climb_height(&self) -> f64 {
        self.script.climb_height
    }

    /// Number of non-degenerate walk segments.
    pub fn segment_count(&self) -> usize {
        self.script.segments.len()
    }

    /// Logical position the visible pose is chasing.
    pub fn raw_position(&self) -> Vec3 {
        self.raw_position
    }

    pub fn raw_heading(&self) -> f64 {
        self.raw_heading
    }

    /// Heading that faces the target cell from the standing position.
    pub fn face_heading(&self) -> f64 {
        self.script.face_heading
    }

    pub fn pose(&self) -> Pose {
        let mut position = self.position;
        if self.phase == Phase::Done {
            position.y += self.config.breathing_amplitude
                * (TAU * self.config.breathing_frequency * self.clock).sin();
        }
        Pose {
            position,
            heading: self.heading,
            limbs: self.limbs,
            ladder: self.ladder,
        }
    }

    /// Advance by `dt_s` seconds.
    pub fn step(&self, dt_s: f64) -> Step {
        let Some(dt) = valid_dt(dt_s, self.config.max_dt) else {
            trace!(dt_s, phase = %self.phase, "animation frame skipped: bad dt");
            return Step::skipped(self.clone());
        };

        let mut next = self.clone();
        let transition = next.advance(dt);
        if !next.all_finite() {
            trace!(phase = %self.phase, "animation frame skipped: non-finite result");
            return Step::skipped(self.clone());
        }
        if let Some(phase) = transition.entered {
            debug!(%phase, clock = next.clock, "animation phase entered");
        }
        Step {
            state: next,
            arrived: transition.arrived,
            entered: transition.entered,
            skipped: false,
        }
    }

    fn advance(&mut self, dt: f64) -> Transition {
        self.clock += dt;
        self.phase_time += dt;

        let transition = match self.phase {
            Phase::Idle => {
                let mut t = Transition::default();
                if self.phase_time >= self.config.idle_duration {
                    t.entered = Some(self.enter(Phase::Walk));
                }
                t
            }
            Phase::Walk => self.walk(),
            Phase::Turn => self.turn(),
            Phase::BendReach => self.bend_reach(),
            Phase::PlaceLadder => self.place_ladder(),
            Phase::Climb => self.climb(),
            Phase::Reach => self.reach(),
            Phase::Done => Transition::default(),
        };

        let pos_alpha = smoothing_alpha(self.config.position_smoothing, dt);
        self.position = self.position.lerp(self.raw_position, pos_alpha);
        let rot_alpha = smoothing_alpha(self.config.rotation_smoothing, dt);
        self.heading = normalize_angle(lerp_angle(self.heading, self.raw_heading, rot_alpha));

        transition
    }

    fn enter(&mut self, phase: Phase) -> Phase {
        self.phase = phase;
        self.phase_time = 0.0;
        self.entry_limbs = self.limbs;
        self.entry_heading = self.heading;
        phase
    }

    fn walk(&mut self) -> Transition {
        let script = Arc::clone(&self.script);
        while let Some(seg) = script.segments.get(self.segment) {
            if self.phase_time < seg.duration {
                let p = seg.easing.apply(self.phase_time / seg.duration);
                let cycle = TAU * self.config.walk_cycle_frequency * self.clock;
                let bob = self.config.walk_hip_bob * 0.5 * (1.0 - (2.0 * cycle).cos());
                self.raw_position = seg.from.lerp(seg.to, p).lift(bob);
                self.raw_heading = seg.heading;
                self.limbs = walk_cycle(&self.config, cycle);
                return Transition::default();
            }
            self.phase_time -= seg.duration;
            self.segment += 1;
        }

        self.raw_position = script.standing.lift(0.0);
        self.limbs = Limbs::REST;
        let arrived = !self.arrived;
        self.arrived = true;
        Transition {
            arrived,
            entered: Some(self.enter(Phase::Turn)),
        }
    }

    fn turn(&mut self) -> Transition {
        let t = progress(self.phase_time, self.config.turn_duration);
        let face = self.script.face_heading;
        self.raw_heading = lerp_angle(self.entry_heading, face, Easing::Out.apply(t));
        let mut transition = Transition::default();
        if t >= 1.0 {
            self.raw_heading = face;
            transition.entered = Some(self.enter(Phase::after_turn(self.script.category)));
        }
        transition
    }

    fn bend_reach(&mut self) -> Transition {
        let t = progress(self.phase_time, self.config.bend_duration);
        let bent = Limbs {
            torso_pitch: self.config.bend_torso_pitch,
            arm_pitch: [self.config.bend_arm_pitch; 2],
            leg_pitch: [0.0, 0.0],
            knee_bend: self.config.bend_knee,
        };
        self.limbs = self.entry_limbs.lerp(&bent, Easing::InOut.apply(t));
        let mut transition = Transition::default();
        if t >= 1.0 {
            transition.entered = Some(self.enter(Phase::Reach));
        }
        transition
    }

    fn place_ladder(&mut self) -> Transition {
        let t = progress(self.phase_time, self.config.place_ladder_duration);
        let push = (PI * t).sin();
        self.limbs = Limbs {
            arm_pitch: [self.config.ladder_push_arm_pitch * push; 2],
            ..self.entry_limbs
        };

        let script = &self.script;
        let tilt = script.lean * Easing::Out.apply(t);
        let length = ladder_length(script.target.y, script.lean);
        let base = script.standing.lift(0.0);
        let top = (script.standing + script.toward_rack() * (length * tilt.sin()))
            .lift(length * tilt.cos());
        self.ladder = Some(Ladder {
            base,
            top,
            tilt,
            placed: t,
        });

        let mut transition = Transition::default();
        if t >= 1.0 {
            self.limbs = self.entry_limbs;
            transition.entered = Some(self.enter(Phase::Climb));
        }
        transition
    }

    fn climb(&mut self) -> Transition {
        let t = progress(self.phase_time, self.script.climb_duration);
        let y = self.script.climb_height * Easing::InOut.apply(t);
        let drift = y * self.script.lean.tan();
        self.raw_position = (self.script.standing + self.script.toward_rack() * drift).lift(y);

        let stride = (TAU * self.config.climb_step_frequency * self.phase_time).sin();
        let swing = self.config.climb_leg_swing * stride;
        self.limbs = Limbs {
            torso_pitch: 0.0,
            arm_pitch: [FRAC_PI_2 + 0.5 * swing, FRAC_PI_2 - 0.5 * swing],
            leg_pitch: [swing.max(0.0), (-swing).max(0.0)],
            knee_bend: swing.abs(),
        };

        let mut transition = Transition::default();
        if t >= 1.0 {
            self.limbs.leg_pitch = [0.0, 0.0];
            self.limbs.knee_bend = 0.0;
            transition.entered = Some(self.enter(Phase::Reach));
        }
        transition
    }

    fn reach(&mut self) -> Transition {
        let t = progress(self.phase_time, self.config.reach_duration);
        let goal = reach_arm_pitch(
            &self.config,
            self.raw_position.y,
            self.entry_limbs.torso_pitch,
            self.script.target.y,
        );
        let e = Easing::Out.apply(t);
        let from = self.entry_limbs.arm_pitch;
        self.limbs.arm_pitch = [from[0] + (goal - from[0]) * e, from[1] + (goal - from[1]) * e];

        let mut transition = Transition::default();
        if t >= 1.0 {
            transition.entered = Some(self.enter(Phase::Done));
        }
        transition
    }
}

impl Finite for AnimationState {
    fn all_finite(&self) -> bool {
        self.phase_time.is_finite()
            && self.clock.is_finite()
            && self.raw_position.is_finite()
            && self.raw_heading.is_finite()
            && self.position.is_finite()
            && self.heading.is_finite()
            && self.limbs.all_finite()
            && self.ladder.all_finite()
    }
}

/// Arm pitch that points from the shoulder toward a target at `target_y`.
///
/// Never drops below the configured minimum elevation above horizontal.
pub fn reach_arm_pitch(config: &AnimationConfig, feet_y: f64, torso_pitch: f64, target_y: f64) -> f64 {
    let shoulder_y = feet_y + config.shoulder_height * torso_pitch.cos();
    let elevation = (target_y - shoulder_y)
        .atan2(config.reach_distance)
        .max(config.min_reach_elevation);
    FRAC_PI_2 + elevation
}

/// Ladder long enough for its top to reach `target_y` at `lean` from vertical.
fn ladder_length(target_y: f64, lean: f64) -> f64 {
    let cos = lean.cos();
    if cos > f64::EPSILON {
        target_y.max(0.0) / cos
    } else {
        target_y.max(0.0)
    }
}

fn walk_cycle(config: &AnimationConfig, cycle: f64) -> Limbs {
    let s = cycle.sin();
    Limbs {
        torso_pitch: 0.0,
        arm_pitch: [-config.walk_arm_swing * s, config.walk_arm_swing * s],
        leg_pitch: [config.walk_leg_swing * s, -config.walk_leg_swing * s],
        knee_bend: 0.5 * config.walk_leg_swing * s.abs(),
    }
}

fn progress(elapsed: f64, duration: f64) -> f64 {
    if duration <= 0.0 {
        1.0
    } else {
        clamp01(elapsed / duration)
    }
}
