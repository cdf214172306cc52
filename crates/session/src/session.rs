//! One visual retrieval session.
//!
//! Owns the layout, the active retrieval and the camera, and advances them
//! once per render tick. A new highlight or layout discards the active
//! retrieval wholesale; nothing from the previous route is reused.

use animation::{AnimationState, Phase, Pose, RetrievalTask};
use camera::{CameraCommand, CameraCommandKind, CameraController, CameraPose};
use foundation::time::Time;
use navigation::{PathPlan, StandingPosition, plan, standing_position};
use racks::{BoxMetadata, Highlight, LayoutSpec, RackLayout, TargetCell};
use runtime::{EventBus, EventKind, Frame, Metrics, names};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::RetrievalConfig;

/// Everything derived from one highlight.
#[derive(Debug, Clone)]
pub struct ActiveRetrieval {
    pub highlight: Highlight,
    pub target: TargetCell,
    pub standing: StandingPosition,
    pub plan: PathPlan,
    pub animation: AnimationState,
}

/// Information revealed to staff once the avatar has arrived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overlay {
    pub label: String,
    pub bay: u32,
    pub shelf_label: Option<String>,
    pub row_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BoxMetadata>,
}

/// What one tick produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub frame: Frame,
    pub phase: Option<Phase>,
    pub entered: Option<Phase>,
    pub pose: Option<Pose>,
    pub camera: CameraPose,
    /// The arrived signal fired on this tick.
    pub arrived: bool,
}

pub struct RetrievalSession {
    config: RetrievalConfig,
    layout: RackLayout,
    retrieval: Option<ActiveRetrieval>,
    camera: CameraController,
    frame: Frame,
    events: EventBus,
    metrics: Metrics,
}

impl RetrievalSession {
    pub fn new(config: RetrievalConfig, spec: &LayoutSpec) -> Self {
        let config = config.sanitized();
        let layout = RackLayout::new(spec, config.layout);
        let camera = CameraController::new(config.camera, &layout.bounds());
        Self {
            config,
            layout,
            retrieval: None,
            camera,
            frame: Frame::start(),
            events: EventBus::new(),
            metrics: Metrics::new(),
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn layout(&self) -> &RackLayout {
        &self.layout
    }

    pub fn retrieval(&self) -> Option<&ActiveRetrieval> {
        self.retrieval.as_ref()
    }

    pub fn camera(&self) -> &CameraController {
        &self.camera
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn now(&self) -> Time {
        self.frame.time
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Rebuild the layout. Any active retrieval is discarded.
    pub fn set_layout(&mut self, spec: &LayoutSpec) {
        self.layout = RackLayout::new(spec, self.config.layout);
        self.retrieval = None;
        let (bays, rows) = (self.layout.bays().len(), self.layout.rows().len());
        info!(bays, rows, "layout rebuilt");
        self.events
            .emit(self.frame, EventKind::Layout, format!("{bays} bays, {rows} rows"));
    }

    /// Replace the active retrieval. `None` or a highlight that does not
    /// resolve against the layout clears it. Returns whether a retrieval is
    /// now active.
    pub fn highlight(&mut self, highlight: Option<Highlight>) -> bool {
        self.retrieval = None;
        let Some(highlight) = highlight else {
            self.events.emit(self.frame, EventKind::Highlight, "cleared");
            return false;
        };
        self.events
            .emit(self.frame, EventKind::Highlight, highlight.label.clone());

        let Some(retrieval) = self.build_retrieval(highlight) else {
            return false;
        };
        self.events
            .emit(self.frame, EventKind::Phase, retrieval.animation.phase().name());
        self.retrieval = Some(retrieval);
        true
    }

    fn build_retrieval(&mut self, highlight: Highlight) -> Option<ActiveRetrieval> {
        let nav = &self.config.navigation;
        let Some(target) = self.layout.locate(&highlight) else {
            warn!(
                bay = highlight.bay,
                row = highlight.row,
                shelf = ?highlight.shelf,
                "highlight does not match the layout"
            );
            return None;
        };
        let Some(standing) = standing_position(&target, &self.layout, nav) else {
            warn!(label = %highlight.label, "no usable standing position");
            return None;
        };

        let start = nav.start;
        let route = match plan(start, standing.point, &self.layout, nav) {
            Some(route) => route,
            None => {
                warn!(label = %highlight.label, "no route found, walking straight");
                self.metrics.inc_counter(names::PLAN_FALLBACK_DIRECT, 1);
                PathPlan::direct()
            }
        };
        if !route.is_direct() {
            self.metrics
                .record_histogram(names::PLAN_CANDIDATES, route.candidates as i64);
        }
        self.metrics
            .record_histogram(names::PLAN_WAYPOINTS, route.waypoints.len() as i64);

        let task = RetrievalTask {
            start,
            waypoints: route.waypoints.clone(),
            standing: standing.point,
            target: target.position,
            category: standing.category,
            ladder_lean_angle: nav.ladder_lean_angle,
        };
        let animation = AnimationState::new(&task, self.config.animation)?;
        debug!(
            label = %highlight.label,
            category = ?standing.category,
            standoff = standing.standoff,
            waypoints = route.waypoints.len(),
            "retrieval started"
        );
        Some(ActiveRetrieval {
            highlight,
            target,
            standing,
            plan: route,
            animation,
        })
    }

    /// Start a camera transition. Returns `false` if the command was ignored.
    pub fn camera_command(&mut self, kind: CameraCommandKind) -> bool {
        let command = CameraCommand::new(kind, self.now());
        let target = self.retrieval.as_ref().map(|r| r.target.position);
        let accepted = self
            .camera
            .send_command(command, &self.layout.bounds(), target);
        self.metrics.inc_counter(names::CAMERA_COMMANDS, 1);
        let message = if accepted {
            kind.name().to_string()
        } else {
            format!("{kind} ignored")
        };
        self.events.emit(self.frame, EventKind::Camera, message);
        accepted
    }

    /// Advance everything by one host frame.
    pub fn tick(&mut self, dt_s: f64) -> SessionSnapshot {
        self.frame = self.frame.advance(dt_s);

        let mut arrived = false;
        let mut entered = None;
        if let Some(retrieval) = self.retrieval.as_mut() {
            let step = retrieval.animation.step(dt_s);
            if step.skipped {
                self.metrics.inc_counter(names::ANIMATION_SKIPPED_FRAMES, 1);
            }
            retrieval.animation = step.state;
            if step.arrived {
                arrived = true;
                self.events.emit(
                    self.frame,
                    EventKind::Arrived,
                    retrieval.highlight.label.clone(),
                );
            }
            if let Some(phase) = step.entered {
                entered = Some(phase);
                self.events.emit(self.frame, EventKind::Phase, phase.name());
            }
        }

        if !self.camera.tick(dt_s) {
            self.metrics.inc_counter(names::CAMERA_SKIPPED_FRAMES, 1);
        }

        SessionSnapshot {
            frame: self.frame,
            phase: self.retrieval.as_ref().map(|r| r.animation.phase()),
            entered,
            pose: self.retrieval.as_ref().map(|r| r.animation.pose()),
            camera: self.camera.pose(),
            arrived,
        }
    }

    /// Box details, available once the avatar has arrived.
    pub fn overlay(&self) -> Option<Overlay> {
        let r = self.retrieval.as_ref()?;
        if !r.animation.has_arrived() {
            return None;
        }
        Some(Overlay {
            label: r.highlight.label.clone(),
            bay: r.target.bay,
            shelf_label: r.target.shelf_label.clone(),
            row_label: r.target.row_label.clone(),
            metadata: r.target.metadata.clone(),
        })
    }
}
