//! Headless plan inspection and simulation traces.

use std::fmt;

use animation::{Phase, Pose};
use camera::{CameraCommandKind, CameraPose};
use foundation::time::Time;
use navigation::{Candidate, PathPlan, StandingPosition, candidates, plan, standing_position};
use racks::{Highlight, LayoutSpec, RackLayout, TargetCell};
use runtime::{Event, MetricsSnapshot};
use serde::Serialize;
use session::{ConfigError, RetrievalConfig, RetrievalSession};
use tracing::info;

#[derive(Debug)]
pub enum ToolError {
    Config(ConfigError),
    /// The highlight input was `null`.
    NoHighlight,
    /// The highlight does not name a cell of the layout.
    Unresolved { bay: u32, row: u32 },
    InvalidOption(String),
    Json(serde_json::Error),
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::Config(err) => write!(f, "{err}"),
            ToolError::NoHighlight => write!(f, "No active highlight"),
            ToolError::Unresolved { bay, row } => {
                write!(f, "Highlight (bay {bay}, row {row}) does not match the layout")
            }
            ToolError::InvalidOption(reason) => write!(f, "Invalid option: {reason}"),
            ToolError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for ToolError {}

impl From<ConfigError> for ToolError {
    fn from(err: ConfigError) -> Self {
        ToolError::Config(err)
    }
}

/// Where the avatar would stand and how it would get there.
#[derive(Debug, Clone, Serialize)]
pub struct PlanReport {
    pub target: TargetCell,
    pub standing: StandingPosition,
    pub plan: PathPlan,
    pub length: f64,
    /// Every route considered; empty when the straight walk is clear.
    pub candidates: Vec<Candidate>,
}

pub fn plan_report(
    config: &RetrievalConfig,
    spec: &LayoutSpec,
    highlight: Option<Highlight>,
) -> Result<PlanReport, ToolError> {
    let highlight = highlight.ok_or(ToolError::NoHighlight)?;
    let layout = RackLayout::new(spec, config.layout);
    let nav = &config.navigation;
    let unresolved = || ToolError::Unresolved {
        bay: highlight.bay,
        row: highlight.row,
    };
    let target = layout.locate(&highlight).ok_or_else(unresolved)?;
    let standing = standing_position(&target, &layout, nav).ok_or_else(unresolved)?;
    let route = plan(nav.start, standing.point, &layout, nav).unwrap_or_else(PathPlan::direct);
    let considered = if route.is_direct() {
        Vec::new()
    } else {
        candidates(nav.start, standing.point, &layout, nav)
    };
    Ok(PlanReport {
        length: route.length(nav.start, standing.point),
        target,
        standing,
        plan: route,
        candidates: considered,
    })
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SimulateOptions {
    pub fps: u32,
    pub seconds: f64,
    /// Camera command issued right after the highlight.
    pub camera: Option<CameraCommandKind>,
}

impl Default for SimulateOptions {
    fn default() -> Self {
        Self {
            fps: 60,
            seconds: 20.0,
            camera: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhaseEntry {
    pub frame: u64,
    pub time: Time,
    pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationTrace {
    pub fps: u32,
    pub frames: u64,
    pub phases: Vec<PhaseEntry>,
    pub arrived_frame: Option<u64>,
    pub final_pose: Option<Pose>,
    pub final_camera: CameraPose,
    pub events: Vec<Event>,
    pub metrics: MetricsSnapshot,
}

/// One hour at 60 fps.
pub const MAX_SIMULATED_FRAMES: u64 = 216_000;

/// Run one retrieval at a fixed step.
pub fn simulate(
    config: &RetrievalConfig,
    spec: &LayoutSpec,
    highlight: Option<Highlight>,
    options: SimulateOptions,
) -> Result<SimulationTrace, ToolError> {
    if options.fps == 0 {
        return Err(ToolError::InvalidOption("fps must be positive".to_string()));
    }
    if !(options.seconds.is_finite() && options.seconds > 0.0) {
        return Err(ToolError::InvalidOption(format!(
            "seconds must be positive (got {})",
            options.seconds
        )));
    }
    let frame_count = (options.seconds * f64::from(options.fps)).ceil();
    if frame_count > MAX_SIMULATED_FRAMES as f64 {
        return Err(ToolError::InvalidOption(format!(
            "{} s at {} fps exceeds {MAX_SIMULATED_FRAMES} frames",
            options.seconds, options.fps
        )));
    }
    let highlight = highlight.ok_or(ToolError::NoHighlight)?;
    let (bay, row) = (highlight.bay, highlight.row);

    let mut session = RetrievalSession::new(config.clone(), spec);
    if !session.highlight(Some(highlight)) {
        return Err(ToolError::Unresolved { bay, row });
    }
    if let Some(kind) = options.camera {
        session.camera_command(kind);
    }

    let dt = 1.0 / f64::from(options.fps);
    let frames = frame_count as u64;
    let mut phases = vec![PhaseEntry {
        frame: 0,
        time: Time::ZERO,
        phase: Phase::Idle,
    }];
    let mut arrived_frame = None;
    let mut last = None;
    for _ in 0..frames {
        let snap = session.tick(dt);
        if let Some(phase) = snap.entered {
            phases.push(PhaseEntry {
                frame: snap.frame.index,
                time: snap.frame.time,
                phase,
            });
        }
        if snap.arrived {
            arrived_frame = Some(snap.frame.index);
        }
        last = Some(snap);
    }

    info!(
        frames,
        phases = phases.len(),
        arrived = ?arrived_frame,
        "simulation finished"
    );
    Ok(SimulationTrace {
        fps: options.fps,
        frames,
        phases,
        arrived_frame,
        final_pose: last.as_ref().and_then(|s| s.pose),
        final_camera: session.camera().pose(),
        events: session.events().events().to_vec(),
        metrics: session.metrics().snapshot(),
    })
}

/// BLAKE3 of the trace's canonical JSON; equal digests mean identical replays.
pub fn trace_digest(trace: &SimulationTrace) -> Result<String, ToolError> {
    let bytes = serde_json::to_vec(trace).map_err(ToolError::Json)?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use racks::{BaySpec, RowDef, ShelfRef};

    fn spec() -> LayoutSpec {
        LayoutSpec {
            bays: (1..=2)
                .map(|index| BaySpec {
                    index,
                    shelves: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                })
                .collect(),
            rows: (0..6)
                .map(|i| RowDef {
                    index: i,
                    label: format!("{}", i + 1),
                })
                .collect(),
        }
    }

    fn target(shelf: &str, row: u32) -> Option<Highlight> {
        Some(Highlight {
            bay: 2,
            shelf: ShelfRef::Label(shelf.into()),
            row,
            label: "0042".into(),
            metadata: None,
        })
    }

    #[test]
    fn replay_is_bit_identical() {
        let cfg = RetrievalConfig::default();
        let options = SimulateOptions {
            seconds: 8.0,
            camera: Some(CameraCommandKind::Focus),
            ..SimulateOptions::default()
        };
        let a = simulate(&cfg, &spec(), target("C", 5), options).expect("first run");
        let b = simulate(&cfg, &spec(), target("C", 5), options).expect("second run");
        assert_eq!(a, b);
        assert_eq!(
            trace_digest(&a).expect("digest"),
            trace_digest(&b).expect("digest")
        );
        assert_eq!(trace_digest(&a).expect("digest").len(), 64);
    }

    #[test]
    fn trace_records_phases_and_arrival() {
        let trace = simulate(
            &RetrievalConfig::default(),
            &spec(),
            target("C", 2),
            SimulateOptions::default(),
        )
        .expect("simulate");
        let phases: Vec<Phase> = trace.phases.iter().map(|p| p.phase).collect();
        assert_eq!(
            phases,
            vec![Phase::Idle, Phase::Walk, Phase::Turn, Phase::Reach, Phase::Done]
        );
        let turn = trace.phases[2].frame;
        assert_eq!(trace.arrived_frame, Some(turn));
        assert_eq!(trace.frames, 1200);
    }

    #[test]
    fn plan_report_crosses_to_the_back_face() {
        let report = plan_report(&RetrievalConfig::default(), &spec(), target("C", 2))
            .expect("report");
        assert_eq!(report.plan.waypoints.len(), 2);
        assert_eq!(report.candidates.len(), 3);
        let best = report
            .candidates
            .iter()
            .map(|c| c.length)
            .fold(f64::INFINITY, f64::min);
        assert_eq!(report.length, best);
    }

    #[test]
    fn rejects_missing_highlight_and_bad_options() {
        let cfg = RetrievalConfig::default();
        assert!(matches!(
            plan_report(&cfg, &spec(), None),
            Err(ToolError::NoHighlight)
        ));
        let bad = SimulateOptions {
            fps: 0,
            ..SimulateOptions::default()
        };
        assert!(matches!(
            simulate(&cfg, &spec(), target("C", 2), bad),
            Err(ToolError::InvalidOption(_))
        ));
        let endless = SimulateOptions {
            seconds: 1e12,
            ..SimulateOptions::default()
        };
        assert!(matches!(
            simulate(&cfg, &spec(), target("C", 2), endless),
            Err(ToolError::InvalidOption(_))
        ));
        let one_hour = SimulateOptions {
            seconds: 3600.5,
            ..SimulateOptions::default()
        };
        assert!(matches!(
            simulate(&cfg, &spec(), target("C", 2), one_hour),
            Err(ToolError::InvalidOption(_))
        ));
        let unknown = Some(Highlight {
            bay: 7,
            shelf: ShelfRef::Index(0),
            row: 0,
            label: "x".into(),
            metadata: None,
        });
        assert!(matches!(
            simulate(&cfg, &spec(), unknown, SimulateOptions::default()),
            Err(ToolError::Unresolved { bay: 7, row: 0 })
        ));
    }
}
