//! Walking-route planner around the rack arrangement.
//!
//! Candidate routes cross from one side of the racks to the other either
//! around an end of the row of bays or through a walkable aisle. Each
//! candidate is a short list of ground-plane waypoints; the shortest total
//! polyline wins.
//!
//! Ordering contract:
//! - Candidates are enumerated left end, right end, then aisles left to right.
//! - On equal lengths the earliest candidate in that order wins.
//!
//! A standing position closer to its face than `margin` is approached
//! square to the face from the walking lane, so the last leg never cuts
//! across a neighbouring bay.

use foundation::bounds::Aabb2;
use foundation::math::{Vec2, first_min_index};
use racks::layout::RackLayout;
use serde::Serialize;
use tracing::{debug, trace};

use crate::config::NavigationConfig;

/// Which way a route gets around the racks.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Route {
    /// Straight line, no waypoints.
    Direct,
    LeftEnd,
    RightEnd,
    /// Through the aisle between two bays.
    Gap { left_bay: u32, right_bay: u32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub route: Route,
    pub waypoints: Vec<Vec2>,
    /// Total polyline length start → waypoints → standing position.
    pub length: f64,
}

/// Ordered waypoints between the start and the standing position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathPlan {
    pub route: Route,
    pub waypoints: Vec<Vec2>,
    /// Routes compared to pick this one; `0` for a direct walk.
    pub candidates: usize,
}

impl PathPlan {
    /// Walk straight to the standing position.
    pub fn direct() -> Self {
        Self {
            route: Route::Direct,
            waypoints: Vec::new(),
            candidates: 0,
        }
    }

    pub fn is_direct(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Full polyline including both endpoints.
    pub fn polyline(&self, start: Vec2, standing: Vec2) -> Vec<Vec2> {
        let mut points = Vec::with_capacity(self.waypoints.len() + 2);
        points.push(start);
        points.extend_from_slice(&self.waypoints);
        points.push(standing);
        points
    }

    pub fn length(&self, start: Vec2, standing: Vec2) -> f64 {
        polyline_length(&self.polyline(start, standing))
    }
}

pub fn polyline_length(points: &[Vec2]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Plan a walk from `start` to `standing` keeping `config.margin` from every bay.
///
/// Returns `None` when the input geometry is unusable or no candidate has a
/// finite length; callers fall back to [`PathPlan::direct`].
pub fn plan(
    start: Vec2,
    standing: Vec2,
    layout: &RackLayout,
    config: &NavigationConfig,
) -> Option<PathPlan> {
    let boxes = usable_boxes(start, standing, layout, config)?;

    if is_direct_clear(start, standing, &boxes, config.margin) {
        trace!("direct walk is clear");
        return Some(PathPlan::direct());
    }

    let candidates = enumerate_candidates(start, standing, layout, &boxes, config);
    let best = first_min_index(candidates.iter().map(|c| c.length))?;
    let chosen = &candidates[best];
    debug!(
        candidates = candidates.len(),
        route = ?chosen.route,
        length = chosen.length,
        "path planned"
    );
    Some(PathPlan {
        route: chosen.route,
        waypoints: chosen.waypoints.clone(),
        candidates: candidates.len(),
    })
}

/// Every candidate route for a non-direct walk, in enumeration order.
///
/// Invalid input yields an empty list.
pub fn candidates(
    start: Vec2,
    standing: Vec2,
    layout: &RackLayout,
    config: &NavigationConfig,
) -> Vec<Candidate> {
    match usable_boxes(start, standing, layout, config) {
        Some(boxes) => enumerate_candidates(start, standing, layout, &boxes, config),
        None => Vec::new(),
    }
}

/// The straight segment keeps `margin` from every footprint.
pub fn is_direct_clear(start: Vec2, standing: Vec2, boxes: &[Aabb2], margin: f64) -> bool {
    boxes.iter().all(|b| {
        let expanded = b.expanded(margin);
        !expanded.contains_strict(start)
            && !expanded.contains_strict(standing)
            && !expanded.segment_overlaps_interior(start, standing)
    })
}

// Validation boundary: every later step can assume finite input.
fn usable_boxes(
    start: Vec2,
    standing: Vec2,
    layout: &RackLayout,
    config: &NavigationConfig,
) -> Option<Vec<Aabb2>> {
    if !start.is_finite() || !standing.is_finite() {
        trace!("non-finite endpoints, no plan");
        return None;
    }
    if !(config.margin.is_finite() && config.margin >= 0.0)
        || !(config.avatar_radius.is_finite() && config.avatar_radius >= 0.0)
    {
        return None;
    }
    let boxes: Vec<Aabb2> = layout
        .bay_boxes()
        .into_iter()
        .filter(|b| !b.is_degenerate())
        .collect();
    if boxes.is_empty() {
        return None;
    }
    Some(boxes)
}

fn enumerate_candidates(
    start: Vec2,
    standing: Vec2,
    layout: &RackLayout,
    boxes: &[Aabb2],
    config: &NavigationConfig,
) -> Vec<Candidate> {
    let margin = config.margin;
    let clearance = config.waypoint_clearance();
    let half_depth = layout.half_depth();

    let mut crossings: Vec<(Route, f64)> = vec![
        (Route::LeftEnd, -margin),
        (Route::RightEnd, layout.total_width() + margin),
    ];

    let ideal_x = ideal_crossing_x(start, standing);
    for gap in layout.gaps() {
        let lo = gap.min_x + clearance;
        let hi = gap.max_x - clearance;
        if lo > hi {
            trace!(
                left_bay = gap.left_bay,
                right_bay = gap.right_bay,
                "aisle too narrow for the avatar"
            );
            continue;
        }
        crossings.push((
            Route::Gap {
                left_bay: gap.left_bay,
                right_bay: gap.right_bay,
            },
            ideal_x.clamp(lo, hi),
        ));
    }

    let start_side = side_of(start);
    let standing_side = side_of(standing);
    let lane = |side: f64| side * (half_depth + clearance);

    let approach = boxes
        .iter()
        .any(|b| b.expanded(margin).contains_strict(standing))
        .then(|| {
            let z = lane(standing_side);
            push_clear(Vec2::new(standing.x, z), boxes, clearance, z)
        });

    crossings
        .into_iter()
        .map(|(route, x)| {
            let mut waypoints = vec![Vec2::new(x, lane(start_side))];
            if start_side != standing_side {
                waypoints.push(Vec2::new(x, lane(standing_side)));
            }
            for wp in &mut waypoints {
                *wp = push_clear(*wp, boxes, clearance, lane(side_of(*wp)));
            }
            if let Some(a) = approach {
                if waypoints.last() != Some(&a) {
                    waypoints.push(a);
                }
            }
            let mut points = Vec::with_capacity(waypoints.len() + 2);
            points.push(start);
            points.extend_from_slice(&waypoints);
            points.push(standing);
            let length = polyline_length(&points);
            Candidate {
                route,
                waypoints,
                length,
            }
        })
        .collect()
}

/// `+1` in front of the racks (`z >= 0`), `-1` behind.
fn side_of(p: Vec2) -> f64 {
    if p.y >= 0.0 { 1.0 } else { -1.0 }
}

/// Where the straight start→standing line crosses the rack centre line, or
/// the midpoint when both ends are on the same side.
fn ideal_crossing_x(start: Vec2, standing: Vec2) -> f64 {
    let dz = start.y - standing.y;
    if side_of(start) != side_of(standing) && dz.abs() > 1e-12 {
        let t = start.y / dz;
        start.x + t * (standing.x - start.x)
    } else {
        0.5 * (start.x + standing.x)
    }
}

/// Move `p` out of any footprint grown by `clearance`.
///
/// Pushes along the axis of least penetration; if the point still ends up
/// inside a neighbour it is moved onto the walking lane in front of or
/// behind the racks, which every footprint shares.
fn push_clear(p: Vec2, boxes: &[Aabb2], clearance: f64, lane_z: f64) -> Vec2 {
    let mut p = p;
    for _ in 0..=boxes.len() {
        let Some(b) = boxes
            .iter()
            .map(|b| b.expanded(clearance))
            .find(|e| e.contains_strict(p))
        else {
            return p;
        };
        let candidates = [
            (p.x - b.min[0], Vec2::new(b.min[0], p.y)),
            (b.max[0] - p.x, Vec2::new(b.max[0], p.y)),
            (p.y - b.min[1], Vec2::new(p.x, b.min[1])),
            (b.max[1] - p.y, Vec2::new(p.x, b.max[1])),
        ];
        let idx = first_min_index(candidates.iter().map(|(d, _)| *d)).unwrap_or(0);
        trace!(x = p.x, z = p.y, "waypoint pushed out of rack footprint");
        p = candidates[idx].1;
    }
    if boxes
        .iter()
        .any(|b| b.expanded(clearance).contains_strict(p))
    {
        p = Vec2::new(p.x, lane_z);
    }
    p
}
