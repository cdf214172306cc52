//! Property tests for the path planner over randomized rack arrangements.
//!
//! Most properties draw both endpoints from the walking areas in front of
//! and behind the racks (at least `margin` away from every bay). Standing
//! positions for real target cells can sit closer to their own face; those
//! are checked against every other bay.

use foundation::bounds::Aabb2;
use foundation::math::Vec2;
use navigation::{NavigationConfig, PathPlan, plan, polyline_length, standing_position};
use proptest::prelude::*;
use racks::{BaySpec, Highlight, LayoutConfig, LayoutSpec, RackLayout, RowDef, ShelfRef};

const EPS: f64 = 1e-9;

fn build_layout(shelf_counts: &[usize], bay_gap: f64) -> RackLayout {
    build_layout_with_rows(shelf_counts, 1, bay_gap)
}

fn build_layout_with_rows(shelf_counts: &[usize], rows: u32, bay_gap: f64) -> RackLayout {
    let spec = LayoutSpec {
        bays: shelf_counts
            .iter()
            .enumerate()
            .map(|(i, n)| BaySpec {
                index: i as u32 + 1,
                shelves: (0..*n).map(|s| format!("S{s}")).collect(),
            })
            .collect(),
        rows: (0..rows)
            .map(|i| RowDef {
                index: i,
                label: format!("{}", i + 1),
            })
            .collect(),
    };
    RackLayout::new(
        &spec,
        LayoutConfig {
            bay_gap,
            ..LayoutConfig::default()
        },
    )
}

/// Map unit-square samples onto the walking area around `layout`.
fn walk_point(layout: &RackLayout, margin: f64, fx: f64, dz: f64, front: bool) -> Vec2 {
    let x = -3.0 + fx * (layout.total_width() + 6.0);
    let side = if front { 1.0 } else { -1.0 };
    Vec2::new(x, side * (layout.half_depth() + margin + dz))
}

/// Candidate lengths derived from first principles, in enumeration order.
fn reference_candidate_lengths(
    start: Vec2,
    standing: Vec2,
    layout: &RackLayout,
    cfg: &NavigationConfig,
) -> Vec<f64> {
    let c = cfg.margin + cfg.avatar_radius;
    let front = |p: Vec2| p.y >= 0.0;
    let lane = |is_front: bool| {
        if is_front {
            layout.half_depth() + c
        } else {
            -(layout.half_depth() + c)
        }
    };

    let ideal = if front(start) != front(standing) {
        let t = start.y / (start.y - standing.y);
        start.x + t * (standing.x - start.x)
    } else {
        0.5 * (start.x + standing.x)
    };

    let mut xs = vec![-cfg.margin, layout.total_width() + cfg.margin];
    for g in layout.gaps() {
        let (lo, hi) = (g.min_x + c, g.max_x - c);
        if lo <= hi {
            xs.push(ideal.max(lo).min(hi));
        }
    }

    xs.into_iter()
        .map(|x| {
            let mut pts = vec![start, Vec2::new(x, lane(front(start)))];
            if front(start) != front(standing) {
                pts.push(Vec2::new(x, lane(front(standing))));
            }
            pts.push(standing);
            polyline_length(&pts)
        })
        .collect()
}

fn min_clearance(plan: &PathPlan, start: Vec2, standing: Vec2, boxes: &[Aabb2]) -> f64 {
    let pts = plan.polyline(start, standing);
    pts.windows(2)
        .flat_map(|w| boxes.iter().map(move |b| b.distance_to_segment(w[0], w[1])))
        .fold(f64::INFINITY, f64::min)
}

/// Index-based pick of one cell: `(bay, shelf, row)` as unit samples.
fn cell() -> impl Strategy<Value = (f64, f64, f64)> {
    (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0)
}

fn pick(n: usize, f: f64) -> usize {
    ((f * n as f64) as usize).min(n - 1)
}

fn arrangement() -> impl Strategy<Value = (Vec<usize>, f64)> {
    (prop::collection::vec(1usize..=8, 1..=5), 0.3f64..3.0)
}

fn endpoint() -> impl Strategy<Value = (f64, f64, bool)> {
    (0.0f64..=1.0, 0.0f64..4.0, any::<bool>())
}

proptest! {
    #[test]
    fn every_segment_keeps_the_margin(
        (counts, gap) in arrangement(),
        (sx, sdz, sfront) in endpoint(),
        (tx, tdz, tfront) in endpoint(),
    ) {
        let cfg = NavigationConfig::default();
        let layout = build_layout(&counts, gap);
        let start = walk_point(&layout, cfg.margin, sx, sdz, sfront);
        let standing = walk_point(&layout, cfg.margin, tx, tdz, tfront);

        let p = plan(start, standing, &layout, &cfg).expect("finite geometry always plans");
        let clearance = min_clearance(&p, start, standing, &layout.bay_boxes());
        prop_assert!(
            clearance >= cfg.margin - EPS,
            "clearance {clearance} < margin {} for {:?}",
            cfg.margin,
            p
        );
    }

    #[test]
    fn routes_to_real_standing_positions_keep_the_margin_from_other_bays(
        (counts, gap) in arrangement(),
        rows in 1u32..=8,
        (fb, fs, fr) in cell(),
        (sx, sdz, sfront) in endpoint(),
    ) {
        let cfg = NavigationConfig::default();
        let layout = build_layout_with_rows(&counts, rows, gap);
        let bay = pick(counts.len(), fb);
        let target = layout
            .locate(&Highlight {
                bay: bay as u32 + 1,
                shelf: ShelfRef::Index(pick(counts[bay], fs)),
                row: pick(rows as usize, fr) as u32,
                label: "box".to_string(),
                metadata: None,
            })
            .expect("sampled cell exists");
        let standing = standing_position(&target, &layout, &cfg).expect("standing");
        let start = walk_point(&layout, cfg.margin, sx, sdz, sfront);

        let p = plan(start, standing.point, &layout, &cfg).expect("plan");
        let boxes = layout.bay_boxes();
        let others: Vec<Aabb2> = boxes
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != bay)
            .map(|(_, b)| *b)
            .collect();
        let clearance = min_clearance(&p, start, standing.point, &others);
        prop_assert!(
            clearance >= cfg.margin - EPS,
            "clearance {clearance} < margin {} for {:?} (standoff {})",
            cfg.margin,
            p,
            standing.standoff
        );
    }

    #[test]
    fn selected_route_is_no_longer_than_any_candidate(
        (counts, gap) in arrangement(),
        (sx, sdz, sfront) in endpoint(),
        (tx, tdz, tfront) in endpoint(),
    ) {
        let cfg = NavigationConfig::default();
        let layout = build_layout(&counts, gap);
        let start = walk_point(&layout, cfg.margin, sx, sdz, sfront);
        let standing = walk_point(&layout, cfg.margin, tx, tdz, tfront);

        let p = plan(start, standing, &layout, &cfg).expect("plan");
        let chosen = p.length(start, standing);
        for other in reference_candidate_lengths(start, standing, &layout, &cfg) {
            prop_assert!(chosen <= other + EPS, "chosen {chosen} > candidate {other}");
        }
    }

    #[test]
    fn direct_plan_iff_straight_segment_is_clear(
        (counts, gap) in arrangement(),
        (sx, sdz, sfront) in endpoint(),
        (tx, tdz, tfront) in endpoint(),
    ) {
        let cfg = NavigationConfig::default();
        let layout = build_layout(&counts, gap);
        let start = walk_point(&layout, cfg.margin, sx, sdz, sfront);
        let standing = walk_point(&layout, cfg.margin, tx, tdz, tfront);

        let overlaps = layout
            .bay_boxes()
            .iter()
            .any(|b| b.expanded(cfg.margin).segment_overlaps_interior(start, standing));
        let p = plan(start, standing, &layout, &cfg).expect("plan");
        prop_assert_eq!(p.is_direct(), !overlaps);
    }
}

#[test]
fn crossing_to_the_far_face_of_the_second_bay_uses_two_waypoints() {
    let spec = LayoutSpec {
        bays: vec![
            BaySpec {
                index: 1,
                shelves: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            },
            BaySpec {
                index: 2,
                shelves: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            },
        ],
        rows: (0..6)
            .map(|i| RowDef {
                index: i,
                label: format!("{}", i + 1),
            })
            .collect(),
    };
    let layout = RackLayout::new(
        &spec,
        LayoutConfig {
            bay_gap: 2.0,
            ..LayoutConfig::default()
        },
    );
    let cfg = NavigationConfig::default();

    let target = layout
        .locate(&Highlight {
            bay: 2,
            shelf: ShelfRef::Label("C".into()),
            row: 2,
            label: "0815".into(),
            metadata: None,
        })
        .expect("target on bay 2 back face");
    assert!((target.height() - 1.0).abs() < 1e-12);

    let standing = standing_position(&target, &layout, &cfg).expect("standing");
    let bay1 = layout.bay_bounding_box(1).expect("bay 1");
    let start = Vec2::new(
        0.5 * (bay1.min[0] + bay1.max[0]),
        layout.half_depth() + cfg.margin + 1.0,
    );

    let p = plan(start, standing.point, &layout, &cfg).expect("plan");
    assert_eq!(p.waypoints.len(), 2);
    assert!(p.waypoints[0].y > 0.0);
    assert!(p.waypoints[1].y < 0.0);
    let gap = layout.gaps()[0];
    assert!(p.waypoints[0].x > gap.min_x && p.waypoints[0].x < gap.max_x);
}
