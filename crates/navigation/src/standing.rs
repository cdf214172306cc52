//! Standing-position calculator.
//!
//! The avatar stands in front of the target's shelf face at the target's
//! `x`, backed off from the face by a standoff that depends on how high the
//! target sits.

use foundation::math::Vec2;
use racks::layout::RackLayout;
use racks::target::{Face, TargetCell};
use serde::{Deserialize, Serialize};

use crate::config::NavigationConfig;

/// How the avatar reaches a target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Bend down.
    Low,
    /// Reach from the floor.
    Mid,
    /// Climb the ladder.
    High,
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct StandingPosition {
    /// Ground-plane point (`y` is world `z`).
    pub point: Vec2,
    pub face: Face,
    pub category: Category,
    /// Gap between the avatar and the shelf face.
    pub standoff: f64,
}

pub fn category_for_height(h: f64, config: &NavigationConfig) -> Category {
    if h < config.bend_threshold {
        Category::Low
    } else if h < config.ladder_threshold {
        Category::Mid
    } else {
        Category::High
    }
}

/// Approach category and standoff distance for a target at height `h`.
///
/// Returns `None` for non-finite heights.
pub fn standoff_distance(h: f64, config: &NavigationConfig) -> Option<(Category, f64)> {
    if !h.is_finite() {
        return None;
    }
    let h = h.max(0.0);
    let category = category_for_height(h, config);
    let distance = match category {
        Category::Low => lerp_span(
            h,
            0.0,
            config.bend_threshold,
            config.min_standoff,
            config.mid_standoff,
        ),
        Category::Mid => lerp_span(
            h,
            config.bend_threshold,
            config.ladder_threshold,
            config.mid_standoff,
            config.high_standoff,
        ),
        Category::High => {
            let lean = h * config.ladder_lean_angle.tan();
            // Keeps the ladder top clear of the shelf structure above the target.
            let floor = config.ladder_base_clearance
                + (h - config.tall_target_height).max(0.0) * config.tall_clearance_slope;
            lean.max(floor)
        }
    };
    distance.is_finite().then_some((category, distance))
}

/// Where the avatar must stand to retrieve `target`.
pub fn standing_position(
    target: &TargetCell,
    layout: &RackLayout,
    config: &NavigationConfig,
) -> Option<StandingPosition> {
    if !target.position.is_finite() {
        return None;
    }
    let (category, standoff) = standoff_distance(target.height(), config)?;
    let face = Face::of_z(target.position.z);
    let z = face.sign() * (layout.half_depth() + standoff);
    let point = Vec2::new(target.position.x, z);
    point.is_finite().then_some(StandingPosition {
        point,
        face,
        category,
        standoff,
    })
}

fn lerp_span(h: f64, h0: f64, h1: f64, d0: f64, d1: f64) -> f64 {
    let span = h1 - h0;
    if span <= 0.0 {
        return d0;
    }
    let t = ((h - h0) / span).clamp(0.0, 1.0);
    d0 + (d1 - d0) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use racks::config::LayoutConfig;
    use racks::layout::{BaySpec, LayoutSpec, RowDef};
    use racks::target::{Highlight, ShelfRef};

    fn cfg() -> NavigationConfig {
        NavigationConfig::default()
    }

    #[test]
    fn categories_follow_thresholds() {
        let c = cfg();
        assert_eq!(category_for_height(0.2, &c), Category::Low);
        assert_eq!(category_for_height(0.9, &c), Category::Mid);
        assert_eq!(category_for_height(1.549, &c), Category::Mid);
        assert_eq!(category_for_height(1.55, &c), Category::High);
    }

    #[test]
    fn standoff_is_monotonic_below_ladder_threshold() {
        let c = cfg();
        let mut prev = 0.0;
        let mut h = 0.0;
        while h < c.ladder_threshold {
            let (_, d) = standoff_distance(h, &c).expect("finite standoff");
            assert!(d >= prev, "standoff dropped at h={h}: {d} < {prev}");
            prev = d;
            h += 0.01;
        }
    }

    #[test]
    fn standoff_endpoints() {
        let c = cfg();
        assert_eq!(standoff_distance(0.0, &c), Some((Category::Low, c.min_standoff)));
        let (_, at_bend) = standoff_distance(c.bend_threshold, &c).expect("bend");
        assert!((at_bend - c.mid_standoff).abs() < 1e-12);
    }

    #[test]
    fn high_targets_use_ladder_lean_with_growing_floor() {
        let c = cfg();
        let (cat, d) = standoff_distance(2.5, &c).expect("high");
        assert_eq!(cat, Category::High);
        let lean = 2.5 * c.ladder_lean_angle.tan();
        let floor = c.ladder_base_clearance + 0.3 * c.tall_clearance_slope;
        assert!((d - lean.max(floor)).abs() < 1e-12);

        let (_, very_tall) = standoff_distance(4.0, &c).expect("very tall");
        assert!(very_tall > d);
    }

    #[test]
    fn non_finite_height_is_rejected() {
        assert!(standoff_distance(f64::NAN, &cfg()).is_none());
    }

    #[test]
    fn standing_point_mirrors_for_back_face() {
        let spec = LayoutSpec {
            bays: vec![BaySpec {
                index: 1,
                shelves: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            }],
            rows: (0..6)
                .map(|i| RowDef {
                    index: i,
                    label: format!("{}", i + 1),
                })
                .collect(),
        };
        let layout = RackLayout::new(&spec, LayoutConfig::default());
        let locate = |shelf: usize| {
            layout
                .locate(&Highlight {
                    bay: 1,
                    shelf: ShelfRef::Index(shelf),
                    row: 2,
                    label: "1".into(),
                    metadata: None,
                })
                .expect("target")
        };
        let front = standing_position(&locate(0), &layout, &cfg()).expect("front");
        let back = standing_position(&locate(2), &layout, &cfg()).expect("back");
        assert_eq!(front.face, Face::Front);
        assert_eq!(back.face, Face::Back);
        assert!(front.point.y > layout.half_depth());
        assert!(back.point.y < -layout.half_depth());
        assert!((front.point.y + back.point.y).abs() < 1e-12);
        assert_eq!(front.category, Category::Mid);
    }
}
