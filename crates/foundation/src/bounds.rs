use serde::{Deserialize, Serialize};

use crate::math::{Vec2, Vec3};

/// Axis-aligned bounding boxes
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb3 {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
    }

    /// Zero-area or non-finite boxes.
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Grow every side by `by`.
    pub fn expanded(&self, by: f64) -> Self {
        Aabb2::new(
            [self.min[0] - by, self.min[1] - by],
            [self.max[0] + by, self.max[1] + by],
        )
    }

    /// Point lies strictly inside (boundary excluded).
    pub fn contains_strict(&self, p: Vec2) -> bool {
        p.x > self.min[0] && p.x < self.max[0] && p.y > self.min[1] && p.y < self.max[1]
    }

    pub fn distance_to_point(&self, p: Vec2) -> f64 {
        let dx = (self.min[0] - p.x).max(0.0).max(p.x - self.max[0]);
        let dy = (self.min[1] - p.y).max(0.0).max(p.y - self.max[1]);
        dx.hypot(dy)
    }

    /// Whether segment `a→b` passes through the open interior of the box.
    ///
    /// Grazing an edge or a corner does not count as overlap.
    pub fn segment_overlaps_interior(&self, a: Vec2, b: Vec2) -> bool {
        self.segment_t_range(a, b, false).is_some()
    }

    /// Minimum Euclidean distance between segment `a→b` and the closed box.
    pub fn distance_to_segment(&self, a: Vec2, b: Vec2) -> f64 {
        if self.segment_t_range(a, b, true).is_some() {
            return 0.0;
        }
        let corners = [
            Vec2::new(self.min[0], self.min[1]),
            Vec2::new(self.max[0], self.min[1]),
            Vec2::new(self.max[0], self.max[1]),
            Vec2::new(self.min[0], self.max[1]),
        ];
        corners
            .iter()
            .map(|&c| point_segment_distance(c, a, b))
            .chain([self.distance_to_point(a), self.distance_to_point(b)])
            .fold(f64::INFINITY, f64::min)
    }

    // Slab test. Returns the parameter interval of the segment inside the box.
    fn segment_t_range(&self, a: Vec2, b: Vec2, closed: bool) -> Option<(f64, f64)> {
        let d = b - a;
        let mut t0: f64 = 0.0;
        let mut t1: f64 = 1.0;
        for (p, dp, lo, hi) in [
            (a.x, d.x, self.min[0], self.max[0]),
            (a.y, d.y, self.min[1], self.max[1]),
        ] {
            if dp.abs() < 1e-15 {
                let inside = if closed {
                    p >= lo && p <= hi
                } else {
                    p > lo && p < hi
                };
                if !inside {
                    return None;
                }
                continue;
            }
            let (mut ta, mut tb) = ((lo - p) / dp, (hi - p) / dp);
            if ta > tb {
                std::mem::swap(&mut ta, &mut tb);
            }
            t0 = t0.max(ta);
            t1 = t1.min(tb);
            let empty = if closed { t0 > t1 } else { t0 >= t1 };
            if empty {
                return None;
            }
        }
        Some((t0, t1))
    }
}

impl Aabb3 {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Aabb3 { min, max }
    }

    pub fn center(&self) -> Vec3 {
        Vec3::new(
            0.5 * (self.min[0] + self.max[0]),
            0.5 * (self.min[1] + self.max[1]),
            0.5 * (self.min[2] + self.max[2]),
        )
    }

    pub fn size(&self) -> Vec3 {
        Vec3::new(
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        )
    }

    pub fn is_finite(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
    }
}

/// Distance from `p` to the closed segment `a→b`.
pub fn point_segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 <= 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
