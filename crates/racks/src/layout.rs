//! Rack layout model.
//!
//! Bays sit side by side along `+x` starting at `x = 0`, separated by
//! `bay_gap`. Each bay is centred on `z = 0`: its front half faces `+z`, its
//! back half faces `-z`. Rows stack along `+y` and are shared by every bay.

use foundation::bounds::{Aabb2, Aabb3};
use foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::LayoutConfig;
use crate::target::{Face, Highlight, ShelfRef, TargetCell};

/// Bay entry as stored by the location-configuration subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaySpec {
    #[serde(alias = "bay")]
    pub index: u32,
    #[serde(alias = "shelfLabels", alias = "shelf_labels")]
    pub shelves: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowDef {
    #[serde(alias = "row")]
    pub index: u32,
    pub label: String,
}

/// Raw layout input: bay → shelf labels, row → label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSpec {
    #[serde(default)]
    pub bays: Vec<BaySpec>,
    #[serde(default)]
    pub rows: Vec<RowDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bay {
    pub index: u32,
    pub shelf_labels: Vec<String>,
    /// Shelves per face; the front face holds the first `column_count` shelves.
    pub column_count: usize,
    pub offset_x: f64,
    pub width: f64,
}

impl Bay {
    /// Total shelves across both faces (at least one column's worth).
    pub fn shelf_count(&self) -> usize {
        self.shelf_labels.len().max(self.column_count)
    }
}

/// Walkable aisle between two adjacent bays.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Gap {
    pub left_bay: u32,
    pub right_bay: u32,
    pub min_x: f64,
    pub max_x: f64,
}

impl Gap {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RackLayout {
    config: LayoutConfig,
    bays: Vec<Bay>,
    rows: Vec<RowDef>,
    gaps: Vec<Gap>,
    total_width: f64,
    total_height: f64,
    total_depth: f64,
}

impl Default for RackLayout {
    fn default() -> Self {
        RackLayout::new(&LayoutSpec::default(), LayoutConfig::default())
    }
}

impl RackLayout {
    /// Build the layout. Never fails: an empty bay or row list is replaced by
    /// a single default bay or row so downstream geometry is always valid.
    pub fn new(spec: &LayoutSpec, config: LayoutConfig) -> Self {
        let config = config.sanitized();

        let mut bay_specs = spec.bays.clone();
        bay_specs.sort_by_key(|b| b.index);
        let before = bay_specs.len();
        bay_specs.dedup_by_key(|b| b.index);
        if bay_specs.len() != before {
            warn!(dropped = before - bay_specs.len(), "duplicate bay indices ignored");
        }
        if bay_specs.is_empty() {
            warn!("layout has no bays, substituting a single default bay");
            bay_specs.push(BaySpec {
                index: 1,
                shelves: vec!["A".to_string(), "B".to_string()],
            });
        }

        let mut rows = spec.rows.clone();
        rows.sort_by_key(|r| r.index);
        rows.dedup_by_key(|r| r.index);
        if rows.is_empty() {
            warn!("layout has no rows, substituting a single default row");
            rows.push(RowDef {
                index: 0,
                label: "1".to_string(),
            });
        }

        let mut bays = Vec::with_capacity(bay_specs.len());
        let mut cursor = 0.0;
        for spec in bay_specs {
            let column_count = spec.shelves.len().div_ceil(2).max(1);
            let width = column_count as f64 * config.column_width;
            bays.push(Bay {
                index: spec.index,
                shelf_labels: spec.shelves,
                column_count,
                offset_x: cursor,
                width,
            });
            cursor += width + config.bay_gap;
        }

        let gaps = bays
            .windows(2)
            .map(|pair| Gap {
                left_bay: pair[0].index,
                right_bay: pair[1].index,
                min_x: pair[0].offset_x + pair[0].width,
                max_x: pair[1].offset_x,
            })
            .filter(|g| g.width() >= config.min_walkable_gap)
            .collect();

        let total_width = bays
            .last()
            .map(|b| b.offset_x + b.width)
            .unwrap_or(config.column_width);
        let total_height = config.base_height + rows.len() as f64 * config.cell_height;
        let total_depth = config.bay_depth();

        Self {
            config,
            bays,
            rows,
            gaps,
            total_width,
            total_height,
            total_depth,
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn bays(&self) -> &[Bay] {
        &self.bays
    }

    pub fn rows(&self) -> &[RowDef] {
        &self.rows
    }

    /// Aisles between adjacent bays at least `min_walkable_gap` wide, left to right.
    pub fn gaps(&self) -> &[Gap] {
        &self.gaps
    }

    pub fn total_width(&self) -> f64 {
        self.total_width
    }

    pub fn total_height(&self) -> f64 {
        self.total_height
    }

    pub fn total_depth(&self) -> f64 {
        self.total_depth
    }

    /// Distance from the bay centre line to either shelf face.
    pub fn half_depth(&self) -> f64 {
        0.5 * self.total_depth
    }

    pub fn bay(&self, index: u32) -> Option<&Bay> {
        self.bays.iter().find(|b| b.index == index)
    }

    /// Ground-plane footprint `(x, z)` of a bay.
    pub fn bay_bounding_box(&self, index: u32) -> Option<Aabb2> {
        self.bay(index).map(|b| self.footprint(b))
    }

    /// Footprints of every bay, left to right.
    pub fn bay_boxes(&self) -> Vec<Aabb2> {
        self.bays.iter().map(|b| self.footprint(b)).collect()
    }

    /// Bounding box of the whole rack arrangement.
    pub fn bounds(&self) -> Aabb3 {
        let hd = self.half_depth();
        Aabb3::new([0.0, 0.0, -hd], [self.total_width, self.total_height, hd])
    }

    /// Position of the row in the stacking order.
    pub fn row_level(&self, row: u32) -> Option<usize> {
        self.rows.iter().position(|r| r.index == row)
    }

    pub fn row_label(&self, row: u32) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.index == row)
            .map(|r| r.label.as_str())
    }

    pub fn shelf_label(&self, bay: u32, shelf: usize) -> Option<&str> {
        self.bay(bay)
            .and_then(|b| b.shelf_labels.get(shelf))
            .map(String::as_str)
    }

    /// World position of the centre of cell `(bay, shelf, row)`.
    ///
    /// `shelf` spans both faces: indices below the bay's column count are on
    /// the front face, the rest on the back face.
    pub fn cell_position(&self, bay: u32, shelf: usize, row: u32) -> Option<Vec3> {
        let b = self.bay(bay)?;
        if shelf >= b.shelf_count() {
            return None;
        }
        let level = self.row_level(row)?;
        let (face, column) = if shelf < b.column_count {
            (Face::Front, shelf)
        } else {
            (Face::Back, shelf - b.column_count)
        };
        let c = &self.config;
        let x = b.offset_x + (column as f64 + 0.5) * c.column_width;
        let y = c.base_height + (level as f64 + 0.5) * c.cell_height;
        let z = face.sign() * (0.5 * c.internal_gap + 0.5 * c.shelf_depth);
        let p = Vec3::new(x, y, z);
        p.is_finite().then_some(p)
    }

    /// Resolve a locator result into a target cell.
    pub fn locate(&self, highlight: &Highlight) -> Option<TargetCell> {
        let bay = self.bay(highlight.bay)?;
        let shelf = match &highlight.shelf {
            ShelfRef::Index(i) => *i,
            ShelfRef::Label(label) => {
                let wanted = label.trim();
                bay.shelf_labels.iter().position(|l| l.trim() == wanted)?
            }
        };
        let position = self.cell_position(highlight.bay, shelf, highlight.row)?;
        Some(TargetCell {
            bay: highlight.bay,
            shelf,
            row: highlight.row,
            position,
            face: Face::of_z(position.z),
            label: highlight.label.clone(),
            shelf_label: self.shelf_label(highlight.bay, shelf).map(str::to_string),
            row_label: self.row_label(highlight.row).map(str::to_string),
            metadata: highlight.metadata.clone(),
        })
    }

    fn footprint(&self, b: &Bay) -> Aabb2 {
        let hd = self.half_depth();
        Aabb2::new([b.offset_x, -hd], [b.offset_x + b.width, hd])
    }
}
