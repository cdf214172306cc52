use serde::{Deserialize, Serialize};
use tracing::warn;

/// Physical dimensions of the storage racks (meters).
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of one shelf column along x.
    pub column_width: f64,
    /// Height of one storage row.
    pub cell_height: f64,
    /// Height of the lowest row's bottom edge above the floor.
    pub base_height: f64,
    /// Depth of one shelf half (front or back).
    pub shelf_depth: f64,
    /// Gap between the front and back halves of a bay.
    pub internal_gap: f64,
    /// Aisle width between adjacent bays.
    pub bay_gap: f64,
    /// Narrowest inter-bay aisle that can be walked through.
    pub min_walkable_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            column_width: 0.5,
            cell_height: 0.4,
            base_height: 0.0,
            shelf_depth: 0.45,
            internal_gap: 0.1,
            bay_gap: 1.5,
            min_walkable_gap: 1.2,
        }
    }
}

impl LayoutConfig {
    /// Problems that make this configuration unusable, if any.
    pub fn validate(&self) -> Result<(), String> {
        let positive = [
            ("column_width", self.column_width),
            ("cell_height", self.cell_height),
            ("shelf_depth", self.shelf_depth),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(format!("{name} must be finite and > 0 (got {v})"));
            }
        }
        let non_negative = [
            ("base_height", self.base_height),
            ("internal_gap", self.internal_gap),
            ("bay_gap", self.bay_gap),
            ("min_walkable_gap", self.min_walkable_gap),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("{name} must be finite and >= 0 (got {v})"));
            }
        }
        Ok(())
    }

    /// This config if valid, otherwise the defaults.
    pub fn sanitized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(reason) => {
                warn!(%reason, "invalid layout config, using defaults");
                Self::default()
            }
        }
    }

    /// Total depth of one bay (front half, internal gap, back half).
    pub fn bay_depth(&self) -> f64 {
        2.0 * self.shelf_depth + self.internal_gap
    }
}

#[cfg(test)]
mod tests {
    use super::LayoutConfig;

    #[test]
    fn defaults_are_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
        assert_eq!(LayoutConfig::default().bay_depth(), 1.0);
    }

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let bad = LayoutConfig {
            cell_height: f64::NAN,
            ..LayoutConfig::default()
        };
        assert!(bad.validate().is_err());
        assert_eq!(bad.sanitized(), LayoutConfig::default());

        let negative_gap = LayoutConfig {
            bay_gap: -1.0,
            ..LayoutConfig::default()
        };
        assert!(negative_gap.validate().unwrap_err().contains("bay_gap"));
    }
}
