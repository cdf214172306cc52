use serde::{Deserialize, Serialize};
use tracing::warn;

/// Camera transition timing and preset framing.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Seconds for any transition to reach its goal.
    pub transition_duration: f64,
    /// Horizontal distance from the target cell in the focus view.
    pub focus_distance: f64,
    /// Height above the target cell in the focus view.
    pub focus_lift: f64,
    /// Preset distance from the layout centre, in multiples of its largest extent.
    pub preset_distance: f64,
    pub max_dt: f64,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            transition_duration: 1.2,
            focus_distance: 2.2,
            focus_lift: 0.4,
            preset_distance: 1.6,
            max_dt: 0.1,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), String> {
        let values = [
            ("transition_duration", self.transition_duration),
            ("focus_distance", self.focus_distance),
            ("focus_lift", self.focus_lift),
            ("preset_distance", self.preset_distance),
            ("max_dt", self.max_dt),
        ];
        for (name, v) in values {
            if !(v.is_finite() && v >= 0.0) {
                return Err(format!("{name} must be finite and >= 0 (got {v})"));
            }
        }
        if self.max_dt <= 0.0 {
            return Err("max_dt must be positive".to_string());
        }
        Ok(())
    }

    pub fn sanitized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(reason) => {
                warn!(%reason, "invalid camera config, using defaults");
                Self::default()
            }
        }
    }
}
