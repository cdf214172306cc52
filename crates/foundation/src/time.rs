use serde::{Deserialize, Serialize};

/// Time primitives
#[derive(Copy, Clone, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Time(pub f64); // seconds

impl Time {
    pub const ZERO: Time = Time(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    pub fn advanced(self, dt_s: f64) -> Time {
        Time(self.0 + dt_s)
    }
}
