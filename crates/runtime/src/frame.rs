use foundation::time::Time;
use serde::Serialize;

/// Frame metadata for one render tick.
///
/// Hosts drive the session with whatever delta their render loop produced;
/// headless runs advance by a fixed step so traces replay bit-for-bit.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Delta time of this frame (seconds).
    pub dt_s: f64,
    /// Session time at the end of the frame (seconds).
    pub time: Time,
}

impl Frame {
    /// The frame before any tick has run.
    pub fn start() -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time: Time::ZERO,
        }
    }

    /// Next frame with a host-supplied delta. Non-finite or negative deltas
    /// still advance the index but leave time untouched.
    pub fn advance(self, dt_s: f64) -> Self {
        let applied = if dt_s.is_finite() && dt_s > 0.0 { dt_s } else { 0.0 };
        Self {
            index: self.index + 1,
            dt_s: applied,
            time: self.time.advanced(applied),
        }
    }
}
