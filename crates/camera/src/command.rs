use std::fmt;
use std::str::FromStr;

use foundation::time::Time;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraCommandKind {
    Front,
    Top,
    Side,
    /// Close-up on the highlighted cell.
    Focus,
    /// Back to the default overview.
    Reset,
}

impl CameraCommandKind {
    pub const ALL: [CameraCommandKind; 5] = [
        CameraCommandKind::Front,
        CameraCommandKind::Top,
        CameraCommandKind::Side,
        CameraCommandKind::Focus,
        CameraCommandKind::Reset,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CameraCommandKind::Front => "front",
            CameraCommandKind::Top => "top",
            CameraCommandKind::Side => "side",
            CameraCommandKind::Focus => "focus",
            CameraCommandKind::Reset => "reset",
        }
    }
}

impl fmt::Display for CameraCommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCameraCommand(pub String);

impl fmt::Display for UnknownCameraCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown camera command '{}' (expected front, top, side, focus or reset)",
            self.0
        )
    }
}

impl std::error::Error for UnknownCameraCommand {}

impl FromStr for CameraCommandKind {
    type Err = UnknownCameraCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CameraCommandKind::ALL
            .into_iter()
            .find(|k| k.name() == wanted)
            .ok_or_else(|| UnknownCameraCommand(s.to_string()))
    }
}

/// A camera request from the UI.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraCommand {
    pub kind: CameraCommandKind,
    pub issued_at: Time,
}

impl CameraCommand {
    pub fn new(kind: CameraCommandKind, issued_at: Time) -> Self {
        Self { kind, issued_at }
    }
}
