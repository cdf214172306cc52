use std::fmt;

use navigation::standing::Category;
use serde::{Deserialize, Serialize};

/// Retrieval animation phases. Transitions only move forward.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    Walk,
    Turn,
    BendReach,
    PlaceLadder,
    Climb,
    Reach,
    Done,
}

impl Phase {
    pub fn name(self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Walk => "walk",
            Phase::Turn => "turn",
            Phase::BendReach => "bend_reach",
            Phase::PlaceLadder => "place_ladder",
            Phase::Climb => "climb",
            Phase::Reach => "reach",
            Phase::Done => "done",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == Phase::Done
    }

    /// Phase entered after `turn` for a target of the given category.
    pub fn after_turn(category: Category) -> Phase {
        match category {
            Category::Low => Phase::BendReach,
            Category::Mid => Phase::Reach,
            Category::High => Phase::PlaceLadder,
        }
    }

    /// Full phase sequence for a retrieval of the given category.
    pub fn sequence(category: Category) -> &'static [Phase] {
        match category {
            Category::Low => &[
                Phase::Idle,
                Phase::Walk,
                Phase::Turn,
                Phase::BendReach,
                Phase::Reach,
                Phase::Done,
            ],
            Category::Mid => &[
                Phase::Idle,
                Phase::Walk,
                Phase::Turn,
                Phase::Reach,
                Phase::Done,
            ],
            Category::High => &[
                Phase::Idle,
                Phase::Walk,
                Phase::Turn,
                Phase::PlaceLadder,
                Phase::Climb,
                Phase::Reach,
                Phase::Done,
            ],
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
