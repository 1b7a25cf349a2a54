use serde::{Deserialize, Serialize};

use crate::canvas::{Color, ScoreTable};
use crate::room::clock::ClockState;

/// Key the snapshot is stored under in each room's scope
pub const SNAPSHOT_KEY: &str = "snapshot";

/// Everything about a room that survives a coordinator restart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomSnapshot {
    pub width: usize,
    pub height: usize,
    /// Row-major, `canvas[y][x]`
    pub canvas: Vec<Vec<Option<Color>>>,
    pub scores: ScoreTable,
    pub started: bool,
    pub over: bool,
    pub remaining: u32,
    #[serde(default)]
    pub drained: bool,
}

impl RoomSnapshot {
    pub fn clock_state(&self) -> ClockState {
        if self.over {
            ClockState::Ended
        } else if self.started {
            ClockState::Running
        } else {
            ClockState::Pending
        }
    }

    pub fn encode(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn decode(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}
