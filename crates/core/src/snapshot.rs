use serde::{Deserialize, Serialize};

use crate::types::{Color, PuzzleState};

/// Owned, plain-data view of the engine for rendering and logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PuzzleSnapshot {
    pub size: usize,
    /// Row-major; `None` for empty slots.
    pub cells: Vec<Option<Color>>,
    pub state: PuzzleState,
    /// RNG state the current puzzle was generated from.
    pub seed: u32,
    pub color_count: usize,
    pub min_connected: usize,
    pub moves: u32,
    pub remaining: usize,
    pub solution_len: usize,
    /// True while tiles are disabled for a replay.
    pub disabled: bool,
}

impl PuzzleSnapshot {
    pub fn clear(&mut self) {
        self.size = 0;
        self.cells.clear();
        self.state = PuzzleState::Uninitialized;
        self.seed = 0;
        self.color_count = 0;
        self.min_connected = 0;
        self.moves = 0;
        self.remaining = 0;
        self.solution_len = 0;
        self.disabled = false;
    }

    pub fn cell(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.size || y >= self.size {
            return None;
        }
        self.cells[y * self.size + x]
    }

    pub fn playable(&self) -> bool {
        self.state.accepts_clicks() && !self.disabled
    }
}

impl Default for PuzzleSnapshot {
    fn default() -> Self {
        Self {
            size: 0,
            cells: Vec::new(),
            state: PuzzleState::Uninitialized,
            seed: 0,
            color_count: 0,
            min_connected: 0,
            moves: 0,
            remaining: 0,
            solution_len: 0,
            disabled: false,
        }
    }
}
