//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data, usable from the rule engine, the terminal
//! view, and the session log alike.
//!
//! # Coordinates
//!
//! Grids are square, `size × size`, indexed by `(x, y)`:
//!
//! - **x**: column, 0 on the left
//! - **y**: row, 0 at the top (gravity pulls toward `size - 1`)
//!
//! # Round Defaults
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_MIN_CONNECTED` | 2 | Smallest removable group |
//! | `DEFAULT_TIMEOUT_MS` | 5000 | Generation time budget |
//! | `DEFAULT_REPLAY_DELAY_MS` | 1000 | Pause between replayed clicks |
//! | `DEFAULT_SIZE` | 8 | Grid side length |
//! | `DEFAULT_COLORS` | 5 | Palette size |
//!
//! # Examples
//!
//! ```
//! use samegame_types::{Coord, PlayerAction, RoundConfig, DEFAULT_MIN_CONNECTED};
//!
//! let config = RoundConfig::default();
//! assert_eq!(config.min_connected, DEFAULT_MIN_CONNECTED);
//! assert_eq!(config.max_clicks_for(8), 32);
//!
//! let coord = Coord::new(3, 4);
//! assert_eq!(coord.index(8), 4 * 8 + 3);
//!
//! assert_eq!(PlayerAction::from_str("replay"), Some(PlayerAction::Replay));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Smallest group a player may remove in one move.
pub const DEFAULT_MIN_CONNECTED: usize = 2;

/// Wall-clock budget for puzzle generation in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Pause between replayed solution clicks in milliseconds.
pub const DEFAULT_REPLAY_DELAY_MS: u64 = 1000;

/// Default grid side length.
pub const DEFAULT_SIZE: usize = 8;

/// Default number of colors.
pub const DEFAULT_COLORS: u8 = 5;

/// Palette index of a tile.
pub type Color = u8;

/// A grid position: column `x`, row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Build from a row-major cell id.
    pub const fn from_index(index: usize, size: usize) -> Self {
        Self {
            x: index % size,
            y: index / size,
        }
    }

    /// Row-major cell id for a grid of the given size.
    pub const fn index(&self, size: usize) -> usize {
        self.y * size + self.x
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

/// Terminal result of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every tile has been removed.
    Won,
    /// Tiles remain but no group reaches the minimum size.
    Lost,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Won => "won",
            Outcome::Lost => "lost",
        }
    }
}

/// Engine lifecycle state.
///
/// `Uninitialized → Ready → {Won, Lost} → Ready (after restore)`, with
/// `Replaying` while a recorded solution is being played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PuzzleState {
    Uninitialized,
    Ready,
    Won,
    Lost,
    Replaying,
}

impl PuzzleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            PuzzleState::Uninitialized => "uninitialized",
            PuzzleState::Ready => "ready",
            PuzzleState::Won => "won",
            PuzzleState::Lost => "lost",
            PuzzleState::Replaying => "replaying",
        }
    }

    /// Whether manual clicks are accepted in this state.
    pub fn accepts_clicks(&self) -> bool {
        matches!(self, PuzzleState::Ready)
    }
}

impl From<Outcome> for PuzzleState {
    fn from(value: Outcome) -> Self {
        match value {
            Outcome::Won => PuzzleState::Won,
            Outcome::Lost => PuzzleState::Lost,
        }
    }
}

/// Notification emitted by the engine for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    TileShown { coord: Coord, color: Color },
    TileHidden { coord: Coord },
    /// Only emitted for slow (paced) clicks.
    GroupHighlighted { coords: Vec<Coord> },
    OutcomeReached { outcome: Outcome },
}

/// Player intent, decoupled from any input device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    /// Click the tile under the cursor
    Select,
    /// Restore the initial puzzle
    Restore,
    /// Play back the recorded solution
    Replay,
    /// Generate a fresh puzzle
    NewPuzzle,
    Hint,
}

impl PlayerAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use samegame_types::PlayerAction;
    ///
    /// assert_eq!(PlayerAction::from_str("cursorLeft"), Some(PlayerAction::CursorLeft));
    /// assert_eq!(PlayerAction::from_str("SELECT"), Some(PlayerAction::Select));
    /// assert_eq!(PlayerAction::from_str("undo"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cursorleft" => Some(PlayerAction::CursorLeft),
            "cursorright" => Some(PlayerAction::CursorRight),
            "cursorup" => Some(PlayerAction::CursorUp),
            "cursordown" => Some(PlayerAction::CursorDown),
            "select" => Some(PlayerAction::Select),
            "restore" => Some(PlayerAction::Restore),
            "replay" => Some(PlayerAction::Replay),
            "newpuzzle" => Some(PlayerAction::NewPuzzle),
            "hint" => Some(PlayerAction::Hint),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerAction::CursorLeft => "cursorLeft",
            PlayerAction::CursorRight => "cursorRight",
            PlayerAction::CursorUp => "cursorUp",
            PlayerAction::CursorDown => "cursorDown",
            PlayerAction::Select => "select",
            PlayerAction::Restore => "restore",
            PlayerAction::Replay => "replay",
            PlayerAction::NewPuzzle => "newPuzzle",
            PlayerAction::Hint => "hint",
        }
    }
}

/// Per-round tuning knobs.
///
/// `max_clicks` and `max_stalls` bound a single self-play attempt. When left
/// as `None` they scale with the grid: `size² / min_connected` successful
/// clicks and `size²` consecutive misses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    pub min_connected: usize,
    pub timeout: Duration,
    pub max_clicks: Option<usize>,
    pub max_stalls: Option<usize>,
}

impl RoundConfig {
    pub fn with_min_connected(mut self, min_connected: usize) -> Self {
        self.min_connected = min_connected;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Successful clicks allowed in one self-play attempt.
    pub fn max_clicks_for(&self, size: usize) -> usize {
        self.max_clicks
            .unwrap_or_else(|| (size * size) / self.min_connected.max(1))
    }

    /// Consecutive misses tolerated before a self-play attempt is abandoned.
    pub fn max_stalls_for(&self, size: usize) -> usize {
        self.max_stalls.unwrap_or(size * size)
    }

    /// Reject parameters no search could satisfy.
    pub fn validate(&self, size: usize, color_count: usize) -> Result<(), EngineError> {
        if size == 0 {
            return Err(EngineError::InvalidConfiguration(
                "size must be at least 1".to_string(),
            ));
        }
        let cells = size * size;
        if color_count == 0 {
            return Err(EngineError::InvalidConfiguration(
                "color count must be at least 1".to_string(),
            ));
        }
        if color_count > Color::MAX as usize + 1 {
            return Err(EngineError::InvalidConfiguration(format!(
                "color count {} exceeds the palette limit of {}",
                color_count,
                Color::MAX as usize + 1
            )));
        }
        if color_count > cells {
            return Err(EngineError::InvalidConfiguration(format!(
                "{} colors cannot all appear on {} tiles",
                color_count, cells
            )));
        }
        if self.min_connected == 0 || self.min_connected > cells {
            return Err(EngineError::InvalidConfiguration(format!(
                "min connected {} must be within 1..={}",
                self.min_connected, cells
            )));
        }
        Ok(())
    }
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            min_connected: DEFAULT_MIN_CONNECTED,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            max_clicks: None,
            max_stalls: None,
        }
    }
}

/// Everything the engine reports as a failure.
///
/// A rejected click is not an error; `click` returns `false` for it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("coordinate ({x}, {y}) is outside a {size}x{size} grid")]
    OutOfBounds { x: usize, y: usize, size: usize },
    #[error("no solvable puzzle found within {elapsed_ms}ms ({candidates} candidates tried)")]
    GenerationTimeout { elapsed_ms: u64, candidates: u32 },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("no puzzle has been generated yet")]
    NoPuzzle,
}
