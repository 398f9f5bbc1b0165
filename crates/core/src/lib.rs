//! Core rules - pure, deterministic SameGame logic
//!
//! This crate holds the puzzle rules with no I/O:
//!
//! | Module | Concern |
//! |--------|---------|
//! | `grid` | Square tile grid with visibility, freeze, disable flags |
//! | `group` | Connected same-color component search |
//! | `collapse` | Gravity then empty-column removal |
//! | `outcome` | Won / lost evaluation |
//! | `generator` | Solvable puzzle search by random self-play |
//! | `engine` | Round lifecycle, event queue, restore and replay |
//!
//! # Examples
//!
//! ```
//! use samegame_core::{PuzzleEngine, Grid};
//! use samegame_core::types::{Coord, PuzzleState};
//!
//! let mut engine = PuzzleEngine::new(1);
//! engine.load(Grid::from_array([[0, 0], [1, 1]]), vec![Coord::new(0, 0), Coord::new(0, 1)]);
//!
//! assert!(engine.click(0, 0, false));
//! assert!(engine.click(0, 1, false));
//! assert_eq!(engine.state(), PuzzleState::Won);
//! ```

pub use samegame_types as types;

pub mod collapse;
pub mod engine;
pub mod events;
pub mod generator;
pub mod grid;
pub mod group;
pub mod outcome;
pub mod replay;
pub mod rng;
pub mod snapshot;

pub use collapse::{collapse, collapse_columns, collapse_with, gravity};
pub use engine::PuzzleEngine;
pub use events::EventSink;
pub use generator::{play_solution, GeneratedPuzzle, GenerationStats, PuzzleGenerator};
pub use grid::{Grid, Tile};
pub use group::{find_group, GroupFinder};
pub use outcome::{evaluate, has_move, is_lost, is_won, removable_groups};
pub use replay::{Pacer, ReplayControl, ReplayFrame, ReplayReport, ReplayStep, Unpaced};
pub use rng::SimpleRng;
pub use snapshot::PuzzleSnapshot;
