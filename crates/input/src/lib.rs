//! Terminal input module (engine-facing).
//!
//! Independent of any UI framework. It maps `crossterm` key events into
//! [`crate::types::PlayerAction`] and tracks the grid cursor those actions
//! move.

pub mod cursor;
pub mod map;

pub use samegame_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, should_quit};
