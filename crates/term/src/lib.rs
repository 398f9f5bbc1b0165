//! Terminal rendering module.
//!
//! A small rendering layer for playing in a terminal. It avoids widget
//! toolkits and renders into a plain framebuffer that is diffed and flushed
//! to the terminal through crossterm.
//!
//! - `fb`: styled character cells
//! - `game_view`: pure mapping from a `PuzzleSnapshot` to a framebuffer
//! - `renderer`: raw mode, alternate screen, and changed-run flushing

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use samegame_core as core;
pub use samegame_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Overlay, ViewState, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
