//! SameGame (workspace facade crate).
//!
//! The rules live in dedicated crates under `crates/`; this package re-exports
//! them as `samegame::{core,input,term,types}` and adds what the binary needs
//! on top: configuration and the session log.

pub use samegame_core as core;
pub use samegame_input as input;
pub use samegame_term as term;
pub use samegame_types as types;

pub mod config;
pub mod session_log;

pub use config::{AppConfig, Cli};
pub use session_log::{SessionLog, SessionRecord};
