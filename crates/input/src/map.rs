//! Key mapping from terminal events to player actions.

use crate::types::PlayerAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to player actions.
///
/// Key releases are ignored so terminals that report them do not click twice.
pub fn handle_key_event(key: KeyEvent) -> Option<PlayerAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        // Cursor
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => Some(PlayerAction::CursorLeft),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => Some(PlayerAction::CursorRight),
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => Some(PlayerAction::CursorUp),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => Some(PlayerAction::CursorDown),

        // Click
        KeyCode::Char(' ') | KeyCode::Enter => Some(PlayerAction::Select),

        // Round control
        KeyCode::Char('r') | KeyCode::Char('R') => Some(PlayerAction::Restore),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(PlayerAction::Replay),
        KeyCode::Char('n') | KeyCode::Char('N') => Some(PlayerAction::NewPuzzle),
        KeyCode::Char('?') => Some(PlayerAction::Hint),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
