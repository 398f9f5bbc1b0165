//! Grid cursor driven by player actions.

use crate::types::{Coord, PlayerAction};

/// Selection cursor over a `size × size` grid, clamped to its edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    x: usize,
    y: usize,
    size: usize,
}

impl Cursor {
    pub fn new(size: usize) -> Self {
        Self { x: 0, y: 0, size }
    }

    pub fn position(&self) -> Coord {
        Coord::new(self.x, self.y)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Adopt a new grid size, pulling the cursor back inside if needed.
    pub fn resize(&mut self, size: usize) {
        self.size = size;
        let max = size.saturating_sub(1);
        self.x = self.x.min(max);
        self.y = self.y.min(max);
    }

    pub fn move_to(&mut self, coord: Coord) {
        let max = self.size.saturating_sub(1);
        self.x = coord.x.min(max);
        self.y = coord.y.min(max);
    }

    /// Apply a cursor action. Returns true if it was one; other actions are
    /// left for the caller.
    pub fn apply(&mut self, action: PlayerAction) -> bool {
        let max = self.size.saturating_sub(1);
        match action {
            PlayerAction::CursorLeft => self.x = self.x.saturating_sub(1),
            PlayerAction::CursorRight => self.x = (self.x + 1).min(max),
            PlayerAction::CursorUp => self.y = self.y.saturating_sub(1),
            PlayerAction::CursorDown => self.y = (self.y + 1).min(max),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_clamps_to_edges() {
        let mut cursor = Cursor::new(3);
        assert!(cursor.apply(PlayerAction::CursorLeft));
        assert!(cursor.apply(PlayerAction::CursorUp));
        assert_eq!(cursor.position(), Coord::new(0, 0));

        for _ in 0..5 {
            cursor.apply(PlayerAction::CursorRight);
            cursor.apply(PlayerAction::CursorDown);
        }
        assert_eq!(cursor.position(), Coord::new(2, 2));
    }

    #[test]
    fn test_non_cursor_actions_pass_through() {
        let mut cursor = Cursor::new(4);
        assert!(!cursor.apply(PlayerAction::Select));
        assert!(!cursor.apply(PlayerAction::Replay));
        assert_eq!(cursor.position(), Coord::new(0, 0));
    }

    #[test]
    fn test_resize_pulls_cursor_inside() {
        let mut cursor = Cursor::new(8);
        cursor.move_to(Coord::new(7, 6));
        cursor.resize(4);
        assert_eq!(cursor.position(), Coord::new(3, 3));
    }
}
