//! Collapse - gravity and column compaction after a removal
//!
//! Two passes, always in this order:
//!
//! 1. **Gravity**: within each column, visible tiles fall toward row
//!    `size - 1`, closing the gaps below them.
//! 2. **Column collapse**: every entirely empty column is deleted and the
//!    columns to its right slide left to close the gap.
//!
//! Gravity runs first so "entirely empty" is judged after tiles have settled.
//! Tiles move by recoloring the destination slot and toggling visibility, so a
//! collapsed grid is fully described by its `(color, visible)` pairs.

use crate::events::EventSink;
use crate::grid::Grid;

/// Apply gravity then column collapse, discarding events.
///
/// # Examples
///
/// ```
/// use samegame_core::{collapse, Grid};
///
/// let mut grid = Grid::from_array([[1, 2], [0, 3]]);
/// grid.hide(0, 1, &mut ());
/// grid.hide(0, 0, &mut ());
/// collapse(&mut grid);
/// assert_eq!(grid.to_rows(), vec![vec![Some(2), None], vec![Some(3), None]]);
/// ```
pub fn collapse(grid: &mut Grid) {
    collapse_with(grid, &mut ());
}

/// Apply gravity then column collapse, reporting tile moves to `sink`.
pub fn collapse_with<S: EventSink>(grid: &mut Grid, sink: &mut S) {
    gravity(grid, sink);
    collapse_columns(grid, sink);
}

/// Vertical compaction.
///
/// Each column is scanned bottom to top with a running count of empty slots
/// seen so far; a visible tile above `count` empty slots moves down by
/// `count`.
pub fn gravity<S: EventSink>(grid: &mut Grid, sink: &mut S) {
    let size = grid.size();
    for x in 0..size {
        let mut count = 0usize;
        for y in (0..size).rev() {
            let Some(color) = grid.visible_color(x, y) else {
                count += 1;
                continue;
            };
            if count > 0 {
                grid.hide(x, y, sink);
                grid.show(x, y + count, color, sink);
            }
        }
    }
}

/// Horizontal compaction.
///
/// Columns are scanned left to right. While column `x` is empty and a visible
/// tile remains somewhere to its right, every row shifts columns `x + 1..` one
/// step left. Re-checking `x` after each shift closes runs of adjacent empty
/// columns in a single scan.
pub fn collapse_columns<S: EventSink>(grid: &mut Grid, sink: &mut S) {
    let size = grid.size();
    for x in 0..size {
        while grid.is_column_empty(x) && ((x + 1)..size).any(|xx| !grid.is_column_empty(xx)) {
            shift_left_from(grid, x, sink);
        }
    }
}

/// Slide columns `x + 1..size` into `x..size - 1`. Column `x` must be empty.
fn shift_left_from<S: EventSink>(grid: &mut Grid, x: usize, sink: &mut S) {
    let size = grid.size();
    for y in 0..size {
        for xx in x..size - 1 {
            // `xx` is empty here: either column `x` itself, or a slot that
            // was just moved one step left.
            if let Some(color) = grid.visible_color(xx + 1, y) {
                grid.hide(xx + 1, y, sink);
                grid.show(xx, y, color, sink);
            }
        }
    }
}
