//! Outcome evaluation - won, lost, or still playable
//!
//! Won is always checked before Lost: an empty grid has no removable group,
//! but it is a win, never a loss.

use crate::grid::Grid;
use crate::group::GroupFinder;
use crate::types::{Coord, Outcome};

/// True iff every tile is invisible.
pub fn is_won(grid: &Grid) -> bool {
    grid.is_empty()
}

/// True iff tiles remain and no group reaches `min_connected`.
///
/// One visited matrix is shared across all roots, so each color component is
/// sized exactly once.
pub fn is_lost(grid: &Grid, min_connected: usize) -> bool {
    !is_won(grid) && !has_move(grid, min_connected)
}

/// Evaluate the grid, Won first.
///
/// # Examples
///
/// ```
/// use samegame_core::{evaluate, Grid};
/// use samegame_types::Outcome;
///
/// let stuck = Grid::from_array([[0, 1], [1, 0]]);
/// assert_eq!(evaluate(&stuck, 2), Some(Outcome::Lost));
///
/// let open = Grid::from_array([[0, 0], [1, 0]]);
/// assert_eq!(evaluate(&open, 2), None);
/// ```
pub fn evaluate(grid: &Grid, min_connected: usize) -> Option<Outcome> {
    if is_won(grid) {
        Some(Outcome::Won)
    } else if is_lost(grid, min_connected) {
        Some(Outcome::Lost)
    } else {
        None
    }
}

/// Whether any group of at least `min_connected` tiles exists.
pub fn has_move(grid: &Grid, min_connected: usize) -> bool {
    let mut found = false;
    for_each_component(grid, |group| {
        if group.len() >= min_connected {
            found = true;
        }
        !found
    });
    found
}

/// Every group that could be clicked right now, in row-major order of the
/// group's first tile.
pub fn removable_groups(grid: &Grid, min_connected: usize) -> Vec<Vec<Coord>> {
    let mut groups = Vec::new();
    for_each_component(grid, |group| {
        if group.len() >= min_connected {
            groups.push(group.to_vec());
        }
        true
    });
    groups
}

/// Visit each visible same-color component once. `f` returns false to stop.
fn for_each_component(grid: &Grid, mut f: impl FnMut(&[Coord]) -> bool) {
    let size = grid.size();
    let mut finder = GroupFinder::new();
    let mut absorbed = vec![false; size * size];
    let mut group = Vec::new();

    for (coord, tile) in grid.iter() {
        let idx = coord.index(size);
        if absorbed[idx] || !tile.visible {
            continue;
        }
        finder.find_into(grid, coord.x, coord.y, &mut group);
        for c in &group {
            absorbed[c.index(size)] = true;
        }
        if !f(&group) {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emptied(mut grid: Grid) -> Grid {
        let size = grid.size();
        for y in 0..size {
            for x in 0..size {
                grid.hide(x, y, &mut ());
            }
        }
        grid
    }

    #[test]
    fn test_empty_grid_is_won_not_lost() {
        let grid = emptied(Grid::new(4, |_, _| 0));
        assert!(is_won(&grid));
        assert!(!is_lost(&grid, 2));
        assert_eq!(evaluate(&grid, 2), Some(Outcome::Won));
    }

    #[test]
    fn test_checkerboard_of_distinct_colors_is_lost() {
        let grid = Grid::new(3, |x, y| (y * 3 + x) as u8);
        assert!(is_lost(&grid, 2));
        assert!(!is_won(&grid));
    }

    #[test]
    fn test_single_pair_keeps_game_alive() {
        let mut grid = Grid::from_array([[0, 1, 2], [3, 4, 5], [6, 7, 7]]);
        assert!(!is_lost(&grid, 2));
        assert!(is_lost(&grid, 3));
        grid.hide(2, 2, &mut ());
        assert!(is_lost(&grid, 2));
    }

    #[test]
    fn test_min_connected_one_never_loses_with_tiles_left() {
        let grid = Grid::new(3, |x, y| (y * 3 + x) as u8);
        assert!(!is_lost(&grid, 1));
    }

    #[test]
    fn test_removable_groups_lists_each_component_once() {
        let grid = Grid::from_array([[0, 0, 1], [2, 1, 1], [2, 3, 4]]);
        let groups = removable_groups(&grid, 2);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 3);
        assert_eq!(groups[2].len(), 2);
        assert_eq!(groups[1][0], Coord::new(2, 0));
    }

    #[test]
    fn test_won_and_lost_are_exclusive() {
        let grids = [
            emptied(Grid::new(2, |_, _| 0)),
            Grid::new(2, |_, _| 0),
            Grid::from_array([[0, 1], [1, 0]]),
        ];
        for grid in &grids {
            for min in 1..=4 {
                assert!(!(is_won(grid) && is_lost(grid, min)));
            }
        }
    }
}
