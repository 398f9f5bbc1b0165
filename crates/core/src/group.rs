//! Group finding - connected same-color components
//!
//! A group is the maximal set of visible tiles sharing the seed's color that
//! can be reached through 4-directional adjacency. The search is an explicit
//! depth-first work-list over a visited matrix, never recursion, so large
//! grids cannot exhaust the call stack.
//!
//! Neighbors are pushed in the order right, left, down, up and popped from
//! the top of the stack, which makes the returned visiting order stable for a
//! given grid.

use arrayvec::ArrayVec;

use crate::grid::Grid;
use crate::types::Coord;

/// Reusable flood-fill scratch space.
///
/// Holding one finder across many searches (as the generator and the outcome
/// evaluator do) avoids reallocating the visited matrix for every click.
#[derive(Debug, Clone, Default)]
pub struct GroupFinder {
    visited: Vec<bool>,
    stack: Vec<Coord>,
}

impl GroupFinder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the group containing (x, y).
    ///
    /// Returns an empty vector when the seed is out of bounds or invisible.
    pub fn find(&mut self, grid: &Grid, x: usize, y: usize) -> Vec<Coord> {
        let mut group = Vec::new();
        self.find_into(grid, x, y, &mut group);
        group
    }

    /// Like [`find`](Self::find) but appends into a caller-owned buffer
    /// (cleared first). Returns the group size.
    pub fn find_into(&mut self, grid: &Grid, x: usize, y: usize, out: &mut Vec<Coord>) -> usize {
        out.clear();
        let Some(color) = grid.visible_color(x, y) else {
            return 0;
        };

        let size = grid.size();
        self.visited.clear();
        self.visited.resize(size * size, false);
        self.stack.clear();

        let seed = Coord::new(x, y);
        self.visited[seed.index(size)] = true;
        self.stack.push(seed);

        while let Some(c) = self.stack.pop() {
            out.push(c);
            for n in neighbors(c, size).into_iter().rev() {
                let idx = n.index(size);
                if self.visited[idx] {
                    continue;
                }
                if grid.visible_color(n.x, n.y) == Some(color) {
                    self.visited[idx] = true;
                    self.stack.push(n);
                }
            }
        }

        out.len()
    }

    /// Size of the group at (x, y).
    pub fn group_len(&mut self, grid: &Grid, x: usize, y: usize) -> usize {
        let mut out = Vec::new();
        self.find_into(grid, x, y, &mut out)
    }
}

/// Find the group containing (x, y) with a one-off finder.
///
/// # Examples
///
/// ```
/// use samegame_core::{find_group, Grid};
/// use samegame_types::Coord;
///
/// let grid = Grid::from_array([[1, 1], [0, 1]]);
/// let mut group = find_group(&grid, 0, 0);
/// group.sort();
/// assert_eq!(group, vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(1, 1)]);
/// ```
pub fn find_group(grid: &Grid, x: usize, y: usize) -> Vec<Coord> {
    GroupFinder::new().find(grid, x, y)
}

/// In-bounds 4-neighbors in search priority order: right, left, down, up.
#[inline]
pub(crate) fn neighbors(c: Coord, size: usize) -> ArrayVec<Coord, 4> {
    let mut out = ArrayVec::new();
    if c.x + 1 < size {
        out.push(Coord::new(c.x + 1, c.y));
    }
    if c.x > 0 {
        out.push(Coord::new(c.x - 1, c.y));
    }
    if c.y + 1 < size {
        out.push(Coord::new(c.x, c.y + 1));
    }
    if c.y > 0 {
        out.push(Coord::new(c.x, c.y - 1));
    }
    out
}
