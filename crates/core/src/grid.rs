//! Grid module - square matrix of tile slots
//!
//! The grid is an N×N matrix where each slot holds a [`Tile`]. Tiles are plain
//! data: the grid owns them by position and nothing else holds a reference.
//! Uses a flat vector in row-major order (`y * size + x`) for cache locality.
//! Coordinates: (x, y) where x is the column (left to right) and y the row
//! (top to bottom).

use crate::events::EventSink;
use crate::types::{Color, Coord, EngineError, EngineEvent};

/// A single tile slot.
///
/// `color` and `visible` are independent: collapsing recolors a slot to model
/// a tile falling into it, and toggles visibility separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub color: Color,
    /// False once the tile has been removed.
    pub visible: bool,
    /// Set on the generator's working copy. Frozen tiles emit no events and
    /// skip outcome evaluation when clicked.
    pub frozen: bool,
    /// Set while a solution replay runs; manual clicks are rejected.
    pub disabled: bool,
}

impl Tile {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            visible: true,
            frozen: false,
            disabled: false,
        }
    }
}

/// The puzzle grid - `size` columns x `size` rows
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    tiles: Vec<Tile>,
}

impl Grid {
    /// Build a grid, asking `fill` for the color of each `(x, y)`.
    ///
    /// Cells are filled in row-major order, which matters when `fill` draws
    /// from an RNG.
    pub fn new(size: usize, mut fill: impl FnMut(usize, usize) -> Color) -> Self {
        let mut tiles = Vec::with_capacity(size * size);
        for y in 0..size {
            for x in 0..size {
                tiles.push(Tile::new(fill(x, y)));
            }
        }
        Self { size, tiles }
    }

    /// Build a grid from a fixed-size square array (`rows[y][x]`).
    ///
    /// # Examples
    ///
    /// ```
    /// use samegame_core::Grid;
    ///
    /// let grid = Grid::from_array([[0, 1], [1, 0]]);
    /// assert_eq!(grid.size(), 2);
    /// assert_eq!(grid.at(1, 0).unwrap().color, 1);
    /// ```
    pub fn from_array<const N: usize>(rows: [[Color; N]; N]) -> Self {
        Self::new(N, |x, y| rows[y][x])
    }

    /// Build a grid from explicit rows (`rows[y][x]`), all tiles visible.
    ///
    /// Fails unless every row is as long as there are rows.
    pub fn from_rows(rows: &[Vec<Color>]) -> Result<Self, EngineError> {
        let size = rows.len();
        if size == 0 {
            return Err(EngineError::InvalidConfiguration(
                "grid must have at least one row".to_string(),
            ));
        }
        if let Some((y, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != size) {
            return Err(EngineError::InvalidConfiguration(format!(
                "row {} has {} tiles, expected {}",
                y,
                row.len(),
                size
            )));
        }
        Ok(Self::new(size, |x, y| rows[y][x]))
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline(always)]
    fn index(&self, x: usize, y: usize) -> Option<usize> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(y * self.size + x)
    }

    /// Get the tile at (x, y), failing outside the grid.
    pub fn at(&self, x: usize, y: usize) -> Result<&Tile, EngineError> {
        self.get(x, y).ok_or(EngineError::OutOfBounds {
            x,
            y,
            size: self.size,
        })
    }

    /// Get the tile at (x, y).
    /// Returns None if out of bounds
    pub fn get(&self, x: usize, y: usize) -> Option<&Tile> {
        self.index(x, y).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut Tile> {
        self.index(x, y).map(move |i| &mut self.tiles[i])
    }

    /// Color of a visible tile, None for empty slots and out of bounds.
    pub fn visible_color(&self, x: usize, y: usize) -> Option<Color> {
        self.get(x, y).filter(|t| t.visible).map(|t| t.color)
    }

    /// Recolor the slot and make it visible.
    ///
    /// Emits `TileShown` when the slot was empty and is not frozen. Showing an
    /// already visible tile only recolors it.
    pub fn show<S: EventSink>(&mut self, x: usize, y: usize, color: Color, sink: &mut S) {
        let Some(tile) = self.get_mut(x, y) else {
            return;
        };
        tile.color = color;
        if tile.visible {
            return;
        }
        tile.visible = true;
        if !tile.frozen {
            sink.emit(EngineEvent::TileShown {
                coord: Coord::new(x, y),
                color,
            });
        }
    }

    /// Make the slot empty. No-op for slots that are already empty.
    pub fn hide<S: EventSink>(&mut self, x: usize, y: usize, sink: &mut S) {
        let Some(tile) = self.get_mut(x, y) else {
            return;
        };
        if !tile.visible {
            return;
        }
        tile.visible = false;
        if !tile.frozen {
            sink.emit(EngineEvent::TileHidden {
                coord: Coord::new(x, y),
            });
        }
    }

    /// Emit `TileShown` for every visible, unfrozen tile.
    pub fn announce<S: EventSink>(&self, sink: &mut S) {
        for (coord, tile) in self.iter() {
            if tile.visible && !tile.frozen {
                sink.emit(EngineEvent::TileShown {
                    coord,
                    color: tile.color,
                });
            }
        }
    }

    /// Emit `TileHidden` for every visible, unfrozen tile without changing it.
    pub fn retract<S: EventSink>(&self, sink: &mut S) {
        for (coord, tile) in self.iter() {
            if tile.visible && !tile.frozen {
                sink.emit(EngineEvent::TileHidden { coord });
            }
        }
    }

    pub fn freeze_all(&mut self) {
        for tile in &mut self.tiles {
            tile.frozen = true;
        }
    }

    pub fn set_disabled_all(&mut self, disabled: bool) {
        for tile in &mut self.tiles {
            // Frozen tiles never take part in interaction.
            if !tile.frozen {
                tile.disabled = disabled;
            }
        }
    }

    /// Check if a column has no visible tile
    pub fn is_column_empty(&self, x: usize) -> bool {
        if x >= self.size {
            return true;
        }
        (0..self.size).all(|y| !self.tiles[y * self.size + x].visible)
    }

    pub fn visible_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.visible).count()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.iter().all(|t| !t.visible)
    }

    /// Number of distinct colors among visible tiles.
    pub fn distinct_colors(&self) -> usize {
        let mut seen = [false; Color::MAX as usize + 1];
        let mut count = 0;
        for tile in self.tiles.iter().filter(|t| t.visible) {
            let slot = &mut seen[tile.color as usize];
            if !*slot {
                *slot = true;
                count += 1;
            }
        }
        count
    }

    /// Iterate tiles with their coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Coord, &Tile)> + '_ {
        let size = self.size;
        self.tiles
            .iter()
            .enumerate()
            .map(move |(i, t)| (Coord::from_index(i, size), t))
    }

    /// Get a reference to the internal tiles, row-major
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Visible colors as rows (`rows[y][x]`), handy for assertions and display.
    pub fn to_rows(&self) -> Vec<Vec<Option<Color>>> {
        (0..self.size)
            .map(|y| {
                (0..self.size)
                    .map(|x| self.visible_color(x, y))
                    .collect()
            })
            .collect()
    }
}
