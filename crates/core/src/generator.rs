//! Puzzle generation by randomized self-play
//!
//! A candidate grid is accepted only once random play has actually emptied it,
//! so every generated puzzle ships with a recorded solution. The search is
//! generate-and-test with no backtracking:
//!
//! 1. Fill `size × size` tiles with independent random colors; reject the
//!    candidate unless every one of the `color_count` colors appears.
//! 2. Keep an unplayed copy, freeze the working copy, and play random clicks
//!    on it until it is won, or until a click or stall limit ends the attempt.
//! 3. On a win, hand back the unplayed copy and the clicks in order.
//!
//! Only wall-clock exhaustion fails the whole search.
//!
//! # Limits
//!
//! Every successful click removes at least `min_connected` tiles, so the
//! default click limit of `size² / min_connected` never cuts a winning game
//! short. The stall limit (`size²` consecutive misses by default) is what
//! abandons hopeless attempts; invisible picks count as misses, so an attempt
//! always terminates.

use std::time::{Duration, Instant};

use crate::collapse::collapse;
use crate::grid::Grid;
use crate::group::GroupFinder;
use crate::outcome::is_won;
use crate::rng::SimpleRng;
use crate::types::{Color, Coord, EngineError, RoundConfig};

/// Counters describing one `generate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GenerationStats {
    /// Candidate grids built, including rejected ones.
    pub candidates: u32,
    /// Candidates discarded for missing a color.
    pub coverage_rejects: u32,
    /// Self-play attempts that ended without a win.
    pub stalled: u32,
    pub elapsed: Duration,
}

/// An accepted puzzle: the unplayed grid and a click sequence that empties it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPuzzle {
    pub grid: Grid,
    pub solution: Vec<Coord>,
    pub stats: GenerationStats,
}

/// Result of one self-play attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Attempt {
    Won(Vec<Coord>),
    Stalled,
}

#[derive(Debug, Clone, Default)]
pub struct PuzzleGenerator {
    config: RoundConfig,
    finder: GroupFinder,
    group: Vec<Coord>,
}

impl PuzzleGenerator {
    pub fn new(config: RoundConfig) -> Self {
        Self {
            config,
            finder: GroupFinder::new(),
            group: Vec::new(),
        }
    }

    /// Search for a solvable `size × size` puzzle using `color_count` colors.
    ///
    /// # Examples
    ///
    /// ```
    /// use samegame_core::{play_solution, PuzzleGenerator, SimpleRng};
    /// use samegame_types::RoundConfig;
    ///
    /// let mut rng = SimpleRng::new(7);
    /// let puzzle = PuzzleGenerator::new(RoundConfig::default())
    ///     .generate(4, 2, &mut rng)
    ///     .unwrap();
    /// assert!(play_solution(&puzzle.grid, &puzzle.solution, 2).is_ok());
    /// ```
    pub fn generate(
        &mut self,
        size: usize,
        color_count: usize,
        rng: &mut SimpleRng,
    ) -> Result<GeneratedPuzzle, EngineError> {
        self.config.validate(size, color_count)?;

        let started = Instant::now();
        let mut stats = GenerationStats::default();

        loop {
            if started.elapsed() > self.config.timeout {
                return Err(EngineError::GenerationTimeout {
                    elapsed_ms: started.elapsed().as_millis() as u64,
                    candidates: stats.candidates,
                });
            }

            stats.candidates += 1;
            let candidate = random_grid(size, color_count, rng);
            if candidate.distinct_colors() != color_count {
                stats.coverage_rejects += 1;
                continue;
            }

            let mut working = candidate.clone();
            working.freeze_all();

            match self.self_play(&mut working, rng) {
                Attempt::Won(solution) => {
                    stats.elapsed = started.elapsed();
                    return Ok(GeneratedPuzzle {
                        grid: candidate,
                        solution,
                        stats,
                    });
                }
                Attempt::Stalled => stats.stalled += 1,
            }
        }
    }

    /// Click random cells until the grid is won or a limit is hit.
    fn self_play(&mut self, grid: &mut Grid, rng: &mut SimpleRng) -> Attempt {
        let size = grid.size();
        let cells = size * size;
        let max_clicks = self.config.max_clicks_for(size);
        let max_stalls = self.config.max_stalls_for(size);
        let min_connected = self.config.min_connected;

        let mut solution = Vec::new();
        let mut tries = 0usize;

        while solution.len() < max_clicks && tries < max_stalls {
            let target = Coord::from_index(rng.next_usize(cells), size);

            let removed = self.finder.find_into(grid, target.x, target.y, &mut self.group);
            if removed < min_connected {
                // Also covers invisible picks, which yield an empty group.
                tries += 1;
                continue;
            }

            for c in &self.group {
                grid.hide(c.x, c.y, &mut ());
            }
            collapse(grid);

            tries = 0;
            solution.push(target);

            if is_won(grid) {
                return Attempt::Won(solution);
            }
        }

        Attempt::Stalled
    }
}

fn random_grid(size: usize, color_count: usize, rng: &mut SimpleRng) -> Grid {
    Grid::new(size, |_, _| rng.next_usize(color_count) as Color)
}

/// Replay `solution` against a copy of `grid`.
///
/// Returns the emptied grid, or the index of the first click that removed
/// nothing and the grid as it stood at that point. A leftover non-empty grid
/// after the final click is reported as a failure at `solution.len()`.
pub fn play_solution(
    grid: &Grid,
    solution: &[Coord],
    min_connected: usize,
) -> Result<Grid, (usize, Grid)> {
    let mut grid = grid.clone();
    let mut finder = GroupFinder::new();
    let mut group = Vec::new();

    for (step, c) in solution.iter().enumerate() {
        if finder.find_into(&grid, c.x, c.y, &mut group) < min_connected {
            return Err((step, grid));
        }
        for g in &group {
            grid.hide(g.x, g.y, &mut ());
        }
        collapse(&mut grid);
    }

    if is_won(&grid) {
        Ok(grid)
    } else {
        Err((solution.len(), grid))
    }
}
