//! Puzzle engine - owns the round and drives the rules
//!
//! The engine holds the current grid, the initial snapshot used by
//! [`restore`](PuzzleEngine::restore), and the recorded solution. Presentation
//! code forwards coordinates to [`click`](PuzzleEngine::click) and renders the
//! [`EngineEvent`]s it drains afterwards; tiles themselves carry no behavior.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized --generate--> Ready --click--> Won | Lost
//!                               ^                  |
//!                               +-----restore------+
//! ```
//!
//! `Replaying` is entered by [`begin_replay`](PuzzleEngine::begin_replay) and
//! left by [`end_replay`](PuzzleEngine::end_replay), which restores.

use crate::collapse::collapse_with;
use crate::generator::{GenerationStats, PuzzleGenerator};
use crate::grid::Grid;
use crate::group::GroupFinder;
use crate::outcome::{evaluate, is_won, removable_groups};
use crate::replay::{Pacer, ReplayControl, ReplayFrame, ReplayReport, ReplayStep};
use crate::rng::SimpleRng;
use crate::snapshot::PuzzleSnapshot;
use crate::types::{Coord, EngineError, EngineEvent, PuzzleState, RoundConfig};

#[derive(Debug, Clone)]
struct Puzzle {
    initial: Grid,
    current: Grid,
    solution: Vec<Coord>,
    color_count: usize,
    seed: u32,
}

#[derive(Debug, Clone)]
pub struct PuzzleEngine {
    config: RoundConfig,
    rng: SimpleRng,
    puzzle: Option<Puzzle>,
    state: PuzzleState,
    moves: u32,
    /// Solution steps the player has followed so far, `None` once they strayed.
    on_path: Option<usize>,
    replay_cursor: usize,
    replay_clean: bool,
    last_stats: Option<GenerationStats>,
    events: Vec<EngineEvent>,
    finder: GroupFinder,
    group: Vec<Coord>,
}

impl PuzzleEngine {
    /// Create an engine whose RNG is seeded with `seed`.
    pub fn new(seed: u32) -> Self {
        Self::with_config(seed, RoundConfig::default())
    }

    pub fn with_config(seed: u32, config: RoundConfig) -> Self {
        Self {
            config,
            rng: SimpleRng::new(seed),
            puzzle: None,
            state: PuzzleState::Uninitialized,
            moves: 0,
            on_path: None,
            replay_cursor: 0,
            replay_clean: true,
            last_stats: None,
            events: Vec::new(),
            finder: GroupFinder::new(),
            group: Vec::new(),
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    /// Change the round parameters. Takes effect for the next click and the
    /// next generation.
    ///
    /// A minimum group size of zero is rejected, as is one larger than the
    /// installed grid; the previous config stays in place.
    pub fn set_config(&mut self, config: RoundConfig) -> Result<(), EngineError> {
        if config.min_connected == 0 {
            return Err(EngineError::InvalidConfiguration(
                "min connected must be at least 1".to_string(),
            ));
        }
        if let Some(grid) = self.current() {
            let cells = grid.size() * grid.size();
            if config.min_connected > cells {
                return Err(EngineError::InvalidConfiguration(format!(
                    "min connected {} exceeds the {} tiles of the current grid",
                    config.min_connected, cells
                )));
            }
        }
        self.config = config;
        Ok(())
    }

    pub fn state(&self) -> PuzzleState {
        self.state
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn current(&self) -> Option<&Grid> {
        self.puzzle.as_ref().map(|p| &p.current)
    }

    pub fn initial(&self) -> Option<&Grid> {
        self.puzzle.as_ref().map(|p| &p.initial)
    }

    pub fn solution(&self) -> &[Coord] {
        self.puzzle
            .as_ref()
            .map(|p| p.solution.as_slice())
            .unwrap_or(&[])
    }

    /// RNG state the current puzzle was generated from.
    pub fn puzzle_seed(&self) -> Option<u32> {
        self.puzzle.as_ref().map(|p| p.seed)
    }

    pub fn last_stats(&self) -> Option<&GenerationStats> {
        self.last_stats.as_ref()
    }

    /// Take all notifications queued since the last call.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Generate a new solvable puzzle.
    ///
    /// The search is synchronous CPU work bounded by the round timeout; the
    /// async boundary lets callers schedule it next to their UI work. On
    /// failure the previous puzzle, if any, stays in place.
    pub async fn generate(
        &mut self,
        size: usize,
        color_count: usize,
    ) -> Result<GenerationStats, EngineError> {
        self.generate_now(size, color_count)
    }

    /// Blocking form of [`generate`](Self::generate).
    pub fn generate_now(
        &mut self,
        size: usize,
        color_count: usize,
    ) -> Result<GenerationStats, EngineError> {
        let seed = self.rng.state();
        let mut generator = PuzzleGenerator::new(self.config);
        let puzzle = generator.generate(size, color_count, &mut self.rng)?;
        let stats = puzzle.stats;

        self.install(Puzzle {
            current: puzzle.grid.clone(),
            initial: puzzle.grid,
            solution: puzzle.solution,
            color_count,
            seed,
        });
        self.last_stats = Some(stats);
        Ok(stats)
    }

    /// Install an externally built puzzle.
    ///
    /// The solution may be empty; an unsolvable solution is not detected
    /// here (see [`play_solution`](crate::play_solution)).
    pub fn load(&mut self, grid: Grid, solution: Vec<Coord>) {
        let color_count = grid.distinct_colors();
        self.install(Puzzle {
            current: grid.clone(),
            initial: grid,
            solution,
            color_count,
            seed: 0,
        });
        self.last_stats = None;
    }

    fn install(&mut self, puzzle: Puzzle) {
        if let Some(old) = &self.puzzle {
            old.current.retract(&mut self.events);
        }
        puzzle.current.announce(&mut self.events);
        self.puzzle = Some(puzzle);
        self.reset_round();
    }

    fn reset_round(&mut self) {
        self.state = PuzzleState::Ready;
        self.moves = 0;
        self.on_path = Some(0);
        self.replay_cursor = 0;
        self.replay_clean = true;
    }

    /// Click the tile at (x, y).
    ///
    /// Returns false, changing nothing and emitting nothing, when the click
    /// misses: out of bounds, disabled tile, group under the minimum size, or
    /// the round is not accepting clicks. `slow` only asks the presentation to
    /// linger on the group (a `GroupHighlighted` event).
    pub fn click(&mut self, x: usize, y: usize, slow: bool) -> bool {
        if !self.state.accepts_clicks() {
            return false;
        }
        let disabled = match self.current().and_then(|g| g.get(x, y)) {
            Some(tile) => tile.disabled,
            None => return false,
        };
        if disabled {
            return false;
        }

        let moved = self.apply_click(x, y, slow);
        if moved {
            self.track_path(Coord::new(x, y));
        }
        moved
    }

    fn apply_click(&mut self, x: usize, y: usize, slow: bool) -> bool {
        let Some(puzzle) = self.puzzle.as_mut() else {
            return false;
        };
        let Some(frozen) = puzzle.current.get(x, y).map(|t| t.frozen) else {
            return false;
        };

        let removed = self
            .finder
            .find_into(&puzzle.current, x, y, &mut self.group);
        if removed == 0 || removed < self.config.min_connected {
            return false;
        }

        if slow && !frozen {
            self.events.push(EngineEvent::GroupHighlighted {
                coords: self.group.clone(),
            });
        }
        for c in &self.group {
            puzzle.current.hide(c.x, c.y, &mut self.events);
        }
        collapse_with(&mut puzzle.current, &mut self.events);
        self.moves += 1;

        if !frozen {
            if let Some(outcome) = evaluate(&puzzle.current, self.config.min_connected) {
                self.events.push(EngineEvent::OutcomeReached { outcome });
                if self.state != PuzzleState::Replaying {
                    self.state = outcome.into();
                }
            }
        }
        true
    }

    fn track_path(&mut self, coord: Coord) {
        let Some(step) = self.on_path else {
            return;
        };
        self.on_path = match self.solution().get(step) {
            Some(&expected) if expected == coord => Some(step + 1),
            _ => None,
        };
    }

    /// Put the initial grid back. No-op before the first puzzle.
    pub fn restore(&mut self) {
        let Some(puzzle) = self.puzzle.as_mut() else {
            return;
        };
        puzzle.current.retract(&mut self.events);
        puzzle.current = puzzle.initial.clone();
        puzzle.current.announce(&mut self.events);
        self.reset_round();
    }

    /// Group that would be removed by clicking (x, y) right now, if clickable.
    pub fn group_at(&mut self, x: usize, y: usize) -> Option<Vec<Coord>> {
        let grid = &self.puzzle.as_ref()?.current;
        let n = self.finder.find_into(grid, x, y, &mut self.group);
        (n > 0 && n >= self.config.min_connected).then(|| self.group.clone())
    }

    /// Suggest the next move.
    ///
    /// While the player has only played recorded solution clicks, this is the
    /// next one; afterwards it is the largest removable group.
    pub fn hint(&mut self) -> Option<Vec<Coord>> {
        if !self.state.accepts_clicks() {
            return None;
        }
        if let Some(step) = self.on_path {
            if let Some(&next) = self.solution().get(step) {
                if let Some(group) = self.group_at(next.x, next.y) {
                    return Some(group);
                }
            }
        }
        let grid = self.current()?;
        removable_groups(grid, self.config.min_connected)
            .into_iter()
            .max_by_key(|g| g.len())
    }

    /// Restore, then disable every tile for a step-by-step replay.
    ///
    /// Returns the number of recorded clicks.
    pub fn begin_replay(&mut self) -> Result<usize, EngineError> {
        if self.puzzle.is_none() {
            return Err(EngineError::NoPuzzle);
        }
        self.restore();
        let total = self.solution().len();
        if let Some(puzzle) = self.puzzle.as_mut() {
            puzzle.current.set_disabled_all(true);
        }
        self.state = PuzzleState::Replaying;
        Ok(total)
    }

    /// Next recorded click, without playing it.
    pub fn peek_replay(&self) -> Option<Coord> {
        if self.state != PuzzleState::Replaying {
            return None;
        }
        self.solution().get(self.replay_cursor).copied()
    }

    /// Play the next recorded click as a slow click.
    pub fn replay_step(&mut self) -> Option<ReplayStep> {
        let coord = self.peek_replay()?;
        let index = self.replay_cursor;
        let moved = self.apply_click(coord.x, coord.y, true);
        self.replay_clean &= moved;
        self.replay_cursor += 1;
        Some(ReplayStep {
            index,
            coord,
            moved,
        })
    }

    /// Leave replay mode, restoring the initial grid.
    pub fn end_replay(&mut self) {
        if self.state == PuzzleState::Replaying {
            self.restore();
        }
    }

    /// Replay the recorded solution, pausing through `pacer` before every
    /// click and once after the last, then restore.
    pub async fn replay_solution<P: Pacer>(
        &mut self,
        pacer: &mut P,
    ) -> Result<ReplayReport, EngineError> {
        let total = self.begin_replay()?;
        let mut steps = 0;
        let mut aborted = false;

        loop {
            let next = self.peek_replay();
            let highlight = match next {
                Some(c) => self.group_at(c.x, c.y).unwrap_or_default(),
                None => Vec::new(),
            };
            let frame = ReplayFrame {
                step: steps,
                total,
                next,
                highlight: &highlight,
                engine: self,
            };
            if pacer.pause(frame).await == ReplayControl::Abort {
                aborted = true;
                break;
            }
            if self.replay_step().is_none() {
                break;
            }
            steps += 1;
        }

        let solved = !aborted
            && self.replay_clean
            && self.current().map(is_won).unwrap_or(false);
        self.end_replay();
        Ok(ReplayReport {
            steps,
            total,
            solved,
            aborted,
        })
    }

    pub fn snapshot(&self) -> PuzzleSnapshot {
        let mut snap = PuzzleSnapshot::default();
        self.snapshot_into(&mut snap);
        snap
    }

    /// Fill an existing snapshot, reusing its cell buffer.
    pub fn snapshot_into(&self, out: &mut PuzzleSnapshot) {
        out.clear();
        out.state = self.state;
        out.min_connected = self.config.min_connected;
        out.moves = self.moves;
        let Some(puzzle) = &self.puzzle else {
            return;
        };
        let grid = &puzzle.current;
        out.size = grid.size();
        out.cells
            .extend(grid.tiles().iter().map(|t| t.visible.then_some(t.color)));
        out.seed = puzzle.seed;
        out.color_count = puzzle.color_count;
        out.remaining = grid.visible_count();
        out.solution_len = puzzle.solution.len();
        out.disabled = grid.tiles().iter().any(|t| t.disabled);
    }
}

impl Default for PuzzleEngine {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::Unpaced;
    use crate::types::Outcome;

    /// Counts pauses and aborts once `abort_after` pauses have been seen.
    #[derive(Default)]
    struct CountingPacer {
        pauses: usize,
        finals: usize,
        abort_after: Option<usize>,
    }

    impl Pacer for CountingPacer {
        async fn pause(&mut self, frame: ReplayFrame<'_>) -> ReplayControl {
            self.pauses += 1;
            if frame.is_final() {
                self.finals += 1;
            }
            match self.abort_after {
                Some(n) if self.pauses >= n => ReplayControl::Abort,
                _ => ReplayControl::Continue,
            }
        }
    }

    fn loaded(grid: Grid, solution: Vec<Coord>) -> PuzzleEngine {
        let mut engine = PuzzleEngine::new(1);
        engine.load(grid, solution);
        engine.drain_events();
        engine
    }

    #[test]
    fn test_new_engine_is_uninitialized() {
        let mut engine = PuzzleEngine::new(3);
        assert_eq!(engine.state(), PuzzleState::Uninitialized);
        assert!(!engine.click(0, 0, false));
        engine.restore();
        assert!(engine.drain_events().is_empty());
        assert_eq!(engine.begin_replay(), Err(EngineError::NoPuzzle));
    }

    #[test]
    fn test_miss_changes_nothing() {
        let mut engine = loaded(Grid::from_array([[0, 1], [1, 0]]), vec![]);
        let before = engine.current().cloned();
        assert!(!engine.click(0, 0, true));
        assert!(!engine.click(5, 5, false));
        assert_eq!(engine.current().cloned(), before);
        assert!(engine.drain_events().is_empty());
        assert_eq!(engine.moves(), 0);
    }

    #[test]
    fn test_click_emits_hidden_then_outcome() {
        let mut engine = loaded(Grid::from_array([[2, 2], [2, 2]]), vec![]);
        assert!(engine.click(1, 1, false));
        let events = engine.drain_events();
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, EngineEvent::TileHidden { .. }))
                .count(),
            4
        );
        assert_eq!(
            events.last(),
            Some(&EngineEvent::OutcomeReached {
                outcome: Outcome::Won
            })
        );
        assert_eq!(engine.state(), PuzzleState::Won);
        assert!(!engine.click(0, 0, false), "round is over");
    }

    #[test]
    fn test_slow_click_highlights_group_first() {
        let mut engine = loaded(Grid::from_array([[1, 1, 0], [0, 2, 0], [0, 2, 1]]), vec![]);
        assert!(engine.click(0, 0, true));
        let events = engine.drain_events();
        match &events[0] {
            EngineEvent::GroupHighlighted { coords } => assert_eq!(coords.len(), 2),
            other => panic!("expected highlight, got {:?}", other),
        }
    }

    #[test]
    fn test_loss_is_reported_and_restore_recovers() {
        let mut engine = loaded(Grid::from_array([[0, 1, 1], [1, 0, 2], [2, 1, 0]]), vec![]);
        assert!(engine.click(1, 0, false));
        assert_eq!(engine.state(), PuzzleState::Lost);
        assert!(engine
            .drain_events()
            .contains(&EngineEvent::OutcomeReached {
                outcome: Outcome::Lost
            }));

        engine.restore();
        assert_eq!(engine.state(), PuzzleState::Ready);
        assert_eq!(engine.current(), engine.initial());
        assert_eq!(engine.moves(), 0);
    }

    #[test]
    fn test_frozen_click_skips_outcome() {
        let mut grid = Grid::from_array([[4, 4], [4, 4]]);
        grid.freeze_all();
        let mut engine = loaded(grid, vec![]);
        assert!(engine.click(0, 0, true));
        assert!(engine.drain_events().is_empty());
        assert_eq!(engine.state(), PuzzleState::Ready);
        assert!(engine.current().unwrap().is_empty());
    }

    #[test]
    fn test_disabled_tiles_reject_manual_clicks() {
        let mut engine = loaded(Grid::from_array([[0, 0], [1, 1]]), vec![Coord::new(0, 0)]);
        engine.begin_replay().unwrap();
        assert!(!engine.click(0, 0, false));
        assert!(engine.snapshot().disabled);
        engine.end_replay();
        assert!(!engine.snapshot().disabled);
        assert!(engine.click(0, 0, false));
    }

    #[test]
    fn test_replay_steps_through_solution() {
        let solution = vec![Coord::new(0, 0), Coord::new(0, 1)];
        let mut engine = loaded(Grid::from_array([[0, 0], [1, 1]]), solution);
        assert_eq!(engine.begin_replay(), Ok(2));

        let first = engine.replay_step().unwrap();
        assert!(first.moved);
        let second = engine.replay_step().unwrap();
        assert_eq!(second.index, 1);
        assert!(engine.current().unwrap().is_empty());
        assert!(engine.replay_step().is_none());
        assert_eq!(engine.state(), PuzzleState::Replaying);

        engine.end_replay();
        assert_eq!(engine.state(), PuzzleState::Ready);
        assert_eq!(engine.current().unwrap().visible_count(), 4);
    }

    #[test]
    fn test_replay_solution_restores_afterwards() {
        let solution = vec![Coord::new(0, 0), Coord::new(0, 1)];
        let mut engine = loaded(Grid::from_array([[0, 0], [1, 1]]), solution);

        let report = tokio_test::block_on(engine.replay_solution(&mut Unpaced)).unwrap();
        assert_eq!(report.steps, 2);
        assert!(report.solved);
        assert!(!report.aborted);
        assert_eq!(engine.state(), PuzzleState::Ready);
        assert_eq!(engine.current(), engine.initial());
    }

    #[test]
    fn test_replay_pauses_before_each_click_and_once_after() {
        let solution = vec![Coord::new(0, 0), Coord::new(0, 1)];
        let mut engine = loaded(Grid::from_array([[0, 0], [1, 1]]), solution);
        let mut pacer = CountingPacer::default();

        let report = tokio_test::block_on(engine.replay_solution(&mut pacer)).unwrap();
        assert!(report.solved);
        assert_eq!(pacer.pauses, report.total + 1);
        assert_eq!(pacer.finals, 1);
    }

    #[test]
    fn test_aborted_replay_restores_and_reenables() {
        let solution = vec![Coord::new(0, 0), Coord::new(0, 1)];
        let mut engine = loaded(Grid::from_array([[0, 0], [1, 1]]), solution);
        let mut pacer = CountingPacer {
            abort_after: Some(2),
            ..Default::default()
        };

        let report = tokio_test::block_on(engine.replay_solution(&mut pacer)).unwrap();
        assert_eq!(
            report,
            ReplayReport {
                steps: 1,
                total: 2,
                solved: false,
                aborted: true,
            }
        );
        assert_eq!(pacer.finals, 0);
        assert_eq!(engine.state(), PuzzleState::Ready);
        assert_eq!(engine.current(), engine.initial());
        assert!(!engine.snapshot().disabled);
        assert!(engine.click(0, 0, false));
    }

    #[test]
    fn test_invalid_config_is_rejected_and_empty_slot_is_a_miss() {
        let mut engine = loaded(Grid::from_array([[0, 0, 1], [2, 1, 1], [2, 3, 3]]), vec![]);
        assert!(engine.click(0, 0, false));
        assert_eq!(engine.moves(), 1);
        let before = *engine.config();

        let zero = RoundConfig::default().with_min_connected(0);
        assert!(matches!(
            engine.set_config(zero),
            Err(EngineError::InvalidConfiguration(_))
        ));
        let oversized = RoundConfig::default().with_min_connected(10);
        assert!(matches!(
            engine.set_config(oversized),
            Err(EngineError::InvalidConfiguration(_))
        ));
        assert_eq!(engine.config(), &before);

        // (0, 0) is empty now; even singletons allowed, it stays a miss.
        engine
            .set_config(RoundConfig::default().with_min_connected(1))
            .unwrap();
        engine.drain_events();
        assert!(!engine.click(0, 0, false));
        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.state(), PuzzleState::Ready);
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn test_empty_slot_is_a_miss_under_zero_minimum() {
        let config = RoundConfig::default().with_min_connected(0);
        let mut engine = PuzzleEngine::with_config(1, config);
        engine.load(Grid::from_array([[0, 0, 1], [2, 1, 1], [2, 3, 3]]), vec![]);
        assert!(engine.click(0, 0, false));
        assert!(!engine.click(0, 0, false));
        assert_eq!(engine.moves(), 1);
        assert_eq!(engine.group_at(0, 0), None);
    }

    #[test]
    fn test_hint_follows_solution_then_falls_back() {
        let grid = Grid::from_array([[0, 0, 1], [2, 2, 1], [2, 3, 3]]);
        let solution = vec![Coord::new(1, 2)];
        let mut engine = loaded(grid, solution);

        let hint = engine.hint().unwrap();
        assert!(hint.contains(&Coord::new(1, 2)));

        // Playing off-path switches to the largest group.
        assert!(engine.click(0, 0, false));
        let hint = engine.hint().unwrap();
        assert_eq!(hint.len(), 3);
    }

    #[test]
    fn test_generate_installs_ready_puzzle() {
        let mut engine = PuzzleEngine::new(42);
        let stats = tokio_test::block_on(engine.generate(4, 2)).unwrap();
        assert!(stats.candidates >= 1);
        assert_eq!(engine.last_stats(), Some(&stats));
        assert_eq!(engine.state(), PuzzleState::Ready);
        assert!(!engine.solution().is_empty());

        let shown = engine
            .drain_events()
            .iter()
            .filter(|e| matches!(e, EngineEvent::TileShown { .. }))
            .count();
        assert_eq!(shown, 16);
    }

    #[test]
    fn test_failed_generation_keeps_previous_puzzle() {
        let mut engine = loaded(Grid::from_array([[0, 0], [1, 1]]), vec![]);
        let err = engine.generate_now(0, 2).unwrap_err();
        assert!(matches!(err, EngineError::InvalidConfiguration(_)));
        assert_eq!(engine.state(), PuzzleState::Ready);
        assert_eq!(engine.current().unwrap().size(), 2);
        assert_eq!(engine.last_stats(), None, "loaded puzzles carry no stats");
    }

    #[test]
    fn test_snapshot_reflects_grid() {
        let mut engine = loaded(Grid::from_array([[0, 0], [1, 2]]), vec![]);
        engine.click(0, 0, false);
        let snap = engine.snapshot();
        assert_eq!(snap.size, 2);
        assert_eq!(snap.moves, 1);
        assert_eq!(snap.remaining, 2);
        assert_eq!(snap.cell(0, 0), None);
        assert_eq!(snap.cell(0, 1), Some(1));
        assert_eq!(snap.cell(1, 1), Some(2));
    }
}
