//! Integration tests for the puzzle engine lifecycle

use samegame::core::{
    evaluate, find_group, is_lost, is_won, Grid, PuzzleEngine, Unpaced,
};
use samegame::types::{Coord, EngineError, EngineEvent, Outcome, PuzzleState, RoundConfig};

#[test]
fn test_three_by_three_scenario() {
    let mut engine = PuzzleEngine::new(1);
    engine.load(Grid::from_array([[0, 0, 1], [0, 1, 1], [1, 1, 0]]), vec![]);
    engine.drain_events();

    let mut group = find_group(engine.current().unwrap(), 0, 0);
    group.sort();
    assert_eq!(
        group,
        vec![Coord::new(0, 0), Coord::new(0, 1), Coord::new(1, 0)]
    );

    assert!(engine.click(0, 0, false));
    let grid = engine.current().unwrap();
    assert!(!is_won(grid));
    assert!(!is_lost(grid, 2));
    assert_eq!(engine.state(), PuzzleState::Ready);
    assert_eq!(grid.visible_count(), 6);

    let hidden = engine
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, EngineEvent::TileHidden { .. }))
        .count();
    assert_eq!(hidden, 3, "nothing moved, only the group disappeared");
}

#[test]
fn test_empty_grid_is_won_not_lost() {
    let mut grid = Grid::from_array([[3, 3], [3, 3]]);
    for y in 0..2 {
        for x in 0..2 {
            grid.hide(x, y, &mut ());
        }
    }
    assert!(is_won(&grid));
    assert!(!is_lost(&grid, 2));
    assert_eq!(evaluate(&grid, 2), Some(Outcome::Won));
}

#[test]
fn test_checkerboard_is_lost_not_won() {
    let grid = Grid::new(4, |x, y| ((x + y) % 2) as u8);
    assert!(!is_won(&grid));
    assert!(is_lost(&grid, 2));
    assert_eq!(evaluate(&grid, 2), Some(Outcome::Lost));
    assert_eq!(evaluate(&grid, 1), None, "singletons are removable at min 1");
}

#[test]
fn test_group_size_extremes() {
    let uniform = Grid::new(5, |_, _| 2);
    assert_eq!(find_group(&uniform, 3, 1).len(), 25);

    let distinct = Grid::new(3, |x, y| (y * 3 + x) as u8);
    for y in 0..3 {
        for x in 0..3 {
            assert_eq!(find_group(&distinct, x, y), vec![Coord::new(x, y)]);
        }
    }
}

#[test]
fn test_clicks_after_outcome_need_restore() {
    let mut engine = PuzzleEngine::new(1);
    engine.load(Grid::from_array([[0, 0], [0, 0]]), vec![Coord::new(0, 0)]);
    assert!(engine.click(0, 0, false));
    assert_eq!(engine.state(), PuzzleState::Won);
    assert!(!engine.click(0, 0, false));

    engine.restore();
    assert_eq!(engine.state(), PuzzleState::Ready);
    assert!(engine.click(1, 1, false));
}

#[test]
fn test_restore_reports_display_changes() {
    let mut engine = PuzzleEngine::new(1);
    engine.load(Grid::from_array([[0, 0, 1], [2, 2, 1], [0, 1, 1]]), vec![]);
    engine.drain_events();

    assert!(engine.click(2, 2, false));
    engine.drain_events();
    let remaining = engine.current().unwrap().visible_count();

    engine.restore();
    let events = engine.drain_events();
    let hidden = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::TileHidden { .. }))
        .count();
    let shown = events
        .iter()
        .filter(|e| matches!(e, EngineEvent::TileShown { .. }))
        .count();
    assert_eq!(hidden, remaining);
    assert_eq!(shown, 9);
}

#[tokio::test]
async fn test_generate_then_replay_restores_enabled_tiles() {
    let mut engine = PuzzleEngine::with_config(
        2024,
        RoundConfig::default().with_timeout(std::time::Duration::from_secs(10)),
    );
    engine.generate(6, 3).await.unwrap();
    let initial = engine.initial().cloned().unwrap();

    let report = engine.replay_solution(&mut Unpaced).await.unwrap();
    assert!(report.solved);
    assert_eq!(report.steps, engine.solution().len());

    assert_eq!(engine.state(), PuzzleState::Ready);
    let current = engine.current().unwrap();
    assert_eq!(current, &initial);
    assert!(current.tiles().iter().all(|t| !t.disabled && t.visible));
}

#[tokio::test]
async fn test_replay_emits_highlight_for_every_step() {
    let mut engine = PuzzleEngine::new(7);
    engine.generate(5, 2).await.unwrap();
    engine.drain_events();

    engine.replay_solution(&mut Unpaced).await.unwrap();
    let highlights = engine
        .drain_events()
        .iter()
        .filter(|e| matches!(e, EngineEvent::GroupHighlighted { .. }))
        .count();
    assert_eq!(highlights, engine.solution().len());
}

#[test]
fn test_same_seed_same_engine_puzzle() {
    let mut a = PuzzleEngine::new(31337);
    let mut b = PuzzleEngine::new(31337);
    tokio_test::block_on(a.generate(7, 4)).unwrap();
    tokio_test::block_on(b.generate(7, 4)).unwrap();
    assert_eq!(a.initial(), b.initial());
    assert_eq!(a.solution(), b.solution());
    assert_eq!(a.puzzle_seed(), b.puzzle_seed());
}

#[test]
fn test_replay_without_puzzle_is_an_error() {
    let mut engine = PuzzleEngine::new(1);
    let result = tokio_test::block_on(engine.replay_solution(&mut Unpaced));
    assert_eq!(result, Err(EngineError::NoPuzzle));
}

#[test]
fn test_out_of_bounds_lookup_is_reported() {
    let grid = Grid::from_array([[0, 1], [1, 0]]);
    assert_eq!(
        grid.at(2, 0),
        Err(EngineError::OutOfBounds { x: 2, y: 0, size: 2 })
    );
}
