//! Solution replay pacing
//!
//! The engine never sleeps. Between replayed clicks it hands a [`ReplayFrame`]
//! to a caller-supplied [`Pacer`] and awaits it; a terminal front end waits a
//! second and redraws, a test returns immediately.

use std::future::{self, Future};

use crate::engine::PuzzleEngine;
use crate::types::Coord;

/// What the replay loop should do after a pause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayControl {
    Continue,
    /// Stop early. The engine still restores the initial grid.
    Abort,
}

/// Engine view handed to the pacer before each replayed click and once more
/// after the last one.
#[derive(Debug, Clone, Copy)]
pub struct ReplayFrame<'a> {
    /// Number of clicks already replayed.
    pub step: usize,
    pub total: usize,
    /// The click about to be played, `None` on the final frame.
    pub next: Option<Coord>,
    /// Tiles the next click removes.
    pub highlight: &'a [Coord],
    pub engine: &'a PuzzleEngine,
}

impl ReplayFrame<'_> {
    pub fn is_final(&self) -> bool {
        self.next.is_none()
    }
}

pub trait Pacer {
    fn pause(&mut self, frame: ReplayFrame<'_>) -> impl Future<Output = ReplayControl>;
}

/// Pacer that never waits, for headless runs and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn pause(&mut self, _frame: ReplayFrame<'_>) -> impl Future<Output = ReplayControl> {
        future::ready(ReplayControl::Continue)
    }
}

/// One replayed click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStep {
    pub index: usize,
    pub coord: Coord,
    pub moved: bool,
}

/// Summary of a finished replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayReport {
    pub steps: usize,
    pub total: usize,
    /// Whether every click removed a group and the grid ended empty.
    pub solved: bool,
    pub aborted: bool,
}
