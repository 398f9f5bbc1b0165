//! Terminal SameGame runner (default binary).
//!
//! Uses crossterm for input and the framebuffer renderer from `samegame-term`.
//! The engine is driven from the tokio main task; replays are paced by
//! [`TerminalPacer`], which redraws and sleeps between recorded clicks.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use serde::Serialize;

use samegame::config::{AppConfig, Cli};
use samegame::core::{
    play_solution, Pacer, PuzzleEngine, PuzzleSnapshot, ReplayControl, ReplayFrame, Unpaced,
};
use samegame::input::{handle_key_event, should_quit, Cursor};
use samegame::session_log::{SessionLog, SessionRecord};
use samegame::term::{FrameBuffer, GameView, TerminalRenderer, ViewState, Viewport};
use samegame::types::{Color, Coord, PlayerAction, PuzzleState};

const POLL_MS: u64 = 50;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_cli(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("[samegame] {}", e);
            return ExitCode::from(2);
        }
    };

    let log = SessionLog::start(config.log_path.clone());

    let result = if config.headless {
        run_headless(&config, &log).await
    } else {
        run_terminal(&config, &log).await
    };

    log.close().await;

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[samegame] {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run_terminal(config: &AppConfig, log: &SessionLog) -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = App::new(config).run(&mut term, log).await;

    // Always try to restore terminal state before reporting.
    let _ = term.exit();
    result
}

#[derive(Serialize)]
struct HeadlessReport {
    seed: u32,
    size: usize,
    colors: usize,
    min_connected: usize,
    grid: Vec<Vec<Option<Color>>>,
    solution: Vec<Coord>,
    candidates: u32,
    elapsed_ms: u64,
    verified: bool,
}

async fn run_headless(config: &AppConfig, log: &SessionLog) -> Result<()> {
    let mut engine = PuzzleEngine::with_config(config.seed, config.round);
    let stats = match engine.generate(config.size, config.colors).await {
        Ok(stats) => stats,
        Err(e) => {
            log.record(SessionRecord::GenerationFailed {
                seed: config.seed,
                size: config.size,
                colors: config.colors,
                error: e.to_string(),
            });
            return Err(e.into());
        }
    };
    let seed = engine.puzzle_seed().unwrap_or(config.seed);
    log.record(SessionRecord::generated(
        seed,
        config.size,
        config.colors,
        engine.solution().len(),
        &stats,
    ));
    engine.drain_events();

    let Some(initial) = engine.initial().cloned() else {
        bail!("engine reported success without a puzzle");
    };
    let solution = engine.solution().to_vec();

    log.record(SessionRecord::ReplayStarted {
        total: solution.len(),
    });
    let replay = engine.replay_solution(&mut Unpaced).await?;
    log.events(&engine.drain_events());
    log.record(SessionRecord::ReplayFinished {
        steps: replay.steps,
        solved: replay.solved,
        aborted: replay.aborted,
    });

    let verified =
        replay.solved && play_solution(&initial, &solution, config.round.min_connected).is_ok();

    let report = HeadlessReport {
        seed,
        size: config.size,
        colors: config.colors,
        min_connected: config.round.min_connected,
        grid: initial.to_rows(),
        solution,
        candidates: stats.candidates,
        elapsed_ms: stats.elapsed.as_millis() as u64,
        verified,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if !verified {
        bail!("recorded solution did not empty the grid");
    }
    Ok(())
}

struct App<'a> {
    config: &'a AppConfig,
    engine: PuzzleEngine,
    cursor: Cursor,
    view: GameView,
    fb: FrameBuffer,
    snap: PuzzleSnapshot,
    hint: Vec<Coord>,
    message: String,
    quit: bool,
}

impl<'a> App<'a> {
    fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            engine: PuzzleEngine::with_config(config.seed, config.round),
            cursor: Cursor::new(config.size),
            view: GameView::default(),
            fb: FrameBuffer::new(0, 0),
            snap: PuzzleSnapshot::default(),
            hint: Vec::new(),
            message: String::new(),
            quit: false,
        }
    }

    async fn run(&mut self, term: &mut TerminalRenderer, log: &SessionLog) -> Result<()> {
        self.new_puzzle(term, log).await?;

        while !self.quit {
            self.draw(term, false)?;

            if !event::poll(Duration::from_millis(POLL_MS))? {
                // Let the log writer make progress between frames.
                tokio::task::yield_now().await;
                continue;
            }
            match event::read()? {
                Event::Key(key) => self.on_key(key, term, log).await?,
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }
        Ok(())
    }

    async fn on_key(
        &mut self,
        key: KeyEvent,
        term: &mut TerminalRenderer,
        log: &SessionLog,
    ) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if should_quit(key) {
            self.quit = true;
            return Ok(());
        }
        let Some(action) = handle_key_event(key) else {
            return Ok(());
        };
        if self.cursor.apply(action) {
            return Ok(());
        }

        self.message.clear();
        match action {
            PlayerAction::Select => {
                let c = self.cursor.position();
                self.hint.clear();
                if !self.engine.click(c.x, c.y, false) {
                    self.message.push_str("nothing to remove here");
                } else if self.engine.state() == PuzzleState::Lost {
                    self.restore_after_loss(term).await?;
                }
            }
            PlayerAction::Restore => {
                self.hint.clear();
                self.engine.restore();
            }
            PlayerAction::Hint => match self.engine.hint() {
                Some(group) => {
                    if let Some(&first) = group.first() {
                        self.cursor.move_to(first);
                    }
                    self.hint = group;
                }
                None => self.message.push_str("no hint available"),
            },
            PlayerAction::Replay => {
                self.hint.clear();
                self.replay(term, log).await?;
            }
            PlayerAction::NewPuzzle => {
                self.hint.clear();
                self.new_puzzle(term, log).await?;
            }
            PlayerAction::CursorLeft
            | PlayerAction::CursorRight
            | PlayerAction::CursorUp
            | PlayerAction::CursorDown => {}
        }

        log.events(&self.engine.drain_events());
        Ok(())
    }

    /// Show the NO MOVES frame for one replay delay, then put the initial
    /// grid back.
    async fn restore_after_loss(&mut self, term: &mut TerminalRenderer) -> Result<()> {
        self.draw(term, false)?;
        tokio::time::sleep(self.config.replay_delay).await;
        self.engine.restore();
        self.message.push_str("no moves left, puzzle restored");
        Ok(())
    }

    async fn new_puzzle(&mut self, term: &mut TerminalRenderer, log: &SessionLog) -> Result<()> {
        self.draw(term, true)?;

        let (size, colors) = (self.config.size, self.config.colors);
        match self.engine.generate(size, colors).await {
            Ok(stats) => {
                log.events(&self.engine.drain_events());
                log.record(SessionRecord::generated(
                    self.engine.puzzle_seed().unwrap_or(0),
                    size,
                    colors,
                    self.engine.solution().len(),
                    &stats,
                ));
                self.cursor.resize(size);
            }
            Err(e) => {
                log.record(SessionRecord::GenerationFailed {
                    seed: self.engine.puzzle_seed().unwrap_or(self.config.seed),
                    size,
                    colors,
                    error: e.to_string(),
                });
                self.message = e.to_string();
            }
        }
        Ok(())
    }

    async fn replay(&mut self, term: &mut TerminalRenderer, log: &SessionLog) -> Result<()> {
        if self.engine.state() == PuzzleState::Uninitialized {
            self.message.push_str("no puzzle to replay");
            return Ok(());
        }
        log.record(SessionRecord::ReplayStarted {
            total: self.engine.solution().len(),
        });

        let mut pacer = TerminalPacer {
            term,
            view: &self.view,
            fb: &mut self.fb,
            snap: &mut self.snap,
            delay: self.config.replay_delay,
            quit: false,
            error: None,
        };
        let report = self.engine.replay_solution(&mut pacer).await?;
        let (quit, error) = (pacer.quit, pacer.error.take());

        log.events(&self.engine.drain_events());
        log.record(SessionRecord::ReplayFinished {
            steps: report.steps,
            solved: report.solved,
            aborted: report.aborted,
        });

        if let Some(e) = error {
            return Err(e);
        }
        self.quit = quit;
        if report.aborted {
            self.message.push_str("replay stopped");
        }
        Ok(())
    }

    fn draw(&mut self, term: &mut TerminalRenderer, generating: bool) -> Result<()> {
        self.engine.snapshot_into(&mut self.snap);
        let cursor = self.snap.playable().then(|| self.cursor.position());
        let state = ViewState {
            cursor,
            highlight: &self.hint,
            generating,
            message: (!self.message.is_empty()).then_some(self.message.as_str()),
        };
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.view
            .render_into(&self.snap, &state, Viewport::new(w, h), &mut self.fb);
        term.draw_swap(&mut self.fb)
    }
}

/// Redraws each replay frame and waits `delay` before the next click.
///
/// Any key stops the replay; a quit key also ends the session.
struct TerminalPacer<'t> {
    term: &'t mut TerminalRenderer,
    view: &'t GameView,
    fb: &'t mut FrameBuffer,
    snap: &'t mut PuzzleSnapshot,
    delay: Duration,
    quit: bool,
    error: Option<anyhow::Error>,
}

impl TerminalPacer<'_> {
    fn draw(&mut self, frame: &ReplayFrame<'_>) -> Result<()> {
        frame.engine.snapshot_into(self.snap);
        let state = ViewState {
            cursor: frame.next,
            highlight: frame.highlight,
            generating: false,
            message: frame.is_final().then_some("replay finished"),
        };
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        self.view
            .render_into(self.snap, &state, Viewport::new(w, h), self.fb);
        self.term.draw_swap(self.fb)
    }

    /// Sleep for the configured delay, returning early on a key press.
    async fn wait(&mut self) -> Result<Option<KeyEvent>> {
        let step = Duration::from_millis(POLL_MS);
        let mut waited = Duration::ZERO;
        while waited < self.delay {
            let slice = step.min(self.delay - waited);
            tokio::time::sleep(slice).await;
            waited += slice;
            while event::poll(Duration::ZERO)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
                    Event::Resize(..) => self.term.invalidate(),
                    _ => {}
                }
            }
        }
        Ok(None)
    }
}

impl Pacer for TerminalPacer<'_> {
    async fn pause(&mut self, frame: ReplayFrame<'_>) -> ReplayControl {
        if let Err(e) = self.draw(&frame) {
            self.error = Some(e);
            return ReplayControl::Abort;
        }
        match self.wait().await {
            Ok(None) => ReplayControl::Continue,
            Ok(Some(key)) => {
                self.quit = should_quit(key);
                ReplayControl::Abort
            }
            Err(e) => {
                self.error = Some(e);
                ReplayControl::Abort
            }
        }
    }
}
